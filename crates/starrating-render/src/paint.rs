//! Color resolution and per-star paint lists.

use kurbo::{BezPath, Rect};
use peniko::Color;
use starrating_core::{CompositeRating, RatingSurface, StarOrdinal, StarSurface};

use crate::RenderResult;
use crate::geometry::RowLayout;

const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("transparent", [0, 0, 0, 0]),
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
    ("silver", [192, 192, 192, 255]),
    ("gold", [255, 215, 0, 255]),
    ("orange", [255, 165, 0, 255]),
];

/// Resolve a CSS color string: `#rgb`, `#rrggbb`, `#rrggbbaa` or a few
/// common names. Anything else is `None`.
pub fn resolve_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, [r, g, b, a])| Color::from_rgba8(*r, *g, *b, *a))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 17;
            }
            Some(Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255))
        }
        6 => Some(Color::from_rgba8(channel(0)?, channel(2)?, channel(4)?, 255)),
        8 => Some(Color::from_rgba8(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => None,
    }
}

/// Resolve a color for painting. Unresolvable strings paint transparent.
pub fn paint_color(s: &str) -> Color {
    resolve_color(s).unwrap_or_else(|| {
        log::warn!("Unresolvable color {:?}, painting transparent", s);
        Color::from_rgba8(0, 0, 0, 0)
    })
}

/// Paint instructions for one star: the background shape, then the value
/// rectangle clipped by the same shape.
#[derive(Debug, Clone)]
pub struct StarPaint {
    pub ordinal: StarOrdinal,
    /// Layout box in row coordinates.
    pub bounds: Rect,
    /// Clip shape in row coordinates.
    pub clip: BezPath,
    pub background: Color,
    /// Value rectangle, from the left edge of the box.
    pub fill_rect: Rect,
    pub fill: Color,
}

/// Paint instructions for a whole composite, first star first.
#[derive(Debug, Clone)]
pub struct PaintList {
    pub bounds: Rect,
    pub stars: Vec<StarPaint>,
}

impl PaintList {
    pub fn for_rating<R: RatingSurface, S: StarSurface>(
        rating: &CompositeRating<R, S>,
    ) -> RenderResult<Self> {
        let layout = RowLayout::new(rating.size())?;
        let stars = rating
            .stars()
            .iter()
            .map(|star| {
                let ordinal = star.ordinal();
                let bounds = layout.star_rect(ordinal);
                let width = bounds.width() * f64::from(star.fill_percent()) / 100.0;
                StarPaint {
                    ordinal,
                    bounds,
                    clip: layout.outline(ordinal),
                    background: paint_color(star.background_color()),
                    fill_rect: Rect::new(bounds.x0, bounds.y0, bounds.x0 + width, bounds.y1),
                    fill: paint_color(star.painted_color()),
                }
            })
            .collect();
        Ok(Self {
            bounds: layout.bounds(),
            stars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starrating_core::{
        DocumentListeners, MemoryKeyListeners, MemoryRatingSurface, MemoryStarSurface,
        RatingTheme, SizeClass,
    };

    fn rgba(color: Color) -> (u8, u8, u8, u8) {
        let c = color.to_rgba8();
        (c.r, c.g, c.b, c.a)
    }

    fn rating() -> CompositeRating<MemoryRatingSurface, MemoryStarSurface> {
        CompositeRating::new(
            MemoryRatingSurface::new(),
            RatingTheme::default(),
            DocumentListeners::new(MemoryKeyListeners::new()),
            |_| MemoryStarSurface::new(),
        )
    }

    #[test]
    fn test_resolve_hex_forms() {
        assert_eq!(rgba(resolve_color("#ff0000").unwrap()), (255, 0, 0, 255));
        assert_eq!(rgba(resolve_color("#0f0").unwrap()), (0, 255, 0, 255));
        assert_eq!(rgba(resolve_color("#00000080").unwrap()), (0, 0, 0, 128));
        assert_eq!(rgba(resolve_color("#eba600").unwrap()), (235, 166, 0, 255));
    }

    #[test]
    fn test_resolve_names() {
        assert_eq!(rgba(resolve_color("Gold").unwrap()), (255, 215, 0, 255));
        assert_eq!(rgba(resolve_color("transparent").unwrap()).3, 0);
    }

    #[test]
    fn test_unresolvable_paints_transparent() {
        assert!(resolve_color("#12").is_none());
        assert!(resolve_color("not-a-color").is_none());
        assert!(resolve_color("#ééé").is_none());
        assert_eq!(rgba(paint_color("not-a-color")).3, 0);
    }

    #[test]
    fn test_paint_list_fill_widths() {
        let mut rating = rating();
        rating.set_size(SizeClass::Large);
        rating.set_value(2.5);
        let list = PaintList::for_rating(&rating).unwrap();
        assert_eq!(list.stars.len(), 5);

        let widths: Vec<f64> = list.stars.iter().map(|s| s.fill_rect.width()).collect();
        assert_eq!(widths, vec![32.0, 32.0, 16.0, 0.0, 0.0]);
        assert_eq!(list.stars[2].fill_rect.x0, list.stars[2].bounds.x0);
    }

    #[test]
    fn test_paint_list_uses_disabled_color() {
        let mut rating = rating();
        rating.set_disabled_color("#808080");
        rating.set_disabled(true);
        let list = PaintList::for_rating(&rating).unwrap();
        assert!(list.stars.iter().all(|s| rgba(s.fill) == (128, 128, 128, 255)));
    }
}
