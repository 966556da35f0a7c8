//! Star outline geometry, row layout and pointer hit testing.

use kurbo::{Affine, BezPath, Point, Rect, Shape};
use starrating_core::{STAR_COUNT, SizeClass, StarOrdinal};

use crate::{RenderError, RenderResult};

/// Edge length of the design space the outline is authored in.
pub const DESIGN_SIZE: f64 = 24.0;

/// Five-point star in a 24x24 design space.
pub const STAR_PATH: &str = "M12 0 L14.82 8.12 L23.41 8.29 L16.57 13.48 L19.05 21.71 \
                             L12 16.8 L4.95 21.71 L7.43 13.48 L0.59 8.29 L9.18 8.12 Z";

/// The star outline scaled to a box of `px` pixels, anchored at the origin.
pub fn star_outline(px: f64) -> RenderResult<BezPath> {
    let mut path = BezPath::from_svg(STAR_PATH).map_err(|e| RenderError::Outline(e.to_string()))?;
    path.apply_affine(Affine::scale(px / DESIGN_SIZE));
    Ok(path)
}

/// Placement of the five stars of one composite, left to right.
#[derive(Debug, Clone)]
pub struct RowLayout {
    star_px: f64,
    gap_px: f64,
    outline: BezPath,
}

impl RowLayout {
    pub fn new(size: SizeClass) -> RenderResult<Self> {
        let star_px = f64::from(size.star_px());
        Ok(Self {
            star_px,
            gap_px: f64::from(size.gap_px()),
            outline: star_outline(star_px)?,
        })
    }

    pub fn star_px(&self) -> f64 {
        self.star_px
    }

    /// Top-left corner of a star's box.
    pub fn origin(&self, ordinal: StarOrdinal) -> Point {
        Point::new(ordinal.index() as f64 * (self.star_px + self.gap_px), 0.0)
    }

    /// Layout box of a star.
    pub fn star_rect(&self, ordinal: StarOrdinal) -> Rect {
        Rect::from_origin_size(self.origin(ordinal), (self.star_px, self.star_px))
    }

    /// Bounding box of the whole row.
    pub fn bounds(&self) -> Rect {
        let width = STAR_COUNT as f64 * self.star_px + (STAR_COUNT - 1) as f64 * self.gap_px;
        Rect::new(0.0, 0.0, width, self.star_px)
    }

    /// Outline of a star, translated into row coordinates.
    pub fn outline(&self, ordinal: StarOrdinal) -> BezPath {
        let mut path = self.outline.clone();
        path.apply_affine(Affine::translate(self.origin(ordinal).to_vec2()));
        path
    }

    /// The star whose outline contains `point`, if any. Points in the gaps or
    /// in a box corner outside the shape hit nothing.
    pub fn hit_test(&self, point: Point) -> Option<StarOrdinal> {
        StarOrdinal::all().find(|&ordinal| {
            let local = point - self.origin(ordinal).to_vec2();
            self.star_rect(ordinal).contains(point) && self.outline.contains(local)
        })
    }
}
