//! A headless rating widget driven by replay steps.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use peniko::Color;
use serde::Serialize;
use starrating_core::{
    CompositeRating, DocumentListeners, MemoryKeyListeners, MemoryRatingSurface,
    MemoryStarSurface, RatingSnapshot, RatingTheme, StarEvent,
};
use starrating_render::{PaintList, RowLayout};

use crate::script::{ScriptError, Step};

/// Compact paint description of one star.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarPaintSummary {
    pub ordinal: usize,
    /// Layout box as `[x0, y0, x1, y1]`.
    pub bounds: [f64; 4],
    pub fill_width: f64,
    /// `#rrggbbaa`.
    pub fill: String,
    pub background: String,
}

/// State after one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub snapshot: RatingSnapshot,
    /// Notifications emitted by stars during this step.
    pub events: Vec<StarEvent>,
    pub prevent_default: bool,
    /// Document keydown listeners attached after this step.
    pub key_listeners: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paint: Option<Vec<StarPaintSummary>>,
}

/// One in-memory widget plus the listener registry it shares with its stars.
#[derive(Debug)]
pub struct Session {
    rating: CompositeRating<MemoryRatingSurface, MemoryStarSurface>,
    listeners: Rc<RefCell<MemoryKeyListeners>>,
    paint: bool,
    steps: usize,
}

impl Session {
    pub fn new(theme: RatingTheme) -> Self {
        let listeners = Rc::new(RefCell::new(MemoryKeyListeners::new()));
        let rating = CompositeRating::new(
            MemoryRatingSurface::new(),
            theme,
            DocumentListeners::from_shared(Rc::clone(&listeners)),
            |_| MemoryStarSurface::new(),
        );
        Self {
            rating,
            listeners,
            paint: false,
            steps: 0,
        }
    }

    /// Include paint summaries in every report.
    pub fn with_paint(mut self, paint: bool) -> Self {
        self.paint = paint;
        self
    }

    pub fn rating(&self) -> &CompositeRating<MemoryRatingSurface, MemoryStarSurface> {
        &self.rating
    }

    pub fn active_key_listeners(&self) -> usize {
        self.listeners.borrow().active()
    }

    /// Apply one step and report the resulting state.
    pub fn apply(&mut self, step: &Step) -> Result<StepReport, ScriptError> {
        let mut events = Vec::new();
        let mut prevent_default = false;

        match step {
            Step::SetAttribute { name, value } => {
                self.rating.attribute_changed(name, Some(value.as_str()))
            }
            Step::RemoveAttribute { name } => self.rating.attribute_changed(name, None),
            Step::SetValue { value } => self.rating.set_value(value.unwrap_or(f64::NAN)),
            Step::SetDisabled { disabled } => self.rating.set_disabled(*disabled),
            Step::SetReadOnly { read_only } => self.rating.set_read_only(*read_only),
            Step::SetSize { size } => self.rating.set_size_token(size),
            Step::SetColor { color } => self.rating.set_color(color),
            Step::SetDisabledColor { color } => self.rating.set_disabled_color(color),
            Step::SetBackgroundColor { color } => self.rating.set_background_color(color),
            Step::Focus => self.rating.focus(),
            Step::Blur => self.rating.blur(),
            Step::Star { ordinal, event } => {
                let outcome = self.rating.handle_star_event(*ordinal, event, &mut events);
                prevent_default = outcome.prevent_default;
            }
            Step::Pointer { x, y, event } => {
                let layout = RowLayout::new(self.rating.size())?;
                match layout.hit_test(Point::new(*x, *y)) {
                    Some(ordinal) => {
                        let outcome = self.rating.handle_star_event(ordinal, event, &mut events);
                        prevent_default = outcome.prevent_default;
                    }
                    None => log::trace!("Pointer at ({}, {}) hit no star", x, y),
                }
            }
        }

        self.steps += 1;
        log::debug!("Step {} applied: {:?}", self.steps, step);

        let paint = if self.paint {
            Some(self.paint_summary()?)
        } else {
            None
        };

        Ok(StepReport {
            step: self.steps,
            snapshot: self.rating.snapshot(),
            events,
            prevent_default,
            key_listeners: self.active_key_listeners(),
            paint,
        })
    }

    /// Apply every step in order.
    pub fn run(&mut self, steps: &[Step]) -> Result<Vec<StepReport>, ScriptError> {
        steps.iter().map(|step| self.apply(step)).collect()
    }

    fn paint_summary(&self) -> Result<Vec<StarPaintSummary>, ScriptError> {
        let list = PaintList::for_rating(&self.rating)?;
        Ok(list
            .stars
            .iter()
            .map(|star| StarPaintSummary {
                ordinal: star.ordinal.get(),
                bounds: [star.bounds.x0, star.bounds.y0, star.bounds.x1, star.bounds.y1],
                fill_width: star.fill_rect.width(),
                fill: hex(star.fill),
                background: hex(star.background),
            })
            .collect())
    }
}

fn hex(color: Color) -> String {
    let c = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use starrating_core::{Key, PlatformEvent, StarEventKind, StarOrdinal};

    #[test]
    fn test_attribute_steps_update_snapshot() {
        let mut session = Session::new(RatingTheme::default());
        let report = session
            .apply(&Step::SetAttribute {
                name: "value".into(),
                value: "3.7".into(),
            })
            .unwrap();
        assert_eq!(report.step, 1);
        assert_eq!(report.snapshot.value, Some(3.7));
        assert_eq!(report.snapshot.stars[3].fill_percent, 70);
        assert!(report.paint.is_none());

        let report = session
            .apply(&Step::RemoveAttribute {
                name: "value".into(),
            })
            .unwrap();
        assert_eq!(report.snapshot.value, None);
        assert!(report.snapshot.attributes.is_empty());
    }

    #[test]
    fn test_star_steps_report_events_and_listeners() {
        let mut session = Session::new(RatingTheme::default());
        let second = StarOrdinal::new(2).unwrap();
        let steps = vec![
            Step::Star {
                ordinal: second,
                event: PlatformEvent::Focus,
            },
            Step::Star {
                ordinal: second,
                event: PlatformEvent::KeyDown { key: Key::Space },
            },
            Step::Star {
                ordinal: second,
                event: PlatformEvent::Blur,
            },
        ];
        let reports = session.run(&steps).unwrap();

        assert_eq!(reports[0].key_listeners, 1);
        assert!(reports[1].prevent_default);
        assert_eq!(reports[1].events.len(), 1);
        assert_eq!(reports[1].events[0].kind, StarEventKind::Activate);
        assert_eq!(reports[2].key_listeners, 0);
        assert_eq!(session.active_key_listeners(), 0);
    }

    #[test]
    fn test_pointer_steps_hit_test_the_outline() {
        let mut session = Session::new(RatingTheme::default());
        session.apply(&Step::SetSize { size: "large".into() }).unwrap();

        // Center of the third star: two 32px boxes and two 6px gaps to its left.
        let report = session
            .apply(&Step::Pointer {
                x: 2.0 * 38.0 + 16.0,
                y: 16.0,
                event: PlatformEvent::Click,
            })
            .unwrap();
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].kind, StarEventKind::Activate);
        assert_eq!(report.events[0].ordinal.get(), 3);

        // Gap between the first two stars.
        let report = session
            .apply(&Step::Pointer {
                x: 34.0,
                y: 16.0,
                event: PlatformEvent::Click,
            })
            .unwrap();
        assert!(report.events.is_empty());
        assert!(report.snapshot.value.is_none());
    }

    #[test]
    fn test_paint_summary() {
        let mut session = Session::new(RatingTheme::default()).with_paint(true);
        session.apply(&Step::SetSize { size: "small".into() }).unwrap();
        let report = session.apply(&Step::SetValue { value: Some(1.5) }).unwrap();
        let paint = report.paint.unwrap();
        assert_eq!(paint.len(), 5);
        assert_eq!(paint[0].fill_width, 16.0);
        assert_eq!(paint[1].fill_width, 8.0);
        assert_eq!(paint[0].fill, "#eba600ff");
        assert_eq!(paint[0].background, "#d5e1e5ff");
    }
}
