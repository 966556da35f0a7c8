//! Rendering-primitive capabilities consumed by the widgets.
//!
//! A [`StarSurface`] is the visual sub-tree of one star (outer box, clip
//! shape, background and value rectangles). A [`RatingSurface`] is the host
//! element of the composite. Widgets only ever push state into them.

use serde::{Deserialize, Serialize};

use crate::attributes::ReflectedAttributes;
use crate::events::StarOrdinal;
use crate::size::SizeClass;

/// Pointer cursor over a star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
        }
    }
}

/// Accessible label of a single star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarLabel {
    /// Not announced.
    #[default]
    Hidden,
    /// Prompt to select the rating this star stands for.
    Select(StarOrdinal),
}

impl StarLabel {
    /// Label text, `None` when hidden.
    pub fn text(self) -> Option<String> {
        match self {
            Self::Hidden => None,
            Self::Select(ordinal) if ordinal.get() == 1 => Some("Select 1 star".to_string()),
            Self::Select(ordinal) => Some(format!("Select {ordinal} stars")),
        }
    }
}

/// Interaction affordances a star offers its host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Affordance {
    pub focusable: bool,
    pub cursor: Cursor,
    pub label: StarLabel,
}

impl Affordance {
    /// No interaction: not focusable, neutral cursor, hidden label.
    pub const NONE: Affordance = Affordance {
        focusable: false,
        cursor: Cursor::Default,
        label: StarLabel::Hidden,
    };

    pub fn interactive(ordinal: StarOrdinal) -> Self {
        Self {
            focusable: true,
            cursor: Cursor::Pointer,
            label: StarLabel::Select(ordinal),
        }
    }
}

/// Visual primitives of one star.
pub trait StarSurface {
    /// Resize the outer layout box and the vector primitive, in pixels.
    fn set_box_size(&mut self, px: u32);

    /// Width of the value rectangle as a percentage of the box.
    fn set_fill_width(&mut self, percent: u32);

    /// Paint color of the value rectangle.
    fn set_fill_color(&mut self, color: &str);

    /// Paint color of the background rectangle.
    fn set_background_color(&mut self, color: &str);

    /// Focusability, cursor and accessible label of the star element.
    fn set_affordance(&mut self, affordance: &Affordance);
}

/// Spacing and focus-ring metrics of the composite row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingLayout {
    pub gap_px: u32,
    pub outline_offset_px: u32,
    pub corner_radius_px: u32,
}

impl RatingLayout {
    pub fn for_size(size: SizeClass) -> Self {
        Self {
            gap_px: size.gap_px(),
            outline_offset_px: size.outline_offset_px(),
            corner_radius_px: size.corner_radius_px(),
        }
    }
}

impl Default for RatingLayout {
    fn default() -> Self {
        Self::for_size(SizeClass::default())
    }
}

/// Focus ring drawn around the composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusOutline {
    pub color: String,
    pub width_px: u32,
    pub offset_px: u32,
    pub radius_px: u32,
}

/// Host element of the composite rating.
pub trait RatingSurface {
    /// Set (`Some`) or remove (`None`) a markup attribute.
    fn reflect_attribute(&mut self, name: &str, value: Option<&str>);

    /// Accessible label of the whole control.
    fn set_label(&mut self, label: &str);

    /// Whether the composite takes keyboard focus.
    fn set_focusable(&mut self, focusable: bool);

    /// Row spacing and focus-ring metrics.
    fn set_layout(&mut self, layout: &RatingLayout);

    /// Draw (`Some`) or clear (`None`) the focus outline.
    fn set_outline(&mut self, outline: Option<&FocusOutline>);
}

/// In-memory star primitives. Keeps the latest state and counts writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryStarSurface {
    pub box_px: u32,
    pub fill_percent: u32,
    pub fill_color: String,
    pub background_color: String,
    pub affordance: Affordance,
    #[serde(skip)]
    pub writes: usize,
}

impl MemoryStarSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StarSurface for MemoryStarSurface {
    fn set_box_size(&mut self, px: u32) {
        self.box_px = px;
        self.writes += 1;
    }

    fn set_fill_width(&mut self, percent: u32) {
        self.fill_percent = percent;
        self.writes += 1;
    }

    fn set_fill_color(&mut self, color: &str) {
        self.fill_color = color.to_string();
        self.writes += 1;
    }

    fn set_background_color(&mut self, color: &str) {
        self.background_color = color.to_string();
        self.writes += 1;
    }

    fn set_affordance(&mut self, affordance: &Affordance) {
        self.affordance = *affordance;
        self.writes += 1;
    }
}

/// In-memory composite host element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRatingSurface {
    pub attributes: ReflectedAttributes,
    /// Every attribute write, oldest first.
    pub reflections: Vec<(String, Option<String>)>,
    pub label: String,
    pub focusable: bool,
    pub layout: RatingLayout,
    pub outline: Option<FocusOutline>,
    pub writes: usize,
}

impl MemoryRatingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingSurface for MemoryRatingSurface {
    fn reflect_attribute(&mut self, name: &str, value: Option<&str>) {
        // Only observed names are ever reflected; keep an owned copy of the key.
        let key: &'static str = match crate::attributes::ObservedAttribute::from_name(name) {
            Some(attribute) => attribute.name(),
            None => return,
        };
        self.attributes.reflect(key, value);
        self.reflections
            .push((key.to_string(), value.map(str::to_string)));
        self.writes += 1;
    }

    fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
        self.writes += 1;
    }

    fn set_focusable(&mut self, focusable: bool) {
        self.focusable = focusable;
        self.writes += 1;
    }

    fn set_layout(&mut self, layout: &RatingLayout) {
        self.layout = *layout;
        self.writes += 1;
    }

    fn set_outline(&mut self, outline: Option<&FocusOutline>) {
        self.outline = outline.cloned();
        self.writes += 1;
    }
}
