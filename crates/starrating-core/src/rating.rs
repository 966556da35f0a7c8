//! Composite five-star rating widget.
//!
//! [`CompositeRating`] owns the public rating and its flags, reflects them as
//! markup attributes, and fans a per-star fill fraction, size, colors and the
//! disabled flag out to exactly five [`StarUnit`] children. Every setter runs
//! its whole cascade synchronously before returning.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::attributes::{
    ObservedAttribute, ReflectedAttributes, format_number, parse_flag, parse_number,
};
use crate::events::{DocumentListeners, EventOutcome, EventSink, PlatformEvent, StarOrdinal};
use crate::size::{SizeClass, metrics};
use crate::star::{StarSnapshot, StarUnit};
use crate::surface::{FocusOutline, RatingLayout, RatingSurface, StarSurface};
use crate::theme::RatingTheme;
use crate::value::{
    MAX_RATING, RatingValue, STAR_COUNT, format_for_label, same_raw, star_fractions,
};

/// Serializable view of the composite and its stars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSnapshot {
    pub value: Option<f64>,
    pub disabled: bool,
    pub read_only: bool,
    pub size: SizeClass,
    pub color: String,
    pub disabled_color: String,
    pub background_color: String,
    pub label: String,
    pub focused: bool,
    pub attributes: BTreeMap<String, String>,
    pub stars: Vec<StarSnapshot>,
}

/// The five-star composite control.
#[derive(Debug)]
pub struct CompositeRating<R: RatingSurface, S: StarSurface> {
    value: RatingValue,
    disabled: bool,
    read_only: bool,
    size: SizeClass,
    color: String,
    disabled_color: String,
    background_color: String,
    focused: bool,
    label: String,
    theme: RatingTheme,
    attributes: ReflectedAttributes,
    surface: R,
    stars: [StarUnit<S>; STAR_COUNT],
}

impl<R: RatingSurface, S: StarSurface> CompositeRating<R, S> {
    /// Build the composite and its five stars.
    ///
    /// `star_surface` is called once per star, in order. Stars are interactive
    /// when the theme asks for it; they then share `listeners`.
    pub fn new(
        surface: R,
        theme: RatingTheme,
        listeners: DocumentListeners,
        mut star_surface: impl FnMut(StarOrdinal) -> S,
    ) -> Self {
        let surfaces = std::array::from_fn(|index| star_surface(StarOrdinal::ALL[index]));
        Self::with_star_surfaces(surface, theme, listeners, surfaces)
    }

    /// Build the composite from already constructed star primitives, first
    /// star first.
    pub fn with_star_surfaces(
        surface: R,
        theme: RatingTheme,
        listeners: DocumentListeners,
        star_surfaces: [S; STAR_COUNT],
    ) -> Self {
        let mut index = 0;
        let stars = star_surfaces.map(|primitives| {
            let ordinal = StarOrdinal::ALL[index];
            index += 1;
            if theme.interactive {
                StarUnit::interactive(ordinal, primitives, &theme, listeners.clone())
            } else {
                StarUnit::new(ordinal, primitives, &theme)
            }
        });

        let mut rating = Self {
            value: RatingValue::Unset,
            disabled: false,
            read_only: false,
            size: SizeClass::default(),
            color: theme.color.clone(),
            disabled_color: theme.disabled_color.clone(),
            background_color: theme.background_color.clone(),
            focused: false,
            label: String::new(),
            theme,
            attributes: ReflectedAttributes::new(),
            surface,
            stars,
        };
        rating.surface.set_layout(&RatingLayout::for_size(rating.size));
        rating.surface.set_focusable(true);
        rating.update_label();
        rating
    }

    // --- value ---

    /// Current rating as a raw number, NaN when unset.
    pub fn value(&self) -> f64 {
        self.value.as_f64()
    }

    /// Current rating in typed form.
    pub fn rating(&self) -> RatingValue {
        self.value
    }

    /// Set the rating. Identical writes (NaN over unset included) do nothing;
    /// anything outside [0, 5] stores `Unset` and still runs the cascade.
    pub fn set_value(&mut self, value: f64) {
        if same_raw(self.value.as_f64(), value) {
            return;
        }
        self.value = RatingValue::from_raw(value);
        log::trace!("Rating value -> {:?}", self.value);

        self.reflect_value();

        let fractions = star_fractions(self.value);
        for (star, fraction) in self.stars.iter_mut().zip(fractions) {
            star.set_value(fraction);
        }

        self.update_label();
    }

    // --- disabled ---

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled == disabled {
            return;
        }
        self.disabled = disabled;
        log::trace!("Rating disabled -> {}", disabled);

        self.reflect(ObservedAttribute::Disabled, disabled.then_some(""));
        for star in &mut self.stars {
            star.set_disabled(disabled);
        }
        self.surface.set_focusable(!disabled);
        self.update_label();
        self.refresh_outline();
    }

    // --- size ---

    pub fn size(&self) -> SizeClass {
        self.size
    }

    pub fn set_size(&mut self, size: SizeClass) {
        if self.size == size {
            return;
        }
        self.size = size;
        log::trace!("Rating size -> {}", size);

        for star in &mut self.stars {
            star.set_size(size);
        }
        self.surface.set_layout(&RatingLayout::for_size(size));
        self.reflect(ObservedAttribute::Size, size.attribute_value());
        self.refresh_outline();
    }

    /// Untyped size setter for script callers. Unknown tokens are ignored.
    pub fn set_size_token(&mut self, token: &str) {
        match SizeClass::parse(token) {
            Some(size) => self.set_size(size),
            None => log::trace!("Ignoring size {:?}", token),
        }
    }

    // --- readOnly ---

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Reflected only. Does not gate interaction or value writes.
    pub fn set_read_only(&mut self, read_only: bool) {
        if self.read_only == read_only {
            return;
        }
        self.read_only = read_only;
        self.reflect(ObservedAttribute::ReadOnly, read_only.then_some(""));
    }

    // --- colors ---

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_color(&mut self, color: &str) {
        if self.color == color {
            return;
        }
        self.color = color.to_string();
        for star in &mut self.stars {
            star.set_color(color);
        }
        self.refresh_outline();
    }

    pub fn disabled_color(&self) -> &str {
        &self.disabled_color
    }

    pub fn set_disabled_color(&mut self, color: &str) {
        if self.disabled_color == color {
            return;
        }
        self.disabled_color = color.to_string();
        for star in &mut self.stars {
            star.set_disabled_color(color);
        }
        self.refresh_outline();
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn set_background_color(&mut self, color: &str) {
        if self.background_color == color {
            return;
        }
        self.background_color = color.to_string();
        for star in &mut self.stars {
            star.set_background_color(color);
        }
    }

    // --- markup bridge ---

    /// Markup attribute change callback.
    ///
    /// `value` is the new attribute text, `None` when the attribute was
    /// removed. Names outside the observed list are ignored.
    pub fn attribute_changed(&mut self, name: &str, value: Option<&str>) {
        let Some(attribute) = ObservedAttribute::from_name(name) else {
            log::trace!("Ignoring unobserved attribute {:?}", name);
            return;
        };
        log::debug!("Attribute {} changed to {:?}", attribute.name(), value);

        match attribute {
            ObservedAttribute::Value => {
                // Track the author's text so a normalizing write can remove it.
                self.attributes.reflect(attribute.name(), value);
                self.set_value(value.map(parse_number).unwrap_or(f64::NAN));
                self.reflect_value();
            }
            ObservedAttribute::Disabled => self.set_disabled(parse_flag(value)),
            ObservedAttribute::ReadOnly => self.set_read_only(parse_flag(value)),
            ObservedAttribute::Size => match value {
                Some(token) => self.set_size_token(token),
                None => self.set_size(SizeClass::Medium),
            },
            ObservedAttribute::Color => {
                let color = value.map_or_else(|| self.theme.color.clone(), str::to_string);
                self.set_color(&color);
            }
            ObservedAttribute::DisabledColor => {
                let color =
                    value.map_or_else(|| self.theme.disabled_color.clone(), str::to_string);
                self.set_disabled_color(&color);
            }
            ObservedAttribute::BackgroundColor => {
                let color =
                    value.map_or_else(|| self.theme.background_color.clone(), str::to_string);
                self.set_background_color(&color);
            }
        }
    }

    /// Reflected attribute text, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &ReflectedAttributes {
        &self.attributes
    }

    // --- focus ---

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Draw the focus outline in the active (or disabled) color.
    pub fn focus(&mut self) {
        if self.focused {
            return;
        }
        self.focused = true;
        let outline = self.outline();
        self.surface.set_outline(Some(&outline));
    }

    pub fn blur(&mut self) {
        if !self.focused {
            return;
        }
        self.focused = false;
        self.surface.set_outline(None);
    }

    /// Outline drawn while focused.
    pub fn outline(&self) -> FocusOutline {
        let color = if self.disabled {
            &self.disabled_color
        } else {
            &self.color
        };
        FocusOutline {
            color: color.clone(),
            width_px: metrics::OUTLINE_WIDTH_PX,
            offset_px: self.size.outline_offset_px(),
            radius_px: self.size.corner_radius_px(),
        }
    }

    // --- accessibility ---

    /// Accessible label, e.g. `Rating 3.5 out of 5`.
    pub fn label(&self) -> &str {
        &self.label
    }

    // --- children ---

    pub fn stars(&self) -> &[StarUnit<S>; STAR_COUNT] {
        &self.stars
    }

    pub fn star(&self, ordinal: StarOrdinal) -> &StarUnit<S> {
        &self.stars[ordinal.index()]
    }

    /// Route a platform event to one star. The composite does not consume
    /// the notifications the star emits.
    pub fn handle_star_event(
        &mut self,
        ordinal: StarOrdinal,
        event: &PlatformEvent,
        sink: &mut impl EventSink,
    ) -> EventOutcome {
        self.stars[ordinal.index()].handle_event(event, sink)
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn theme(&self) -> &RatingTheme {
        &self.theme
    }

    pub fn snapshot(&self) -> RatingSnapshot {
        RatingSnapshot {
            value: self.value.get(),
            disabled: self.disabled,
            read_only: self.read_only,
            size: self.size,
            color: self.color.clone(),
            disabled_color: self.disabled_color.clone(),
            background_color: self.background_color.clone(),
            label: self.label.clone(),
            focused: self.focused,
            attributes: self.attributes.to_map(),
            stars: self.stars.iter().map(StarUnit::snapshot).collect(),
        }
    }

    fn reflect(&mut self, attribute: ObservedAttribute, value: Option<&str>) {
        if self.attributes.reflect(attribute.name(), value) {
            self.surface.reflect_attribute(attribute.name(), value);
        }
    }

    fn reflect_value(&mut self) {
        let text = self.value.get().map(format_number);
        self.reflect(ObservedAttribute::Value, text.as_deref());
    }

    fn update_label(&mut self) {
        let number = format_for_label(
            self.value.get().unwrap_or(0.0),
            self.theme.decimal_separator,
        );
        let suffix = if self.disabled { " disabled" } else { "" };
        self.label = format!("Rating {number} out of {MAX_RATING}{suffix}");
        self.surface.set_label(&self.label);
    }

    fn refresh_outline(&mut self) {
        if self.focused {
            let outline = self.outline();
            self.surface.set_outline(Some(&outline));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryKeyListeners;
    use crate::surface::{MemoryRatingSurface, MemoryStarSurface};

    type TestRating = CompositeRating<MemoryRatingSurface, MemoryStarSurface>;

    fn rating() -> TestRating {
        CompositeRating::new(
            MemoryRatingSurface::new(),
            RatingTheme::default(),
            DocumentListeners::new(MemoryKeyListeners::new()),
            |_| MemoryStarSurface::new(),
        )
    }

    fn fractions(rating: &TestRating) -> Vec<f64> {
        rating.stars().iter().map(|s| s.value()).collect()
    }

    #[test]
    fn test_initial_state() {
        let rating = rating();
        assert!(rating.value().is_nan());
        assert!(!rating.disabled());
        assert!(!rating.read_only());
        assert_eq!(rating.size(), SizeClass::Medium);
        assert_eq!(rating.attributes().iter().count(), 0);
        assert_eq!(rating.label(), "Rating 0 out of 5");
        assert!(rating.surface().focusable);
    }

    #[test]
    fn test_stars_in_fixed_order() {
        let rating = rating();
        let ordinals: Vec<usize> = rating.stars().iter().map(|s| s.ordinal().get()).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_set_value_reflects_and_decomposes() {
        let mut rating = rating();
        rating.set_value(3.7);
        assert_eq!(rating.value(), 3.7);
        assert_eq!(rating.attribute("value"), Some("3.7"));
        assert_eq!(rating.surface().attributes.get("value"), Some("3.7"));

        let values = fractions(&rating);
        assert_eq!(&values[..3], &[1.0, 1.0, 1.0]);
        assert!((values[3] - 0.7).abs() < f64::EPSILON);
        assert_eq!(values[4], 0.0);
        assert_eq!(rating.star(StarOrdinal::ALL[3]).fill_percent(), 70);
    }

    #[test]
    fn test_out_of_range_value_unsets() {
        let mut rating = rating();
        rating.set_value(2.0);
        rating.set_value(7.0);
        assert!(rating.value().is_nan());
        assert_eq!(rating.attribute("value"), None);
        assert_eq!(fractions(&rating), vec![0.0; 5]);
        assert_eq!(rating.label(), "Rating 0 out of 5");
    }

    #[test]
    fn test_label_tracks_value_and_disabled() {
        let mut rating = rating();
        rating.set_value(4.5);
        assert_eq!(rating.label(), "Rating 4.5 out of 5");
        rating.set_disabled(true);
        assert_eq!(rating.label(), "Rating 4.5 out of 5 disabled");
        assert_eq!(rating.surface().label, "Rating 4.5 out of 5 disabled");
    }

    #[test]
    fn test_label_uses_theme_separator() {
        let theme = RatingTheme {
            decimal_separator: ',',
            ..RatingTheme::default()
        };
        let mut rating: TestRating = CompositeRating::new(
            MemoryRatingSurface::new(),
            theme,
            DocumentListeners::new(MemoryKeyListeners::new()),
            |_| MemoryStarSurface::new(),
        );
        rating.set_value(2.5);
        assert_eq!(rating.label(), "Rating 2,5 out of 5");
    }

    #[test]
    fn test_disabled_fans_out() {
        let mut rating = rating();
        rating.set_disabled(true);
        assert_eq!(rating.attribute("disabled"), Some(""));
        assert!(rating.stars().iter().all(|s| s.disabled()));
        assert!(!rating.surface().focusable);

        rating.set_disabled(false);
        assert_eq!(rating.attribute("disabled"), None);
        assert!(rating.stars().iter().all(|s| !s.disabled()));
        assert!(rating.surface().focusable);
    }

    #[test]
    fn test_size_fans_out_and_reflects_non_default() {
        let mut rating = rating();
        rating.set_size(SizeClass::Large);
        assert_eq!(rating.attribute("size"), Some("large"));
        assert!(rating.stars().iter().all(|s| s.surface().box_px == 32));
        assert_eq!(rating.surface().layout, RatingLayout::for_size(SizeClass::Large));

        rating.set_size(SizeClass::Medium);
        assert_eq!(rating.attribute("size"), None);
        assert!(rating.stars().iter().all(|s| s.size() == SizeClass::Medium));
    }

    #[test]
    fn test_invalid_size_token_keeps_size() {
        let mut rating = rating();
        rating.set_size_token("small");
        rating.set_size_token("xlarge");
        assert_eq!(rating.size(), SizeClass::Small);
    }

    #[test]
    fn test_read_only_reflects_only() {
        let mut rating = rating();
        rating.set_read_only(true);
        assert_eq!(rating.attribute("readonly"), Some(""));
        assert!(rating.stars().iter().all(|s| !s.disabled()));
        rating.set_value(1.0);
        assert_eq!(rating.value(), 1.0);
        rating.set_read_only(false);
        assert_eq!(rating.attribute("readonly"), None);
    }

    #[test]
    fn test_colors_fan_out() {
        let mut rating = rating();
        rating.set_color("red");
        rating.set_disabled_color("gray");
        rating.set_background_color("white");
        for star in rating.stars() {
            assert_eq!(star.color(), "red");
            assert_eq!(star.disabled_color(), "gray");
            assert_eq!(star.surface().background_color, "white");
            assert_eq!(star.surface().fill_color, "red");
        }
    }

    #[test]
    fn test_color_attribute_removal_restores_theme_default() {
        let mut rating = rating();
        rating.attribute_changed("color", Some("not-a-color"));
        assert_eq!(rating.color(), "not-a-color");
        rating.attribute_changed("color", None);
        assert_eq!(rating.color(), RatingTheme::default().color);
    }

    #[test]
    fn test_attribute_bridge() {
        let mut rating = rating();
        rating.attribute_changed("value", Some("2.4"));
        assert_eq!(rating.value(), 2.4);
        rating.attribute_changed("value", Some("garbage"));
        assert!(rating.value().is_nan());

        rating.attribute_changed("disabled", Some(""));
        assert!(rating.disabled());
        rating.attribute_changed("disabled", None);
        assert!(!rating.disabled());

        rating.attribute_changed("readonly", Some(""));
        assert!(rating.read_only());

        rating.attribute_changed("size", Some("small"));
        assert_eq!(rating.size(), SizeClass::Small);
        rating.attribute_changed("size", Some("huge"));
        assert_eq!(rating.size(), SizeClass::Small);
        rating.attribute_changed("size", None);
        assert_eq!(rating.size(), SizeClass::Medium);

        rating.attribute_changed("background-color", Some("black"));
        assert_eq!(rating.background_color(), "black");
        rating.attribute_changed("disabled-color", Some("silver"));
        assert_eq!(rating.disabled_color(), "silver");
    }

    #[test]
    fn test_author_value_outside_range_is_removed() {
        for raw in ["7", "-1", "abc", ""] {
            let mut rating = rating();
            rating.attribute_changed("value", Some(raw));
            assert!(rating.value().is_nan());
            assert_eq!(rating.attribute("value"), None);
            assert_eq!(
                rating.surface().reflections.last(),
                Some(&("value".to_string(), None)),
                "{raw:?} should be removed from the host"
            );
        }
    }

    #[test]
    fn test_author_value_is_canonicalized() {
        let mut rating = rating();
        rating.attribute_changed("value", Some("2.50"));
        assert_eq!(rating.value(), 2.5);
        assert_eq!(rating.attribute("value"), Some("2.5"));

        let reflections = rating.surface().reflections.len();
        rating.attribute_changed("value", Some("2.5"));
        assert_eq!(rating.surface().reflections.len(), reflections);
    }

    #[test]
    fn test_negative_zero_reads_as_zero() {
        let mut rating = rating();
        rating.set_value(-0.0);
        assert_eq!(rating.attribute("value"), Some("0"));
        assert_eq!(rating.label(), "Rating 0 out of 5");
        assert!(rating.value().is_sign_positive());
    }

    #[test]
    fn test_unknown_attribute_ignored() {
        let mut rating = rating();
        let before = rating.snapshot();
        let writes = rating.surface().writes;
        rating.attribute_changed("title", Some("hello"));
        rating.attribute_changed("readOnly", Some(""));
        assert_eq!(rating.snapshot(), before);
        assert_eq!(rating.surface().writes, writes);
    }

    #[test]
    fn test_focus_outline_colors() {
        let mut rating = rating();
        rating.set_color("red");
        rating.set_disabled_color("gray");

        rating.focus();
        assert_eq!(rating.surface().outline.as_ref().map(|o| o.color.as_str()), Some("red"));

        rating.set_disabled(true);
        assert_eq!(rating.surface().outline.as_ref().map(|o| o.color.as_str()), Some("gray"));

        rating.blur();
        assert!(rating.surface().outline.is_none());
        assert!(!rating.is_focused());
    }

    #[test]
    fn test_outline_scales_with_size() {
        let mut rating = rating();
        rating.set_size(SizeClass::Small);
        rating.focus();
        let outline = rating.surface().outline.clone().unwrap();
        assert_eq!(outline.offset_px, SizeClass::Small.outline_offset_px());
        assert_eq!(outline.radius_px, SizeClass::Small.corner_radius_px());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut rating = rating();
        rating.set_value(1.5);
        let json = serde_json::to_value(rating.snapshot()).unwrap();
        assert_eq!(json["value"], 1.5);
        assert_eq!(json["attributes"]["value"], "1.5");
        assert_eq!(json["stars"][1]["fill_percent"], 50);
    }
}
