//! Single-star widget.
//!
//! A [`StarUnit`] owns one fill fraction plus its size, colors and disabled
//! flag, and pushes the derived visual state into its [`StarSurface`]. An
//! interactive star additionally turns platform input into [`StarEvent`]s.

use serde::Serialize;

use crate::events::{
    DocumentListeners, EventOutcome, EventSink, KeyListenerGuard, PlatformEvent, StarEvent,
    StarEventKind, StarOrdinal,
};
use crate::size::SizeClass;
use crate::surface::{Affordance, StarSurface};
use crate::theme::RatingTheme;
use crate::value::{FillFraction, same_raw};

/// Pointer/keyboard state of an interactive star.
#[derive(Debug)]
struct Interaction {
    listeners: DocumentListeners,
    /// Present exactly while the star holds focus.
    key_listener: Option<KeyListenerGuard>,
    hovered: bool,
}

/// One partially fillable star.
#[derive(Debug)]
pub struct StarUnit<S: StarSurface> {
    ordinal: StarOrdinal,
    value: FillFraction,
    size: SizeClass,
    color: String,
    disabled_color: String,
    background_color: String,
    disabled: bool,
    surface: S,
    interaction: Option<Interaction>,
}

/// Serializable view of a star's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarSnapshot {
    pub ordinal: StarOrdinal,
    pub value: f64,
    pub fill_percent: u32,
    pub size: SizeClass,
    pub painted_color: String,
    pub background_color: String,
    pub disabled: bool,
    pub affordance: Affordance,
}

impl<S: StarSurface> StarUnit<S> {
    /// A display-only star.
    pub fn new(ordinal: StarOrdinal, surface: S, theme: &RatingTheme) -> Self {
        Self::build(ordinal, surface, theme, None)
    }

    /// A star that emits hover and activation notifications.
    pub fn interactive(
        ordinal: StarOrdinal,
        surface: S,
        theme: &RatingTheme,
        listeners: DocumentListeners,
    ) -> Self {
        let interaction = Interaction {
            listeners,
            key_listener: None,
            hovered: false,
        };
        Self::build(ordinal, surface, theme, Some(interaction))
    }

    fn build(
        ordinal: StarOrdinal,
        surface: S,
        theme: &RatingTheme,
        interaction: Option<Interaction>,
    ) -> Self {
        let mut star = Self {
            ordinal,
            value: FillFraction::EMPTY,
            size: SizeClass::default(),
            color: theme.color.clone(),
            disabled_color: theme.disabled_color.clone(),
            background_color: theme.background_color.clone(),
            disabled: false,
            surface,
            interaction,
        };
        // The whole primitive tree is initialized up front.
        star.surface.set_box_size(star.size.star_px());
        star.surface.set_background_color(&star.background_color);
        star.surface.set_fill_width(star.value.percent());
        star.paint_fill();
        star.refresh_affordance();
        star
    }

    pub fn ordinal(&self) -> StarOrdinal {
        self.ordinal
    }

    /// Current fill fraction in [0, 1].
    pub fn value(&self) -> f64 {
        self.value.get()
    }

    /// Visible fill width in percent.
    pub fn fill_percent(&self) -> u32 {
        self.value.percent()
    }

    /// Set the fill fraction. NaN or out-of-range input becomes 0.
    pub fn set_value(&mut self, value: f64) {
        if same_raw(self.value.get(), value) {
            return;
        }
        self.value = FillFraction::normalize(value);
        self.surface.set_fill_width(self.value.percent());
    }

    pub fn size(&self) -> SizeClass {
        self.size
    }

    pub fn set_size(&mut self, size: SizeClass) {
        if self.size == size {
            return;
        }
        self.size = size;
        self.surface.set_box_size(size.star_px());
    }

    /// Untyped size setter. Unknown tokens leave the size unchanged.
    pub fn set_size_token(&mut self, token: &str) {
        match SizeClass::parse(token) {
            Some(size) => self.set_size(size),
            None => log::trace!("Star {} ignoring size {:?}", self.ordinal, token),
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Active fill color. Latent while disabled.
    pub fn set_color(&mut self, color: &str) {
        if self.color == color {
            return;
        }
        self.color = color.to_string();
        if !self.disabled {
            self.paint_fill();
        }
    }

    pub fn disabled_color(&self) -> &str {
        &self.disabled_color
    }

    /// Fill color used while disabled. Latent while enabled.
    pub fn set_disabled_color(&mut self, color: &str) {
        if self.disabled_color == color {
            return;
        }
        self.disabled_color = color.to_string();
        if self.disabled {
            self.paint_fill();
        }
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn set_background_color(&mut self, color: &str) {
        if self.background_color == color {
            return;
        }
        self.background_color = color.to_string();
        self.surface.set_background_color(&self.background_color);
    }

    /// Color currently painted on the value rectangle.
    pub fn painted_color(&self) -> &str {
        if self.disabled {
            &self.disabled_color
        } else {
            &self.color
        }
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled == disabled {
            return;
        }
        self.disabled = disabled;
        self.paint_fill();
        if disabled {
            if let Some(interaction) = self.interaction.as_mut() {
                interaction.key_listener = None;
                interaction.hovered = false;
            }
        }
        self.refresh_affordance();
    }

    pub fn is_interactive(&self) -> bool {
        self.interaction.is_some()
    }

    /// Whether the star holds keyboard focus.
    pub fn has_focus(&self) -> bool {
        self.interaction
            .as_ref()
            .is_some_and(|i| i.key_listener.is_some())
    }

    pub fn is_hovered(&self) -> bool {
        self.interaction.as_ref().is_some_and(|i| i.hovered)
    }

    /// Affordances currently offered to the host element.
    pub fn affordance(&self) -> Affordance {
        if self.is_interactive() && !self.disabled {
            Affordance::interactive(self.ordinal)
        } else {
            Affordance::NONE
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Feed a platform event to the star.
    ///
    /// Display-only and disabled stars ignore everything. Enter and Space
    /// activate only while the star holds focus, and only then is the
    /// platform default suppressed.
    pub fn handle_event(&mut self, event: &PlatformEvent, sink: &mut impl EventSink) -> EventOutcome {
        if self.disabled {
            return EventOutcome::IGNORED;
        }
        let ordinal = self.ordinal;
        let Some(interaction) = self.interaction.as_mut() else {
            return EventOutcome::IGNORED;
        };

        match event {
            PlatformEvent::Focus => {
                if interaction.key_listener.is_none() {
                    interaction.key_listener = Some(interaction.listeners.acquire(ordinal));
                }
                EventOutcome::IGNORED
            }
            PlatformEvent::Blur => {
                interaction.key_listener = None;
                EventOutcome::IGNORED
            }
            PlatformEvent::PointerEnter => {
                interaction.hovered = true;
                sink.emit(StarEvent::new(StarEventKind::HoverEnter, ordinal));
                EventOutcome::IGNORED
            }
            PlatformEvent::PointerLeave => {
                interaction.hovered = false;
                sink.emit(StarEvent::new(StarEventKind::HoverLeave, ordinal));
                EventOutcome::IGNORED
            }
            PlatformEvent::Click => {
                sink.emit(StarEvent::new(StarEventKind::Activate, ordinal));
                EventOutcome::IGNORED
            }
            PlatformEvent::KeyDown { key } => {
                if interaction.key_listener.is_some() && key.activates() {
                    sink.emit(StarEvent::new(StarEventKind::Activate, ordinal));
                    EventOutcome::prevent_default()
                } else {
                    EventOutcome::IGNORED
                }
            }
        }
    }

    pub fn snapshot(&self) -> StarSnapshot {
        StarSnapshot {
            ordinal: self.ordinal,
            value: self.value.get(),
            fill_percent: self.fill_percent(),
            size: self.size,
            painted_color: self.painted_color().to_string(),
            background_color: self.background_color.clone(),
            disabled: self.disabled,
            affordance: self.affordance(),
        }
    }

    fn paint_fill(&mut self) {
        let color = if self.disabled {
            &self.disabled_color
        } else {
            &self.color
        };
        self.surface.set_fill_color(color);
    }

    fn refresh_affordance(&mut self) {
        let affordance = self.affordance();
        self.surface.set_affordance(&affordance);
    }
}
