//! StarRating Core Library
//!
//! Platform-agnostic state synchronization for a five-star rating widget:
//! markup attributes, typed properties, and the visual/accessibility state
//! fanned out from one composite to its five stars.

pub mod attributes;
pub mod error;
pub mod events;
pub mod rating;
pub mod size;
pub mod star;
pub mod surface;
pub mod theme;
pub mod value;

pub use attributes::{OBSERVED_ATTRIBUTES, ObservedAttribute, ReflectedAttributes};
pub use error::{OrdinalError, ParseSizeError, ThemeError};
pub use events::{
    DocumentListeners, EventOutcome, EventSink, Key, KeyListenerGuard, KeyListenerHost,
    ListenerId, MemoryKeyListeners, PlatformEvent, StarEvent, StarEventKind, StarOrdinal,
};
pub use rating::{CompositeRating, RatingSnapshot};
pub use size::SizeClass;
pub use star::{StarSnapshot, StarUnit};
pub use surface::{
    Affordance, Cursor, FocusOutline, MemoryRatingSurface, MemoryStarSurface, RatingLayout,
    RatingSurface, StarLabel, StarSurface,
};
pub use theme::RatingTheme;
pub use value::{FillFraction, RatingValue, STAR_COUNT};
