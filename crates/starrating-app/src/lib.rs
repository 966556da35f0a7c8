//! Star rating application shell.
//!
//! Natively this replays JSON scripts of markup mutations and input events
//! against an in-memory widget. On the web it exposes the widget as a
//! custom-element backing object.

mod script;
mod session;

pub use script::{ScriptError, Step, load_script, load_theme, parse_script};
pub use session::{Session, StarPaintSummary, StepReport};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{StarRatingElement, start_wasm};
