//! StarRating Render Library
//!
//! The visual-primitive layer beneath the rating widget: the star outline,
//! row layout, pointer hit testing, color resolution and paint lists.

pub mod geometry;
pub mod paint;

pub use geometry::{RowLayout, STAR_PATH, star_outline};
pub use paint::{PaintList, StarPaint, paint_color, resolve_color};

use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid star outline: {0}")]
    Outline(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
