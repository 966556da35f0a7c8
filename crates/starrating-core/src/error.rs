//! Error types.
//!
//! Widget state transitions never fail; these only surface where a caller
//! explicitly asks for a fallible parse or load.

use thiserror::Error;

/// A size token that is not `small`, `medium` or `large`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid size class: {0}")]
pub struct ParseSizeError(pub String);

/// A star position outside 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("star ordinal out of range: {0}")]
pub struct OrdinalError(pub usize);

/// Theme configuration errors.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Theme parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid decimal separator: {0:?}")]
    Separator(String),
}
