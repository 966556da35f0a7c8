//! Theme configuration: default colors and label formatting.

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// Default active fill color.
pub const DEFAULT_COLOR: &str = "#eba600";
/// Default fill color while disabled.
pub const DEFAULT_DISABLED_COLOR: &str = "#b0bec5";
/// Default star background color.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#d5e1e5";

/// Construction-time defaults for a rating widget.
///
/// Loaded from JSON; missing fields fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingTheme {
    pub color: String,
    pub disabled_color: String,
    pub background_color: String,
    /// Decimal mark used in the accessible label.
    pub decimal_separator: char,
    /// Build stars with pointer/keyboard affordances.
    pub interactive: bool,
}

impl Default for RatingTheme {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            disabled_color: DEFAULT_DISABLED_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            decimal_separator: '.',
            interactive: true,
        }
    }
}

impl RatingTheme {
    /// Parse a theme from JSON.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let theme: RatingTheme = serde_json::from_str(json)?;
        theme.validate()?;
        Ok(theme)
    }

    fn validate(&self) -> Result<(), ThemeError> {
        let sep = self.decimal_separator;
        if sep.is_ascii_digit() || sep.is_whitespace() || sep.is_control() {
            return Err(ThemeError::Separator(sep.to_string()));
        }
        Ok(())
    }
}
