//! Replay scripts: a JSON list of markup mutations, property writes and
//! focus/input events applied to one rating widget.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use starrating_core::{PlatformEvent, RatingTheme, StarOrdinal, ThemeError};
use starrating_render::RenderError;
use thiserror::Error;

/// Script loading and replay errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Script parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Theme error: {0}")]
    Theme(#[from] ThemeError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// One replay step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Markup attribute set, as an author editing the element would.
    SetAttribute { name: String, value: String },
    /// Markup attribute removal.
    RemoveAttribute { name: String },
    /// Property write. `null` stands for NaN.
    SetValue { value: Option<f64> },
    SetDisabled { disabled: bool },
    SetReadOnly { read_only: bool },
    /// Untyped size write; unknown tokens are ignored by the widget.
    SetSize { size: String },
    SetColor { color: String },
    SetDisabledColor { color: String },
    SetBackgroundColor { color: String },
    Focus,
    Blur,
    /// Platform input delivered to one star.
    Star { ordinal: StarOrdinal, event: PlatformEvent },
    /// Pointer input at a position in row coordinates, routed to the star
    /// whose outline contains it.
    Pointer { x: f64, y: f64, event: PlatformEvent },
}

/// Parse a script from JSON text.
pub fn parse_script(json: &str) -> Result<Vec<Step>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Vec<Step>, ScriptError> {
    let text = fs::read_to_string(path)?;
    parse_script(&text)
}

/// Read a theme file, or the default theme when no path is given.
pub fn load_theme(path: Option<&Path>) -> Result<RatingTheme, ScriptError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(RatingTheme::from_json(&text)?)
        }
        None => Ok(RatingTheme::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starrating_core::Key;
    use std::io::Write;

    #[test]
    fn test_parse_steps() {
        let steps = parse_script(
            r#"[
                {"op": "set_attribute", "name": "value", "value": "3.5"},
                {"op": "remove_attribute", "name": "disabled"},
                {"op": "set_value", "value": null},
                {"op": "set_size", "size": "large"},
                {"op": "focus"},
                {"op": "star", "ordinal": 2, "event": {"type": "key_down", "key": "Enter"}},
                {"op": "pointer", "x": 12.0, "y": 12.0, "event": {"type": "click"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 7);
        assert_eq!(steps[2], Step::SetValue { value: None });
        assert_eq!(
            steps[5],
            Step::Star {
                ordinal: StarOrdinal::new(2).unwrap(),
                event: PlatformEvent::KeyDown { key: Key::Enter },
            }
        );
        assert_eq!(
            steps[6],
            Step::Pointer {
                x: 12.0,
                y: 12.0,
                event: PlatformEvent::Click,
            }
        );
    }

    #[test]
    fn test_out_of_range_ordinal_rejected() {
        let err = parse_script(r#"[{"op": "star", "ordinal": 6, "event": {"type": "click"}}]"#);
        assert!(matches!(err, Err(ScriptError::Parse(_))));
    }

    #[test]
    fn test_load_script_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"op": "blur"}}]"#).unwrap();
        let steps = load_script(file.path()).unwrap();
        assert_eq!(steps, vec![Step::Blur]);
    }

    #[test]
    fn test_load_theme() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"color": "red"}}"#).unwrap();
        let theme = load_theme(Some(file.path())).unwrap();
        assert_eq!(theme.color, "red");
        assert_eq!(load_theme(None).unwrap(), RatingTheme::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_script(Path::new("/nonexistent/script.json"));
        assert!(matches!(err, Err(ScriptError::Io(_))));
    }
}
