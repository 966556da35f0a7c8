//! Markup attribute surface of the composite rating.

use std::collections::BTreeMap;

/// Attribute names the composite reacts to. Hosts register exactly these.
pub const OBSERVED_ATTRIBUTES: [&str; 7] = [
    "value",
    "disabled",
    "size",
    "readonly",
    "color",
    "disabled-color",
    "background-color",
];

/// One entry of the observed attribute allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservedAttribute {
    Value,
    Disabled,
    Size,
    ReadOnly,
    Color,
    DisabledColor,
    BackgroundColor,
}

impl ObservedAttribute {
    /// Look up an attribute name. Names outside the allow-list are `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "value" => Some(Self::Value),
            "disabled" => Some(Self::Disabled),
            "size" => Some(Self::Size),
            "readonly" => Some(Self::ReadOnly),
            "color" => Some(Self::Color),
            "disabled-color" => Some(Self::DisabledColor),
            "background-color" => Some(Self::BackgroundColor),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Disabled => "disabled",
            Self::Size => "size",
            Self::ReadOnly => "readonly",
            Self::Color => "color",
            Self::DisabledColor => "disabled-color",
            Self::BackgroundColor => "background-color",
        }
    }
}

/// Numeric attribute parse. Anything that is not a decimal number is NaN.
pub fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Boolean attribute test: only the empty string counts as set.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw == Some("")
}

/// Decimal string form used when reflecting a number.
pub fn format_number(value: f64) -> String {
    value.to_string()
}

/// Attributes the composite has reflected onto its host element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectedAttributes {
    values: BTreeMap<&'static str, String>,
}

impl ReflectedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or remove an attribute. Returns true when the stored text changed.
    pub fn reflect(&mut self, name: &'static str, value: Option<&str>) -> bool {
        match value {
            Some(text) => {
                if self.values.get(name).map(String::as_str) == Some(text) {
                    return false;
                }
                self.values.insert(name, text.to_string());
                true
            }
            None => self.values.remove(name).is_some(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Owned copy for serialization.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_round_trips_names() {
        for name in OBSERVED_ATTRIBUTES {
            let attribute = ObservedAttribute::from_name(name).unwrap();
            assert_eq!(attribute.name(), name);
        }
        assert_eq!(ObservedAttribute::from_name("readOnly"), None);
        assert_eq!(ObservedAttribute::from_name("style"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2.4"), 2.4);
        assert_eq!(parse_number(" 3 "), 3.0);
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("").is_nan());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("")));
        assert!(!parse_flag(None));
        assert!(!parse_flag(Some("false")));
    }

    #[test]
    fn test_format_number_round_trips() {
        assert_eq!(format_number(2.4), "2.4");
        assert_eq!(format_number(3.0), "3");
        assert_eq!(parse_number(&format_number(0.1 + 0.2)), 0.1 + 0.2);
    }

    #[test]
    fn test_reflect_reports_changes() {
        let mut attrs = ReflectedAttributes::new();
        assert!(attrs.reflect("value", Some("1.5")));
        assert!(!attrs.reflect("value", Some("1.5")));
        assert_eq!(attrs.get("value"), Some("1.5"));
        assert!(attrs.reflect("value", None));
        assert!(!attrs.reflect("value", None));
        assert!(!attrs.contains("value"));
    }
}
