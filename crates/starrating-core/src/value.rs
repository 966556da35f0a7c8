//! Rating values, fill fractions and the five-star decomposition.

use serde::{Deserialize, Serialize};

/// Number of stars in a composite rating.
pub const STAR_COUNT: usize = 5;

/// Highest representable rating.
pub const MAX_RATING: f64 = STAR_COUNT as f64;

/// The rating held by a composite.
///
/// `Unset` is distinct from `Rated(0.0)`: it means no value has been chosen.
/// At the script boundary it is represented as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingValue {
    #[default]
    Unset,
    Rated(f64),
}

impl RatingValue {
    /// Normalize a raw number. NaN and anything outside [0, 5] become `Unset`.
    /// Values are never clamped.
    pub fn from_raw(raw: f64) -> Self {
        if (0.0..=MAX_RATING).contains(&raw) {
            // -0.0 is stored as 0.0.
            Self::Rated(if raw == 0.0 { 0.0 } else { raw })
        } else {
            Self::Unset
        }
    }

    /// The raw number, NaN when unset.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Unset => f64::NAN,
            Self::Rated(v) => v,
        }
    }

    /// The rating, if one is set.
    pub fn get(self) -> Option<f64> {
        match self {
            Self::Unset => None,
            Self::Rated(v) => Some(v),
        }
    }

    pub fn is_unset(self) -> bool {
        matches!(self, Self::Unset)
    }
}

/// Raw-number identity used for setter change suppression: NaN matches NaN.
pub fn same_raw(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Portion of a single star rendered as filled, always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FillFraction(f64);

impl FillFraction {
    pub const EMPTY: FillFraction = FillFraction(0.0);
    pub const FULL: FillFraction = FillFraction(1.0);

    /// NaN or anything outside [0, 1] becomes 0, not the nearest bound.
    pub fn normalize(raw: f64) -> Self {
        if (0.0..=1.0).contains(&raw) {
            Self(raw)
        } else {
            Self::EMPTY
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Visible fill width as an integer percentage. Truncates: 0.99 is 99.
    pub fn percent(self) -> u32 {
        fill_percent(self.0)
    }
}

/// `floor(fraction * 100)` for a fraction already known to be in [0, 1].
pub fn fill_percent(fraction: f64) -> u32 {
    (fraction * 100.0).floor() as u32
}

/// Round to one decimal digit.
pub fn round_to_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Split a rating into one fill fraction per star, first star first.
///
/// Stars numbered at or below the rating are full, the star right after the
/// last full one gets the remainder rounded to a tenth, the rest are empty.
pub fn star_fractions(value: RatingValue) -> [f64; STAR_COUNT] {
    let Some(v) = value.get() else {
        return [0.0; STAR_COUNT];
    };
    let whole = v.floor();
    std::array::from_fn(|index| {
        let number = (index + 1) as f64;
        if number <= v {
            1.0
        } else if number == whole + 1.0 {
            round_to_tenth(v - whole)
        } else {
            0.0
        }
    })
}

/// Format a number for a human-readable label: at most three fraction
/// digits, trailing zeros dropped, `separator` as the decimal mark.
pub fn format_for_label(value: f64, separator: char) -> String {
    let fixed = format!("{value:.3}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if separator == '.' {
        trimmed.to_string()
    } else {
        trimmed.replace('.', &separator.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fractions(actual: [f64; STAR_COUNT], expected: [f64; STAR_COUNT]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < f64::EPSILON, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_from_raw_normalizes_out_of_range() {
        assert_eq!(RatingValue::from_raw(2.5), RatingValue::Rated(2.5));
        assert_eq!(RatingValue::from_raw(0.0), RatingValue::Rated(0.0));
        assert_eq!(RatingValue::from_raw(5.0), RatingValue::Rated(5.0));
        assert_eq!(RatingValue::from_raw(-0.1), RatingValue::Unset);
        assert_eq!(RatingValue::from_raw(5.01), RatingValue::Unset);
        assert_eq!(RatingValue::from_raw(f64::NAN), RatingValue::Unset);
        assert_eq!(RatingValue::from_raw(f64::INFINITY), RatingValue::Unset);
        let zero = RatingValue::from_raw(-0.0).as_f64();
        assert!(zero == 0.0 && zero.is_sign_positive());
    }

    #[test]
    fn test_unset_equals_unset() {
        assert_eq!(RatingValue::Unset, RatingValue::Unset);
        assert!(RatingValue::Unset.as_f64().is_nan());
        assert!(same_raw(f64::NAN, f64::NAN));
        assert!(!same_raw(f64::NAN, 0.0));
        assert!(same_raw(3.5, 3.5));
    }

    #[test]
    fn test_fill_fraction_normalize() {
        assert_eq!(FillFraction::normalize(0.4).get(), 0.4);
        assert_eq!(FillFraction::normalize(1.0), FillFraction::FULL);
        assert_eq!(FillFraction::normalize(1.5), FillFraction::EMPTY);
        assert_eq!(FillFraction::normalize(-0.2), FillFraction::EMPTY);
        assert_eq!(FillFraction::normalize(f64::NAN), FillFraction::EMPTY);
    }

    #[test]
    fn test_fill_percent_truncates() {
        assert_eq!(fill_percent(0.119), 11);
        assert_eq!(fill_percent(0.99), 99);
        assert_eq!(fill_percent(1.0), 100);
        assert_eq!(fill_percent(0.0), 0);
        assert_eq!(FillFraction::normalize(0.7).percent(), 70);
    }

    #[test]
    fn test_decompose_partial() {
        assert_fractions(
            star_fractions(RatingValue::Rated(3.7)),
            [1.0, 1.0, 1.0, 0.7, 0.0],
        );
    }

    #[test]
    fn test_decompose_whole_numbers() {
        assert_fractions(
            star_fractions(RatingValue::Rated(4.0)),
            [1.0, 1.0, 1.0, 1.0, 0.0],
        );
        assert_fractions(star_fractions(RatingValue::Rated(5.0)), [1.0; 5]);
        assert_fractions(star_fractions(RatingValue::Rated(0.0)), [0.0; 5]);
    }

    #[test]
    fn test_decompose_rounds_partial_to_tenth() {
        assert_fractions(
            star_fractions(RatingValue::Rated(1.44)),
            [1.0, 0.4, 0.0, 0.0, 0.0],
        );
        assert_fractions(
            star_fractions(RatingValue::Rated(0.25)),
            [0.3, 0.0, 0.0, 0.0, 0.0],
        );
    }

    #[test]
    fn test_decompose_unset() {
        assert_fractions(star_fractions(RatingValue::Unset), [0.0; 5]);
    }

    #[test]
    fn test_format_for_label() {
        assert_eq!(format_for_label(3.7, '.'), "3.7");
        assert_eq!(format_for_label(4.0, '.'), "4");
        assert_eq!(format_for_label(2.125, ','), "2,125");
        assert_eq!(format_for_label(0.0, '.'), "0");
    }
}
