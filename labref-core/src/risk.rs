//! Reference-range risk classification.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::find_lab_test;
use crate::types::{NormalRange, RiskLevel};

/// A lab value as typed into a form: either already numeric or raw text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl LabValue<'_> {
    /// Numeric reading; text is parsed leniently from its leading number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_nan() => None,
            Self::Number(value) => Some(*value),
            Self::Text(text) => parse_leading_float(text),
        }
    }
}

impl From<f64> for LabValue<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for LabValue<'_> {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<'a> From<&'a str> for LabValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for LabValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

/// Classify `value` for `test_name` against the reference catalog.
///
/// Unknown tests and unreadable values are `Normal`. Below the range is
/// `High` for low-is-risky markers and `Low` otherwise; above is always `High`.
pub fn calculate_risk_level<'a>(test_name: &str, value: impl Into<LabValue<'a>>) -> RiskLevel {
    let Some(reference) = find_lab_test(test_name) else {
        return RiskLevel::Normal;
    };
    let Some(value) = value.into().as_f64() else {
        return RiskLevel::Normal;
    };
    classify_against(value, &reference.normal_range, reference.low_is_risky)
}

pub fn classify_against(value: f64, range: &NormalRange, low_is_risky: bool) -> RiskLevel {
    if value < range.min {
        if low_is_risky {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    } else if value > range.max {
        RiskLevel::High
    } else {
        RiskLevel::Normal
    }
}

/// Leading decimal number or `Infinity`, as `parseFloat` reads it.
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("valid leading float pattern")
});

fn parse_leading_float(text: &str) -> Option<f64> {
    let found = LEADING_FLOAT.find(text.trim_start())?;
    found.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lab_tests;

    #[test]
    fn reference_examples() {
        assert_eq!(calculate_risk_level("Glucose", 140.0), RiskLevel::High);
        assert_eq!(calculate_risk_level("Glucose", 90.0), RiskLevel::Normal);
        assert_eq!(calculate_risk_level("Hemoglobin", 10.0), RiskLevel::High);
        assert_eq!(calculate_risk_level("HDL-C", 30.0), RiskLevel::High);
        assert_eq!(calculate_risk_level("LDL-C", 150.0), RiskLevel::High);
        assert_eq!(calculate_risk_level("Glucose", 60), RiskLevel::Low);
    }

    #[test]
    fn every_row_honours_its_direction() {
        for test in lab_tests() {
            let NormalRange { min, max } = test.normal_range;
            assert_eq!(calculate_risk_level(test.name, min), RiskLevel::Normal);
            assert_eq!(calculate_risk_level(test.name, max), RiskLevel::Normal);
            assert_eq!(calculate_risk_level(test.name, (min + max) / 2.0), RiskLevel::Normal);
            assert_eq!(calculate_risk_level(test.name, max + 1.0), RiskLevel::High);

            let expected_low = if test.low_is_risky {
                RiskLevel::High
            } else {
                RiskLevel::Low
            };
            assert_eq!(
                calculate_risk_level(test.name, min - 0.01),
                expected_low,
                "{}",
                test.name
            );
        }
    }

    #[test]
    fn unknown_tests_are_never_flagged() {
        for value in [-1000.0, 0.0, 1e9] {
            assert_eq!(calculate_risk_level("Vitamin Q", value), RiskLevel::Normal);
        }
        assert_eq!(calculate_risk_level("glucose", 500.0), RiskLevel::Normal);
    }

    #[test]
    fn text_values_are_parsed() {
        assert_eq!(calculate_risk_level("Glucose", "140"), RiskLevel::High);
        assert_eq!(calculate_risk_level("Glucose", " 85.5 mg/dL"), RiskLevel::Normal);
        assert_eq!(calculate_risk_level("Glucose", "6.5e1"), RiskLevel::Low);
        let owned = String::from("3.2");
        assert_eq!(calculate_risk_level("Albumin", &owned), RiskLevel::High);
    }

    #[test]
    fn unreadable_values_default_to_normal() {
        assert_eq!(calculate_risk_level("Glucose", "high"), RiskLevel::Normal);
        assert_eq!(calculate_risk_level("Glucose", ""), RiskLevel::Normal);
        assert_eq!(calculate_risk_level("Glucose", "."), RiskLevel::Normal);
        assert_eq!(calculate_risk_level("Glucose", f64::NAN), RiskLevel::Normal);
    }

    #[test]
    fn classification_is_stable() {
        let first = calculate_risk_level("TSH", 2.0);
        let second = calculate_risk_level("TSH", 2.0);
        assert_eq!(first, RiskLevel::Normal);
        assert_eq!(first, second);
    }

    #[test]
    fn leading_float_parser() {
        assert_eq!(parse_leading_float("12"), Some(12.0));
        assert_eq!(parse_leading_float("-0.5x"), Some(-0.5));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float(" +2.5e-1 mg/dL"), Some(0.25));
        assert_eq!(parse_leading_float("1E+3"), Some(1000.0));
    }
}
