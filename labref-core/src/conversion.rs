//! Alternate-unit to standard-unit conversion.

use serde::{Deserialize, Serialize};

use crate::catalog::find_lab_test;

/// Multipliers from a source unit into the test's standard unit.
pub static UNIT_CONVERSIONS: &[(&str, &[(&str, f64)])] = &[
    ("Glucose", &[("mmol/L", 18.0182), ("mg/dL", 1.0)]),
    ("Total Cholesterol", &[("mmol/L", 38.67), ("mg/dL", 1.0)]),
    ("HDL-C", &[("mmol/L", 38.67), ("mg/dL", 1.0)]),
    ("LDL-C", &[("mmol/L", 38.67), ("mg/dL", 1.0)]),
    ("Triglycerides", &[("mmol/L", 88.57), ("mg/dL", 1.0)]),
    ("Creatinine", &[("µmol/L", 0.0113), ("mg/dL", 1.0)]),
    ("Uric Acid", &[("µmol/L", 0.0168), ("mg/dL", 1.0)]),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedValue {
    pub converted_value: f64,
    pub is_converted: bool,
}

impl ConvertedValue {
    fn unchanged(value: f64) -> Self {
        Self {
            converted_value: value,
            is_converted: false,
        }
    }
}

/// Why a value was (or was not) converted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionStatus {
    Converted { factor: f64 },
    AlreadyStandard,
    UnknownTest,
    NoConversionGroup,
    UnrecognizedUnit,
}

pub fn conversion_factor(test_name: &str, from_unit: &str) -> Option<f64> {
    UNIT_CONVERSIONS
        .iter()
        .find(|(name, _)| *name == test_name)
        .and_then(|(_, factors)| factors.iter().find(|(unit, _)| *unit == from_unit))
        .map(|(_, factor)| *factor)
        .filter(|factor| *factor != 0.0)
}

/// Classify a conversion attempt without performing it.
pub fn inspect_conversion(test_name: &str, from_unit: &str) -> ConversionStatus {
    let Some(reference) = find_lab_test(test_name) else {
        return ConversionStatus::UnknownTest;
    };
    if from_unit == reference.standard_unit {
        return ConversionStatus::AlreadyStandard;
    }
    if !UNIT_CONVERSIONS.iter().any(|(name, _)| *name == test_name) {
        return ConversionStatus::NoConversionGroup;
    }
    match conversion_factor(test_name, from_unit) {
        Some(factor) => ConversionStatus::Converted { factor },
        None => ConversionStatus::UnrecognizedUnit,
    }
}

/// Convert `value` from `from_unit` into the catalog's standard unit.
///
/// Unknown tests, values already in the standard unit and units without a
/// known factor pass through with `is_converted == false`.
pub fn auto_convert_lab_value(test_name: &str, value: f64, from_unit: &str) -> ConvertedValue {
    match inspect_conversion(test_name, from_unit) {
        ConversionStatus::Converted { factor } => {
            let converted = round_hundredths(value * factor);
            tracing::debug!(test = test_name, from_unit, value, converted, "lab value converted");
            ConvertedValue {
                converted_value: converted,
                is_converted: true,
            }
        }
        ConversionStatus::AlreadyStandard => ConvertedValue::unchanged(value),
        status => {
            tracing::debug!(test = test_name, from_unit, ?status, "lab value left unconverted");
            ConvertedValue::unchanged(value)
        }
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
