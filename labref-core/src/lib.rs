//! Lab reference tables, risk classification and unit normalization.

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod conversion;
pub mod risk;
pub mod types;
pub mod vocabulary;

pub use catalog::{find_lab_test, group_lab_tests, lab_tests, tests_in_category, COMMON_LAB_TESTS};
pub use conversion::{
    auto_convert_lab_value, conversion_factor, inspect_conversion, ConversionStatus,
    ConvertedValue, UNIT_CONVERSIONS,
};
pub use risk::{calculate_risk_level, classify_against, LabValue};
pub use types::{LabCategory, LabTestReference, NormalRange, RiskLevel};

/// Tunables shared by the record consumers (trend, export, intake).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabConfig {
    /// Minimum number of points before a trend is worth charting.
    pub trend_min_points: usize,
    /// `chrono` format used for date columns in CSV exports.
    pub export_date_format: String,
    /// Normalize extracted values to the standard unit when accepting them.
    pub convert_on_intake: bool,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            trend_min_points: 2,
            export_date_format: "%-m/%-d/%Y".to_string(),
            convert_on_intake: false,
        }
    }
}

/// Errors raised by record handling. Classification and conversion never fail.
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    #[error("Input is missing the minimum required data")]
    MissingData,
    #[error("Could not read input: {0}")]
    Parse(String),
    #[error("No lab results to export")]
    NoLabResults,
    #[error("No lab result with id {0}")]
    UnknownLab(String),
    #[error("Other error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: LabConfig = serde_json::from_str(r#"{ "trend_min_points": 3 }"#).unwrap();
        assert_eq!(cfg.trend_min_points, 3);
        assert_eq!(cfg.export_date_format, "%-m/%-d/%Y");
        assert!(!cfg.convert_on_intake);
    }
}
