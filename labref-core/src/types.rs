//! Shared types for the reference catalog and classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity attached to a lab result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RiskLevel {
    Low,
    #[default]
    Normal,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Panel grouping used by the lab picker and the hub list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LabCategory {
    #[serde(rename = "CBC")]
    Cbc,
    #[serde(rename = "Metabolic Panel")]
    MetabolicPanel,
    #[serde(rename = "Lipid Panel")]
    LipidPanel,
    #[serde(rename = "Liver Function")]
    LiverFunction,
    #[serde(rename = "Nutritional")]
    Nutritional,
    #[serde(rename = "Hormonal")]
    Hormonal,
    #[serde(rename = "Cardiac & Vascular")]
    CardiacVascular,
    #[serde(rename = "Kidney Function")]
    KidneyFunction,
    #[serde(rename = "Inflammation & Immune")]
    InflammationImmune,
    #[serde(rename = "Bone & Muscle")]
    BoneMuscle,
    #[serde(rename = "Electrolytes")]
    Electrolytes,
    #[serde(rename = "Other")]
    Other,
}

impl LabCategory {
    pub const ALL: [LabCategory; 12] = [
        Self::Cbc,
        Self::MetabolicPanel,
        Self::LipidPanel,
        Self::LiverFunction,
        Self::Nutritional,
        Self::Hormonal,
        Self::CardiacVascular,
        Self::KidneyFunction,
        Self::InflammationImmune,
        Self::BoneMuscle,
        Self::Electrolytes,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cbc => "CBC",
            Self::MetabolicPanel => "Metabolic Panel",
            Self::LipidPanel => "Lipid Panel",
            Self::LiverFunction => "Liver Function",
            Self::Nutritional => "Nutritional",
            Self::Hormonal => "Hormonal",
            Self::CardiacVascular => "Cardiac & Vascular",
            Self::KidneyFunction => "Kidney Function",
            Self::InflammationImmune => "Inflammation & Immune",
            Self::BoneMuscle => "Bone & Muscle",
            Self::Electrolytes => "Electrolytes",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for LabCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinically normal bounds, expressed in the test's standard unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NormalRange {
    pub min: f64,
    pub max: f64,
}

impl NormalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One row of the reference catalog.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabTestReference {
    pub name: &'static str,
    pub category: LabCategory,
    pub unit: &'static str,
    pub standard_unit: &'static str,
    pub normal_range: NormalRange,
    /// A value under the range is the dangerous direction (e.g. anemia markers).
    pub low_is_risky: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_as_display_name() {
        let json = serde_json::to_string(&LabCategory::InflammationImmune).unwrap();
        assert_eq!(json, "\"Inflammation & Immune\"");
        let back: LabCategory = serde_json::from_str("\"Cardiac & Vascular\"").unwrap();
        assert_eq!(back, LabCategory::CardiacVascular);
    }

    #[test]
    fn risk_level_round_trips_capitalized() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"High\"");
        let low: RiskLevel = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(low, RiskLevel::Low);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = NormalRange::new(70.0, 99.0);
        assert!(range.contains(70.0));
        assert!(range.contains(99.0));
        assert!(!range.contains(99.01));
        assert!(!range.contains(f64::NAN));
    }
}
