//! Review and acceptance of lab rows extracted from scanned documents.

use chrono::NaiveDate;
use labref_core::{auto_convert_lab_value, calculate_risk_level, find_lab_test, LabConfig, RiskLevel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patient::{LabResult, Patient};

/// Raw `{testName, value, unit, date}` tuple produced by document extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLab {
    pub test_name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    pub date: String,
}

/// An extracted row awaiting confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedLab {
    pub test_name: String,
    pub value: f64,
    pub unit: String,
    pub date: String,
    pub risk_level: RiskLevel,
    pub is_selected: bool,
}

impl ReviewedLab {
    pub fn set_test_name(&mut self, name: impl Into<String>) {
        self.test_name = name.into();
        self.risk_level = calculate_risk_level(&self.test_name, self.value);
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
        self.risk_level = calculate_risk_level(&self.test_name, self.value);
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.unit = unit.into();
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn toggle(&mut self) {
        self.is_selected = !self.is_selected;
    }
}

impl From<ExtractedLab> for ReviewedLab {
    fn from(lab: ExtractedLab) -> Self {
        let risk_level = calculate_risk_level(&lab.test_name, lab.value);
        Self {
            test_name: lab.test_name,
            value: lab.value,
            unit: lab.unit,
            date: lab.date,
            risk_level,
            is_selected: true,
        }
    }
}

/// Classify extracted rows for review; every row starts selected.
pub fn review_extracted_labs(extracted: Vec<ExtractedLab>) -> Vec<ReviewedLab> {
    extracted.into_iter().map(ReviewedLab::from).collect()
}

/// Append the selected rows to the patient's labs and return their new ids.
pub fn accept_reviewed_labs(
    patient: &mut Patient,
    reviewed: &[ReviewedLab],
    config: &LabConfig,
) -> Vec<String> {
    let mut ids = Vec::new();

    for row in reviewed.iter().filter(|row| row.is_selected) {
        let (value, unit) = if config.convert_on_intake {
            normalize_unit(&row.test_name, row.value, &row.unit)
        } else {
            (row.value, row.unit.clone())
        };

        let mut lab = LabResult {
            id: new_lab_id(),
            test_name: row.test_name.clone(),
            value,
            unit,
            date: row.date.clone(),
            risk_level: RiskLevel::Normal,
            interpretation: None,
            reference_range_min: None,
            reference_range_max: None,
        };
        lab.recompute_risk();
        ids.push(lab.id.clone());
        patient.lab_results.push(lab);
    }

    tracing::info!(
        patient = %patient.id,
        accepted = ids.len(),
        skipped = reviewed.len() - ids.len(),
        "extracted labs accepted"
    );
    ids
}

impl Patient {
    /// Add empty rows for the picked tests, dated `on`, in their standard unit.
    pub fn add_blank_labs(&mut self, names: &[&str], on: NaiveDate) -> Vec<String> {
        let date = on.format("%Y-%m-%d").to_string();
        names
            .iter()
            .map(|name| {
                let lab = LabResult {
                    id: new_lab_id(),
                    test_name: (*name).to_string(),
                    value: 0.0,
                    unit: find_lab_test(name)
                        .map(|reference| reference.standard_unit.to_string())
                        .unwrap_or_default(),
                    date: date.clone(),
                    risk_level: calculate_risk_level(name, 0.0),
                    interpretation: None,
                    reference_range_min: None,
                    reference_range_max: None,
                };
                let id = lab.id.clone();
                self.lab_results.push(lab);
                id
            })
            .collect()
    }
}

fn normalize_unit(test_name: &str, value: f64, unit: &str) -> (f64, String) {
    let converted = auto_convert_lab_value(test_name, value, unit);
    match find_lab_test(test_name) {
        Some(reference) if converted.is_converted => {
            (converted.converted_value, reference.standard_unit.to_string())
        }
        _ => (value, unit.to_string()),
    }
}

fn new_lab_id() -> String {
    format!("l-{}", Uuid::new_v4())
}
