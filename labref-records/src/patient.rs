use chrono::{DateTime, NaiveDate};
use labref_core::{calculate_risk_level, LabError, RiskLevel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A patient record as persisted by the dashboard.
///
/// Fields this crate does not model (imaging studies, saved AI summaries...)
/// are kept in `extra` so the record round-trips unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
    #[serde(default)]
    pub complaints: Vec<Complaint>,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
    #[serde(default)]
    pub lab_results: Vec<LabResult>,
    #[serde(default)]
    pub diagnoses: Vec<Diagnosis>,
    #[serde(default)]
    pub treatments: Vec<Treatment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    pub id: String,
    pub test_name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    /// ISO date (`2024-05-18`) or timestamp, as stored.
    pub date: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_range_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_range_max: Option<f64>,
}

impl LabResult {
    pub fn recorded_on(&self) -> Option<NaiveDate> {
        parse_lab_date(&self.date)
    }

    /// Reclassify against the catalog. Returns `true` when the level changed.
    pub fn recompute_risk(&mut self) -> bool {
        let level = calculate_risk_level(&self.test_name, self.value);
        let changed = level != self.risk_level;
        self.risk_level = level;
        changed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Complaint {
    pub id: String,
    pub text: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Symptom {
    pub id: String,
    pub name: String,
    /// 1-10
    pub severity: u8,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnosis {
    pub id: String,
    pub condition: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: String,
    pub medication: String,
    #[serde(default)]
    pub dosage: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// A single-field change to a stored lab result.
#[derive(Debug, Clone, PartialEq)]
pub enum LabEdit {
    TestName(String),
    Value(f64),
    Unit(String),
    Date(String),
}

impl Patient {
    pub fn lab(&self, id: &str) -> Option<&LabResult> {
        self.lab_results.iter().find(|lab| lab.id == id)
    }

    /// Recompute every stored risk level. Returns how many changed.
    pub fn reclassify_labs(&mut self) -> usize {
        let mut changed = 0;
        for lab in &mut self.lab_results {
            let before = lab.risk_level;
            if lab.recompute_risk() {
                tracing::debug!(
                    patient = %self.id,
                    lab = %lab.id,
                    test = %lab.test_name,
                    %before,
                    after = %lab.risk_level,
                    "lab risk level changed"
                );
                changed += 1;
            }
        }
        changed
    }

    /// Apply one edit; risk is recomputed when the test name or value changes.
    pub fn edit_lab(&mut self, id: &str, edit: LabEdit) -> Result<&LabResult, LabError> {
        let lab = self
            .lab_results
            .iter_mut()
            .find(|lab| lab.id == id)
            .ok_or_else(|| LabError::UnknownLab(id.to_string()))?;

        let reclassify = matches!(edit, LabEdit::TestName(_) | LabEdit::Value(_));
        match edit {
            LabEdit::TestName(name) => lab.test_name = name,
            LabEdit::Value(value) => lab.value = value,
            LabEdit::Unit(unit) => lab.unit = unit,
            LabEdit::Date(date) => lab.date = date,
        }
        if reclassify {
            lab.recompute_risk();
        }

        Ok(lab)
    }

    pub fn remove_lab(&mut self, id: &str) -> Result<LabResult, LabError> {
        let index = self
            .lab_results
            .iter()
            .position(|lab| lab.id == id)
            .ok_or_else(|| LabError::UnknownLab(id.to_string()))?;
        Ok(self.lab_results.remove(index))
    }
}

/// Read the calendar date of a stored lab date (plain date or RFC 3339).
pub fn parse_lab_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.date_naive())
                .ok()
        })
        .or_else(|| {
            value
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Patient {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Lan Tran",
            "dob": "1970-02-01",
            "gender": "Female",
            "labResults": [
                { "id": "l1", "testName": "Glucose", "value": 140, "unit": "mg/dL",
                  "date": "2024-08-01", "riskLevel": "Normal" },
                { "id": "l2", "testName": "Hemoglobin", "value": 13.1, "unit": "g/dL",
                  "date": "2024-08-01", "riskLevel": "Normal" }
            ],
            "imagingStudies": [{ "id": "i1", "type": "MRI" }]
        }))
        .unwrap()
    }

    #[test]
    fn unknown_fields_round_trip() {
        let patient = sample();
        assert!(patient.extra.contains_key("imagingStudies"));
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["imagingStudies"][0]["type"], "MRI");
        assert_eq!(json["labResults"][0]["testName"], "Glucose");
    }

    #[test]
    fn reclassify_counts_changes() {
        let mut patient = sample();
        assert_eq!(patient.reclassify_labs(), 1);
        assert_eq!(patient.lab_results[0].risk_level, RiskLevel::High);
        assert_eq!(patient.reclassify_labs(), 0);
    }

    #[test]
    fn edits_recompute_only_on_name_or_value() {
        let mut patient = sample();
        let lab = patient.edit_lab("l2", LabEdit::Value(9.0)).unwrap();
        assert_eq!(lab.risk_level, RiskLevel::High);

        let lab = patient.edit_lab("l2", LabEdit::Unit("g/L".into())).unwrap();
        assert_eq!(lab.risk_level, RiskLevel::High);
        assert_eq!(lab.unit, "g/L");

        let lab = patient.edit_lab("l2", LabEdit::TestName("MCV".into())).unwrap();
        assert_eq!(lab.risk_level, RiskLevel::Low);

        assert!(matches!(
            patient.edit_lab("missing", LabEdit::Value(1.0)),
            Err(LabError::UnknownLab(id)) if id == "missing"
        ));
    }

    #[test]
    fn remove_lab_by_id() {
        let mut patient = sample();
        let removed = patient.remove_lab("l1").unwrap();
        assert_eq!(removed.test_name, "Glucose");
        assert_eq!(patient.lab_results.len(), 1);
        assert!(patient.remove_lab("l1").is_err());
    }

    #[test]
    fn lab_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 18);
        assert_eq!(parse_lab_date("2024-05-18"), expected);
        assert_eq!(parse_lab_date("2024-05-18T09:30:00Z"), expected);
        assert_eq!(parse_lab_date("2024-05-18T09:30:00.000"), expected);
        assert_eq!(parse_lab_date("May 18"), None);
    }
}
