//! Patient records and the lab views derived from them.

use labref_core::LabError;
use serde_json::Value;

mod analytics;
mod export;
mod intake;
mod patient;
mod trend;

pub use analytics::{diagnosis_distribution, search_by_condition, DiagnosisCount};
pub use export::{export_labs_csv, CsvExport};
pub use intake::{accept_reviewed_labs, review_extracted_labs, ExtractedLab, ReviewedLab};
pub use patient::{
    parse_lab_date, Complaint, Diagnosis, Gender, LabEdit, LabResult, Patient, Symptom, Treatment,
};
pub use trend::{
    available_tests, high_risk_results, lab_trend, latest_results, LabTrend, LatestLab, TrendPoint,
    TrendReference,
};

/// Load one patient record from a JSON string.
pub fn load_patient_str(record_json: &str) -> Result<Patient, LabError> {
    let value: Value =
        serde_json::from_str(record_json).map_err(|err| LabError::Parse(err.to_string()))?;
    load_patient_value(&value)
}

/// Load one patient record from a `serde_json::Value`.
pub fn load_patient_value(record: &Value) -> Result<Patient, LabError> {
    if !record.is_object() {
        return Err(LabError::Parse(format!(
            "Expected a patient object, received {}",
            json_kind(record)
        )));
    }

    let has_identity = ["id", "name"]
        .iter()
        .all(|field| record.get(*field).and_then(Value::as_str).is_some());
    if !has_identity {
        return Err(LabError::MissingData);
    }

    serde_json::from_value(record.clone()).map_err(|err| LabError::Parse(err.to_string()))
}

/// Load a list of patient records from a JSON array.
pub fn load_patients_str(records_json: &str) -> Result<Vec<Patient>, LabError> {
    let value: Value =
        serde_json::from_str(records_json).map_err(|err| LabError::Parse(err.to_string()))?;
    let records = value.as_array().ok_or(LabError::MissingData)?;
    records.iter().map(load_patient_value).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
