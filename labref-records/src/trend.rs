//! Trend series and hub lists built from a patient's lab results.

use std::cmp::Ordering;

use chrono::NaiveDate;
use labref_core::{find_lab_test, LabCategory, LabConfig, RiskLevel};
use serde::{Deserialize, Serialize};

use crate::patient::{LabResult, Patient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub lab_id: String,
    pub date: String,
    pub recorded_on: Option<NaiveDate>,
    pub value: f64,
    pub unit: String,
    pub risk_level: RiskLevel,
}

/// Reference lines for a chart, taken from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendReference {
    pub min: f64,
    pub max: f64,
    pub standard_unit: String,
    pub category: LabCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabTrend {
    pub test_name: String,
    pub points: Vec<TrendPoint>,
    pub reference: Option<TrendReference>,
    /// Enough points to draw a line.
    pub is_chartable: bool,
}

/// Distinct test names in order of first appearance.
pub fn available_tests(patient: &Patient) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for lab in &patient.lab_results {
        if !names.contains(&lab.test_name.as_str()) {
            names.push(&lab.test_name);
        }
    }
    names
}

/// Results for one test, oldest first. Undated results go last in stored order.
pub fn lab_trend(patient: &Patient, test_name: &str, config: &LabConfig) -> LabTrend {
    let mut points: Vec<TrendPoint> = patient
        .lab_results
        .iter()
        .filter(|lab| lab.test_name == test_name)
        .map(|lab| TrendPoint {
            lab_id: lab.id.clone(),
            date: lab.date.clone(),
            recorded_on: lab.recorded_on(),
            value: lab.value,
            unit: lab.unit.clone(),
            risk_level: lab.risk_level,
        })
        .collect();
    points.sort_by(|a, b| compare_dates(a.recorded_on, b.recorded_on));

    let reference = find_lab_test(test_name).map(|reference| TrendReference {
        min: reference.normal_range.min,
        max: reference.normal_range.max,
        standard_unit: reference.standard_unit.to_string(),
        category: reference.category,
    });

    LabTrend {
        test_name: test_name.to_string(),
        is_chartable: points.len() >= config.trend_min_points,
        points,
        reference,
    }
}

/// Most recent result of one test, for the hub list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LatestLab<'a> {
    pub category: LabCategory,
    pub result: &'a LabResult,
    /// How many results exist for this test.
    pub count: usize,
}

/// Latest result per test, newest first; undated results trail.
/// On a date tie the result stored first wins. Tests missing from the
/// catalog fall under `Other`.
pub fn latest_results(patient: &Patient) -> Vec<LatestLab<'_>> {
    let mut latest: Vec<LatestLab<'_>> = Vec::new();

    for lab in &patient.lab_results {
        match latest
            .iter_mut()
            .find(|entry| entry.result.test_name == lab.test_name)
        {
            Some(entry) => {
                entry.count += 1;
                if is_more_recent(lab.recorded_on(), entry.result.recorded_on()) {
                    entry.result = lab;
                }
            }
            None => latest.push(LatestLab {
                category: find_lab_test(&lab.test_name)
                    .map(|reference| reference.category)
                    .unwrap_or(LabCategory::Other),
                result: lab,
                count: 1,
            }),
        }
    }

    latest.sort_by(|a, b| newest_first(a.result.recorded_on(), b.result.recorded_on()));
    latest
}

/// Results classified `High`, in stored order.
pub fn high_risk_results(patient: &Patient) -> Vec<&LabResult> {
    patient
        .lab_results
        .iter()
        .filter(|lab| lab.risk_level == RiskLevel::High)
        .collect()
}

fn is_more_recent(candidate: Option<NaiveDate>, current: Option<NaiveDate>) -> bool {
    match (candidate, current) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Dated before undated; dates descending.
fn newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (a, b) => compare_dates(a, b),
    }
}

/// Dated before undated; dates ascending.
fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> Patient {
        serde_json::from_value(serde_json::json!({
            "id": "p2",
            "name": "Hoa Le",
            "labResults": [
                { "id": "a", "testName": "Glucose", "value": 130, "unit": "mg/dL", "date": "2024-08-15", "riskLevel": "High" },
                { "id": "b", "testName": "HbA1c", "value": 6.1, "unit": "%", "date": "2024-08-15", "riskLevel": "High" },
                { "id": "c", "testName": "Glucose", "value": 110, "unit": "mg/dL", "date": "2024-06-01", "riskLevel": "High" },
                { "id": "d", "testName": "Glucose", "value": 95, "unit": "mg/dL", "date": "unknown", "riskLevel": "Normal" },
                { "id": "e", "testName": "Ferritin", "value": 40, "unit": "ng/mL", "date": "2024-07-01", "riskLevel": "Normal" },
                { "id": "f", "testName": "WBC", "value": 3.9, "unit": "x10^3/µL", "date": "2024-07-20", "riskLevel": "Low" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn tests_in_first_appearance_order() {
        let patient = patient();
        assert_eq!(
            available_tests(&patient),
            vec!["Glucose", "HbA1c", "Ferritin", "WBC"]
        );
    }

    #[test]
    fn trend_is_sorted_with_reference() {
        let patient = patient();
        let trend = lab_trend(&patient, "Glucose", &LabConfig::default());
        let ids: Vec<&str> = trend.points.iter().map(|p| p.lab_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "d"]);
        assert!(trend.is_chartable);

        let reference = trend.reference.unwrap();
        assert_eq!((reference.min, reference.max), (70.0, 99.0));
        assert_eq!(reference.standard_unit, "mg/dL");
    }

    #[test]
    fn single_point_is_not_chartable() {
        let patient = patient();
        let trend = lab_trend(&patient, "Ferritin", &LabConfig::default());
        assert_eq!(trend.points.len(), 1);
        assert!(!trend.is_chartable);
        assert!(trend.reference.is_none());

        let empty = lab_trend(&patient, "TSH", &LabConfig::default());
        assert!(empty.points.is_empty());
        assert!(empty.reference.is_some());
    }

    #[test]
    fn latest_per_test_newest_first() {
        let patient = patient();
        let latest = latest_results(&patient);
        let summary: Vec<(&str, &str, usize)> = latest
            .iter()
            .map(|entry| (entry.result.test_name.as_str(), entry.result.id.as_str(), entry.count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Glucose", "a", 3),
                ("HbA1c", "b", 1),
                ("WBC", "f", 1),
                ("Ferritin", "e", 1),
            ]
        );
        assert_eq!(latest[0].category, LabCategory::MetabolicPanel);
        assert_eq!(latest[3].category, LabCategory::Other);
    }

    #[test]
    fn same_day_results_keep_the_first_stored() {
        let patient: Patient = serde_json::from_value(serde_json::json!({
            "id": "p4",
            "name": "Minh Tran",
            "labResults": [
                { "id": "first", "testName": "Glucose", "value": 92, "unit": "mg/dL", "date": "2024-06-01" },
                { "id": "second", "testName": "Glucose", "value": 150, "unit": "mg/dL", "date": "2024-06-01" },
                { "id": "tsh", "testName": "TSH", "value": 2.1, "unit": "µIU/mL", "date": "2024-09-01" }
            ]
        }))
        .unwrap();

        let ids: Vec<&str> = latest_results(&patient)
            .iter()
            .map(|entry| entry.result.id.as_str())
            .collect();
        assert_eq!(ids, vec!["tsh", "first"]);
    }

    #[test]
    fn dated_result_replaces_undated() {
        let patient: Patient = serde_json::from_value(serde_json::json!({
            "id": "p5",
            "name": "Lan Pham",
            "labResults": [
                { "id": "old", "testName": "CRP", "value": 4, "unit": "mg/L", "date": "pending" },
                { "id": "new", "testName": "CRP", "value": 2, "unit": "mg/L", "date": "2024-03-10" }
            ]
        }))
        .unwrap();

        let latest = latest_results(&patient);
        assert_eq!(latest[0].result.id, "new");
        assert_eq!(latest[0].count, 2);
    }

    #[test]
    fn high_risk_excludes_low_results() {
        let patient = patient();
        let ids: Vec<&str> = high_risk_results(&patient)
            .iter()
            .map(|lab| lab.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
