use std::fs;

use labref_core::{calculate_risk_level, LabValue, RiskLevel};
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn risk_cases_match_fixture() {
    let raw = fs::read_to_string(fixture_path("risk_cases.json")).expect("missing risk fixture");
    let cases: Vec<Value> = serde_json::from_str(&raw).expect("invalid risk fixture");

    for case in &cases {
        let test = case["test"].as_str().expect("test name");
        let value = match &case["value"] {
            Value::String(text) => LabValue::Text(text),
            other => LabValue::Number(other.as_f64().expect("numeric value")),
        };
        let expected: RiskLevel =
            serde_json::from_value(case["expected"].clone()).expect("risk level");

        assert_eq!(calculate_risk_level(test, value), expected, "{case}");
    }
}
