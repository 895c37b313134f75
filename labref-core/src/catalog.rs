//! Standard adult reference ranges (Medscape / eMedicine).

use crate::types::{LabCategory, LabTestReference, NormalRange};

const fn row(
    name: &'static str,
    category: LabCategory,
    unit: &'static str,
    min: f64,
    max: f64,
) -> LabTestReference {
    LabTestReference {
        name,
        category,
        unit,
        standard_unit: unit,
        normal_range: NormalRange::new(min, max),
        low_is_risky: false,
    }
}

const fn low_risky(reference: LabTestReference) -> LabTestReference {
    LabTestReference {
        low_is_risky: true,
        ..reference
    }
}

use LabCategory::*;

pub static COMMON_LAB_TESTS: &[LabTestReference] = &[
    // Complete blood count
    row("WBC", Cbc, "x10^3/µL", 4.5, 11.0),
    low_risky(row("RBC", Cbc, "x10^6/µL", 4.1, 5.9)),
    low_risky(row("Hemoglobin", Cbc, "g/dL", 12.3, 17.5)),
    low_risky(row("Hematocrit", Cbc, "%", 35.9, 50.4)),
    row("MCV", Cbc, "fL", 80.0, 96.0),
    row("MCH", Cbc, "pg", 27.0, 33.0),
    row("MCHC", Cbc, "g/dL", 33.0, 36.0),
    row("Platelet Count", Cbc, "x10^3/µL", 150.0, 450.0),
    // Electrolytes
    row("Sodium", Electrolytes, "mEq/L", 136.0, 145.0),
    row("Potassium", Electrolytes, "mEq/L", 3.5, 5.1),
    row("Chloride", Electrolytes, "mEq/L", 98.0, 107.0),
    row("CO2 (Bicarbonate)", Electrolytes, "mEq/L", 22.0, 28.0),
    low_risky(row("Calcium", MetabolicPanel, "mg/dL", 8.5, 10.5)),
    row("Magnesium", Electrolytes, "mg/dL", 1.8, 2.6),
    // Kidney
    row("BUN", KidneyFunction, "mg/dL", 7.0, 20.0),
    row("Creatinine", KidneyFunction, "mg/dL", 0.6, 1.2),
    low_risky(row("eGFR", KidneyFunction, "mL/min/1.73m²", 60.0, 120.0)),
    row("Uric Acid", KidneyFunction, "mg/dL", 2.4, 7.2),
    // Liver
    row("ALT (SGPT)", LiverFunction, "U/L", 7.0, 56.0),
    row("AST (SGOT)", LiverFunction, "U/L", 10.0, 40.0),
    row("ALP", LiverFunction, "U/L", 44.0, 147.0),
    low_risky(row("Albumin", LiverFunction, "g/dL", 3.5, 5.0)),
    row("Bilirubin, Total", LiverFunction, "mg/dL", 0.3, 1.9),
    row("Total Protein", LiverFunction, "g/dL", 6.0, 8.3),
    // Lipids
    row("Total Cholesterol", LipidPanel, "mg/dL", 125.0, 200.0),
    low_risky(row("HDL-C", LipidPanel, "mg/dL", 40.0, 100.0)),
    row("LDL-C", LipidPanel, "mg/dL", 0.0, 100.0),
    row("Triglycerides", LipidPanel, "mg/dL", 0.0, 150.0),
    // Metabolic
    row("Glucose", MetabolicPanel, "mg/dL", 70.0, 99.0),
    row("HbA1c", MetabolicPanel, "%", 4.0, 5.6),
    row("TSH", Hormonal, "µIU/mL", 0.45, 4.5),
    row("CRP", InflammationImmune, "mg/L", 0.0, 10.0),
];

/// Exact, case-sensitive lookup.
pub fn find_lab_test(name: &str) -> Option<&'static LabTestReference> {
    COMMON_LAB_TESTS.iter().find(|test| test.name == name)
}

pub fn lab_tests() -> impl Iterator<Item = &'static LabTestReference> {
    COMMON_LAB_TESTS.iter()
}

pub fn tests_in_category(
    category: LabCategory,
) -> impl Iterator<Item = &'static LabTestReference> {
    COMMON_LAB_TESTS
        .iter()
        .filter(move |test| test.category == category)
}

/// Picker view: rows whose name contains `query` (case-insensitive), grouped
/// by category in order of first appearance.
pub fn group_lab_tests(query: &str) -> Vec<(LabCategory, Vec<&'static LabTestReference>)> {
    let needle = query.trim().to_lowercase();
    let mut groups: Vec<(LabCategory, Vec<&'static LabTestReference>)> = Vec::new();

    for test in COMMON_LAB_TESTS
        .iter()
        .filter(|test| test.name.to_lowercase().contains(&needle))
    {
        match groups.iter_mut().find(|(category, _)| *category == test.category) {
            Some((_, rows)) => rows.push(test),
            None => groups.push((test.category, vec![test])),
        }
    }

    groups
}
