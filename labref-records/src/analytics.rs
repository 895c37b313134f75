//! Cross-patient views.

use serde::{Deserialize, Serialize};

use crate::patient::Patient;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosisCount {
    pub name: String,
    pub value: usize,
}

/// Diagnosis frequency across patients, in order of first appearance.
pub fn diagnosis_distribution(patients: &[Patient]) -> Vec<DiagnosisCount> {
    let mut counts: Vec<DiagnosisCount> = Vec::new();
    for diagnosis in patients.iter().flat_map(|patient| &patient.diagnoses) {
        match counts
            .iter_mut()
            .find(|count| count.name == diagnosis.condition)
        {
            Some(count) => count.value += 1,
            None => counts.push(DiagnosisCount {
                name: diagnosis.condition.clone(),
                value: 1,
            }),
        }
    }
    counts
}

/// Names of patients with a diagnosis containing `query`. A blank query
/// clears the search and yields `None`.
pub fn search_by_condition<'a>(patients: &'a [Patient], query: &str) -> Option<Vec<&'a str>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    Some(
        patients
            .iter()
            .filter(|patient| {
                patient
                    .diagnoses
                    .iter()
                    .any(|diagnosis| diagnosis.condition.to_lowercase().contains(&needle))
            })
            .map(|patient| patient.name.as_str())
            .collect(),
    )
}
