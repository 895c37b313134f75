//! Pivoted CSV export of a patient's lab results.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::format::{Item, StrftimeItems};
use labref_core::{LabConfig, LabError};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::patient::{parse_lab_date, Patient};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

/// One row per test, one column per distinct date.
///
/// Dates and test names are sorted; a cell holds the value of the first
/// result for that test on that date. Every cell, header included, is quoted.
pub fn export_labs_csv(patient: &Patient, config: &LabConfig) -> Result<CsvExport, LabError> {
    if patient.lab_results.is_empty() {
        return Err(LabError::NoLabResults);
    }
    check_date_format(&config.export_date_format)?;

    let dates: BTreeSet<&str> = patient
        .lab_results
        .iter()
        .map(|lab| lab.date.as_str())
        .collect();
    let test_names: BTreeSet<&str> = patient
        .lab_results
        .iter()
        .map(|lab| lab.test_name.as_str())
        .collect();

    let mut header = vec!["Test Name".to_string(), "Unit".to_string()];
    header.extend(
        dates
            .iter()
            .map(|date| format_date_column(date, &config.export_date_format)),
    );

    let mut lines = vec![quote_row(&header)];
    for test_name in &test_names {
        let results: Vec<_> = patient
            .lab_results
            .iter()
            .filter(|lab| lab.test_name == *test_name)
            .collect();
        let unit = results.first().map(|lab| lab.unit.as_str()).unwrap_or("");

        let mut row = vec![test_name.to_string(), unit.to_string()];
        for date in &dates {
            let cell = results
                .iter()
                .find(|lab| lab.date == *date)
                .map(|lab| lab.value.to_string())
                .unwrap_or_default();
            row.push(cell);
        }

        lines.push(quote_row(&row));
    }

    tracing::debug!(
        patient = %patient.id,
        tests = test_names.len(),
        dates = dates.len(),
        "lab csv export built"
    );

    Ok(CsvExport {
        file_name: format!(
            "{}_Lab_Data.csv",
            WHITESPACE_RUN.replace_all(&patient.name, "_")
        ),
        content: lines.join("\n"),
    })
}

/// chrono panics while rendering an unknown specifier, so reject it up front.
fn check_date_format(format: &str) -> Result<(), LabError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(LabError::Other(format!(
            "Invalid export date format: {format:?}"
        )));
    }
    Ok(())
}

fn format_date_column(raw: &str, format: &str) -> String {
    match parse_lab_date(raw) {
        Some(date) => date.format(format).to_string(),
        None => raw.to_string(),
    }
}

fn quote_row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| quote(cell))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
