//! Framework-neutral WASM <-> JavaScript bridge.

use labref_core::{
    auto_convert_lab_value, calculate_risk_level, group_lab_tests, LabCategory, LabConfig,
    LabError, LabTestReference, LabValue,
};
use labref_records::{export_labs_csv, lab_trend, load_patient_value, Patient};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsLabConfig {
    #[serde(default)]
    trend_min_points: Option<usize>,
    #[serde(default)]
    export_date_format: Option<String>,
    #[serde(default)]
    convert_on_intake: Option<bool>,
}

impl From<JsLabConfig> for LabConfig {
    fn from(cfg: JsLabConfig) -> Self {
        let mut base = LabConfig::default();
        if let Some(points) = cfg.trend_min_points {
            base.trend_min_points = points;
        }
        if let Some(format) = cfg.export_date_format {
            base.export_date_format = format;
        }
        if let Some(convert) = cfg.convert_on_intake {
            base.convert_on_intake = convert;
        }
        base
    }
}

#[derive(Serialize)]
struct CatalogGroup {
    category: LabCategory,
    tests: Vec<&'static LabTestReference>,
}

#[wasm_bindgen(js_name = calculateRiskLevel)]
pub fn calculate_risk_level_js(test_name: &str, value: JsValue) -> String {
    let level = if let Some(number) = value.as_f64() {
        calculate_risk_level(test_name, number)
    } else if let Some(text) = value.as_string() {
        calculate_risk_level(test_name, LabValue::Text(&text))
    } else {
        calculate_risk_level(test_name, f64::NAN)
    };
    level.to_string()
}

#[wasm_bindgen(js_name = autoConvertLabValue)]
pub fn auto_convert_lab_value_js(
    test_name: &str,
    value: f64,
    from_unit: &str,
) -> Result<JsValue, JsValue> {
    let converted = auto_convert_lab_value(test_name, value, from_unit);
    to_value(&converted).map_err(|err| JsValue::from_str(&format!("Could not serialize: {err}")))
}

#[wasm_bindgen(js_name = labCatalog)]
pub fn lab_catalog(query: Option<String>) -> Result<JsValue, JsValue> {
    let groups: Vec<CatalogGroup> = group_lab_tests(query.as_deref().unwrap_or(""))
        .into_iter()
        .map(|(category, tests)| CatalogGroup { category, tests })
        .collect();
    to_value(&groups).map_err(|err| JsValue::from_str(&format!("Could not serialize: {err}")))
}

#[wasm_bindgen(js_name = labTrend)]
pub fn lab_trend_js(
    patient: JsValue,
    test_name: &str,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let patient = read_patient(patient)?;
    let cfg = read_config(config)?;
    to_value(&lab_trend(&patient, test_name, &cfg))
        .map_err(|err| JsValue::from_str(&format!("Could not serialize trend: {err}")))
}

#[wasm_bindgen(js_name = exportLabsCsv)]
pub fn export_labs_csv_js(patient: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let patient = read_patient(patient)?;
    let cfg = read_config(config)?;
    let export =
        export_labs_csv(&patient, &cfg).map_err(|err| JsValue::from_str(&format_lab_error(err)))?;
    to_value(&export).map_err(|err| JsValue::from_str(&format!("Could not serialize export: {err}")))
}

/// Recompute every stored risk level and hand the record back.
#[wasm_bindgen(js_name = reclassifyPatient)]
pub fn reclassify_patient(patient: JsValue) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let mut patient = read_patient(patient)?;
    patient.reclassify_labs();
    // The default serializer would turn `extra` into a JS Map.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    patient
        .serialize(&serializer)
        .map_err(|err| JsValue::from_str(&format!("Could not serialize patient: {err}")))
}

fn read_patient(patient: JsValue) -> Result<Patient, JsValue> {
    let value = from_value::<serde_json::Value>(patient)
        .map_err(|err| JsValue::from_str(&format!("Could not read patient JSON: {err}")))?;
    load_patient_value(&value).map_err(|err| JsValue::from_str(&format_lab_error(err)))
}

fn read_config(config: Option<JsValue>) -> Result<LabConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsLabConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            Ok(LabConfig::from(cfg))
        }
        _ => Ok(LabConfig::default()),
    }
}

fn init_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn format_lab_error(err: LabError) -> String {
    format!("Lab error: {err}")
}
