//! Request bodies shared by the integration tests.

use serde_json::{json, Value};

pub const EXCEL_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A request that passes every rule.
pub fn valid_upload_body() -> Value {
    json!({
        "experiment": {
            "experiment_name": "Trial A",
            "analysis_type": "delta_delta_ct",
            "housekeeping_gene": "GAPDH",
            "control_sample": "ctrl1",
            "user_email": "a@b.com"
        },
        "file_metadata": {
            "file_size": 1000,
            "file_type": EXCEL_MIME_TYPE,
            "file_name": "data.xlsx"
        }
    })
}

/// Field paths of every violation in a 422 body.
pub fn violated_fields(body: &Value) -> Vec<String> {
    body["fields"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
