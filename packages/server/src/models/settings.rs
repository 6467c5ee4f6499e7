use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::AppError;

/// Key→value map as stored and returned.
pub type SettingsMap = BTreeMap<String, String>;

/// Convert a bulk-update body into key/value pairs.
///
/// Strings are stored verbatim; numbers and booleans by their JSON text.
/// Any other value rejects the whole request.
pub fn validate_settings(payload: BTreeMap<String, Value>) -> Result<Vec<(String, String)>, AppError> {
    let mut pairs = Vec::with_capacity(payload.len());

    for (key, value) in payload {
        if key.trim().is_empty() {
            return Err(AppError::Validation("Setting keys must not be empty".into()));
        }
        let value = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                return Err(AppError::Validation(format!(
                    "Setting '{key}' must be a string, number or boolean"
                )));
            }
        };
        pairs.push((key, value));
    }

    Ok(pairs)
}
