//! Raw request records and their validation

use crate::error::FeatureError;
use crate::field::{FeatureField, FeatureKind, FeatureSet};
use serde_json::{Map, Value};

/// A raw attribute record as received from a client
pub type RawRecord = Map<String, Value>;

/// A record whose required fields are all present and well typed.
///
/// Values are keyed by training column name, in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    numeric: Vec<(String, f64)>,
    categorical: Vec<(String, String)>,
}

impl ValidatedRecord {
    pub fn numeric(&self) -> &[(String, f64)] {
        &self.numeric
    }

    pub fn categorical(&self) -> &[(String, String)] {
        &self.categorical
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid(field: &FeatureField, found: impl Into<String>) -> FeatureError {
    FeatureError::InvalidFeatureType {
        field: field.key.clone(),
        expected: field.kind,
        found: found.into(),
    }
}

fn coerce_numeric(field: &FeatureField, v: &Value) -> Result<f64, FeatureError> {
    let x = match v {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(field, format!("unrepresentable number {n}")))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(field, format!("non-numeric string {s:?}")))?,
        other => return Err(invalid(field, json_type_name(other))),
    };
    if !x.is_finite() {
        return Err(invalid(field, "non-finite number"));
    }
    Ok(x)
}

fn coerce_categorical(field: &FeatureField, v: &Value) -> Result<String, FeatureError> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(invalid(field, "empty string"));
            }
            Ok(s.to_string())
        }
        other => Err(invalid(field, json_type_name(other))),
    }
}

/// Check presence of every required field, then their types.
///
/// A `null` value counts as missing. Numeric fields accept JSON numbers or
/// numeric strings; categorical fields accept non-blank strings, trimmed.
/// Keys that are not required fields are ignored.
pub fn validate_record(
    record: &RawRecord,
    fields: &FeatureSet,
) -> Result<ValidatedRecord, FeatureError> {
    if let Some(missing) = fields
        .fields()
        .iter()
        .find(|f| matches!(record.get(&f.key), None | Some(Value::Null)))
    {
        return Err(FeatureError::MissingFeature(missing.key.clone()));
    }

    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for field in fields.fields() {
        let Some(value) = record.get(&field.key) else {
            return Err(FeatureError::MissingFeature(field.key.clone()));
        };
        match field.kind {
            FeatureKind::Numeric => {
                numeric.push((field.column().to_string(), coerce_numeric(field, value)?))
            }
            FeatureKind::Categorical => categorical.push((
                field.column().to_string(),
                coerce_categorical(field, value)?,
            )),
        }
    }
    Ok(ValidatedRecord {
        numeric,
        categorical,
    })
}
