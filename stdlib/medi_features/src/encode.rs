//! One-hot encoding of a single record's categorical fields

use crate::record::ValidatedRecord;
use std::collections::BTreeMap;

/// Name of the indicator column for `value` of the field trained as `column`
pub fn indicator_column(column: &str, value: &str) -> String {
    format!("{column}_{value}")
}

/// Indicator columns observed in one record, each set to 1
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedRecord {
    indicators: BTreeMap<String, u8>,
}

impl EncodedRecord {
    pub fn get(&self, column: &str) -> Option<u8> {
        self.indicators.get(column).copied()
    }

    /// Indicator column names in sorted order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.indicators.keys().map(String::as_str)
    }
}

/// Encode the categorical subset of `record`. Schema-agnostic: one
/// indicator per (field, value) pair, nothing else.
pub fn encode_categorical(record: &ValidatedRecord) -> EncodedRecord {
    let indicators = record
        .categorical()
        .iter()
        .map(|(column, value)| (indicator_column(column, value), 1))
        .collect();
    EncodedRecord { indicators }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FeatureField, FeatureSet};
    use crate::record::validate_record;
    use serde_json::json;

    #[test]
    fn one_indicator_per_categorical_field() {
        let fields = FeatureSet::new(vec![
            FeatureField::categorical("Gender"),
            FeatureField::categorical("Condition"),
            FeatureField::numeric("Age"),
        ])
        .unwrap();
        let raw = json!({"Gender": "F", "Condition": "Diabetes", "Age": 50});
        let record = validate_record(raw.as_object().unwrap(), &fields).unwrap();

        let encoded = encode_categorical(&record);
        let columns: Vec<&str> = encoded.columns().collect();
        assert_eq!(columns, vec!["Condition_Diabetes", "Gender_F"]);
        assert_eq!(encoded.get("Gender_F"), Some(1));
        assert_eq!(encoded.get("Age"), None);
    }

    #[test]
    fn uses_training_column_prefix_and_preserves_case() {
        let raw = json!({
            "Age": 50,
            "Gender": "Male",
            "Blood_Type": "A+",
            "Medical_Condition": "diabetes",
            "Days_Hospitalized": 3
        });
        let record = validate_record(raw.as_object().unwrap(), &FeatureSet::readmission()).unwrap();
        let encoded = encode_categorical(&record);
        assert_eq!(encoded.columns().count(), 3);
        assert_eq!(encoded.get("Blood Type_A+"), Some(1));
        assert_eq!(encoded.get("Medical Condition_diabetes"), Some(1));
        assert_eq!(encoded.get("Medical Condition_Diabetes"), None);
    }
}
