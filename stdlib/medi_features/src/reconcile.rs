//! Alignment of an encoded record onto the trained schema
//!
//! Every schema column receives a value: a numeric field of the same name,
//! an observed indicator of the same name, or 0. Indicators (and numeric
//! fields) the schema does not know are dropped and reported, never passed
//! on to the model.

use crate::encode::EncodedRecord;
use crate::schema::TrainedSchema;
use std::collections::HashMap;

/// Values for the trained schema's columns, borrowed from the schema
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled<'s> {
    values: HashMap<&'s str, f64>,
    dropped: Vec<String>,
}

impl<'s> Reconciled<'s> {
    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Input columns with no counterpart in the trained schema
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }
}

pub fn reconcile<'s>(
    encoded: &EncodedRecord,
    numeric: &[(String, f64)],
    schema: &'s TrainedSchema,
) -> Reconciled<'s> {
    let mut values = HashMap::with_capacity(schema.len());
    for column in schema.columns() {
        let value = numeric
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, x)| *x)
            .or_else(|| encoded.get(column).map(f64::from))
            .unwrap_or(0.0);
        values.insert(column.as_str(), value);
    }

    let dropped: Vec<String> = numeric
        .iter()
        .map(|(name, _)| name.as_str())
        .chain(encoded.columns())
        .filter(|c| !schema.contains(c))
        .map(str::to_string)
        .collect();
    if !dropped.is_empty() {
        log::debug!("columns absent from trained schema dropped: {dropped:?}");
    }

    Reconciled { values, dropped }
}
