//! Definitions of the raw request fields a model consumes

use crate::error::FeatureSetError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Numeric => f.write_str("number"),
            FeatureKind::Categorical => f.write_str("string"),
        }
    }
}

/// One required request field.
///
/// `key` is the name clients send; `column` is the name the training data
/// used for the same attribute, and prefixes every indicator column of a
/// categorical field. It defaults to `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureField {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column: Option<String>,
    pub kind: FeatureKind,
}

impl FeatureField {
    pub fn numeric(key: &str) -> Self {
        Self {
            key: key.to_string(),
            column: None,
            kind: FeatureKind::Numeric,
        }
    }

    pub fn categorical(key: &str) -> Self {
        Self {
            key: key.to_string(),
            column: None,
            kind: FeatureKind::Categorical,
        }
    }

    pub fn with_column(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    pub fn column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.key)
    }
}

/// Ordered, validated set of required fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    fields: Vec<FeatureField>,
}

impl FeatureSet {
    pub fn new(fields: Vec<FeatureField>) -> Result<Self, FeatureSetError> {
        if fields.is_empty() {
            return Err(FeatureSetError::Empty);
        }
        for (i, f) in fields.iter().enumerate() {
            if f.key.trim().is_empty() || f.column().trim().is_empty() {
                return Err(FeatureSetError::BlankName(i));
            }
            if fields[..i].iter().any(|g| g.key == f.key) {
                return Err(FeatureSetError::DuplicateKey(f.key.clone()));
            }
            if fields[..i].iter().any(|g| g.column() == f.column()) {
                return Err(FeatureSetError::DuplicateColumn(f.column().to_string()));
            }
        }
        Ok(Self { fields })
    }

    /// The patient readmission inputs: age, gender, blood type, medical
    /// condition and length of stay.
    pub fn readmission() -> Self {
        Self {
            fields: vec![
                FeatureField::numeric("Age"),
                FeatureField::categorical("Gender"),
                FeatureField::categorical("Blood_Type").with_column("Blood Type"),
                FeatureField::categorical("Medical_Condition").with_column("Medical Condition"),
                FeatureField::numeric("Days_Hospitalized"),
            ],
        }
    }

    pub fn fields(&self) -> &[FeatureField] {
        &self.fields
    }

    pub fn numeric(&self) -> impl Iterator<Item = &FeatureField> {
        self.fields
            .iter()
            .filter(|f| f.kind == FeatureKind::Numeric)
    }

    pub fn categorical(&self) -> impl Iterator<Item = &FeatureField> {
        self.fields
            .iter()
            .filter(|f| f.kind == FeatureKind::Categorical)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::readmission()
    }
}
