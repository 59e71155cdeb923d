//! The trained schema: the frozen, ordered column layout a model was fit on

use crate::encode::indicator_column;
use crate::error::SchemaError;
use crate::field::FeatureSet;
use crate::record::{validate_record, RawRecord};
use medi_model::ModelVersion;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    columns: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SchemaRepr {
    Document(SchemaDocument),
    Columns(Vec<String>),
}

/// Ordered, duplicate-free column names. Immutable once built; share it
/// behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainedSchema {
    version: Option<ModelVersion>,
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl TrainedSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut index = HashMap::with_capacity(columns.len());
        for (i, c) in columns.iter().enumerate() {
            if c.is_empty() {
                return Err(SchemaError::EmptyColumn(i));
            }
            if index.insert(c.clone(), i).is_some() {
                return Err(SchemaError::DuplicateColumn(c.clone()));
            }
        }
        Ok(Self {
            version: None,
            columns,
            index,
        })
    }

    pub fn with_version(mut self, version: ModelVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Parse either `{"version": "1.0.0", "columns": [...]}` or a bare
    /// array of column names.
    pub fn from_json_str(s: &str) -> Result<Self, SchemaError> {
        let doc = match serde_json::from_str::<SchemaRepr>(s)? {
            SchemaRepr::Document(doc) => doc,
            SchemaRepr::Columns(columns) => SchemaDocument {
                version: None,
                columns,
            },
        };
        let schema = Self::new(doc.columns)?;
        match doc.version {
            Some(v) => Ok(schema.with_version(
                ModelVersion::parse(&v).map_err(SchemaError::InvalidVersion)?,
            )),
            None => Ok(schema),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let schema = Self::from_json_str(&text)?;
        log::info!(
            "loaded trained schema ({} columns{}) from {}",
            schema.len(),
            schema
                .version
                .as_ref()
                .map(|v| format!(", v{v}"))
                .unwrap_or_default(),
            path.display()
        );
        Ok(schema)
    }

    pub fn to_json_string(&self) -> Result<String, SchemaError> {
        let doc = SchemaDocument {
            version: self.version.as_ref().map(ToString::to_string),
            columns: self.columns.clone(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SchemaError> {
        let path = path.as_ref();
        let mut text = self.to_json_string()?;
        text.push('\n');
        std::fs::write(path, text).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rebuild the column layout training produces for `records`:
    /// numeric columns in field order, then for every categorical field
    /// (in field order) one indicator per distinct value, values sorted.
    ///
    /// An invalid record is reported by its 1-based position in `records`.
    pub fn derive(records: &[RawRecord], fields: &FeatureSet) -> Result<Self, SchemaError> {
        Self::derive_numbered(records.iter().enumerate().map(|(i, r)| (i + 1, r)), fields)
    }

    /// Like [`TrainedSchema::derive`], for records that carry their own line
    /// numbers (see [`records_from_ndjson`](crate::records_from_ndjson)).
    pub fn derive_numbered<'r, I>(records: I, fields: &FeatureSet) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (usize, &'r RawRecord)>,
    {
        let mut seen: Vec<BTreeSet<String>> = vec![BTreeSet::new(); fields.categorical().count()];
        for (line, raw) in records {
            let record = validate_record(raw, fields)
                .map_err(|source| SchemaError::InvalidRecord { line, source })?;
            for (values, (_, value)) in seen.iter_mut().zip(record.categorical()) {
                values.insert(value.clone());
            }
        }

        let mut columns: Vec<String> = fields.numeric().map(|f| f.column().to_string()).collect();
        for (field, values) in fields.categorical().zip(&seen) {
            columns.extend(values.iter().map(|v| indicator_column(field.column(), v)));
        }
        Self::new(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn version(&self) -> Option<&ModelVersion> {
        self.version.as_ref()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }
}
