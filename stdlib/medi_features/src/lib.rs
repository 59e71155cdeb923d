//! Feature construction for Medi model serving.
//!
//! Raw request records are validated against a [`FeatureSet`], their
//! categorical fields one-hot encoded without reference to any schema,
//! and the result reconciled onto the [`TrainedSchema`] frozen at training
//! time, so the model always receives a vector of the trained width and
//! order regardless of which categories a request carries.
//!
//! ```
//! use medi_features::{transform_record, FeatureSet, TrainedSchema};
//! use serde_json::json;
//!
//! let schema = TrainedSchema::from_json_str(
//!     r#"["Age", "Days_Hospitalized", "Gender_F", "Gender_M", "Blood Type_A", "Blood Type_B"]"#,
//! ).unwrap();
//! let raw = json!({"Age": 45, "Gender": "F", "Blood_Type": "O",
//!                  "Medical_Condition": "None", "Days_Hospitalized": 3});
//! let out = transform_record(raw.as_object().unwrap(), &FeatureSet::readmission(), &schema).unwrap();
//! assert_eq!(out.vector.as_slice(), &[45.0, 3.0, 1.0, 0.0, 0.0, 0.0]);
//! ```
//!
//! Deriving the schema from training records:
//! ```
//! use medi_features::{FeatureSet, TrainedSchema};
//! use serde_json::json;
//!
//! let rows = vec![
//!     json!({"Age": 70, "Gender": "M", "Blood_Type": "B", "Medical_Condition": "Flu", "Days_Hospitalized": 2}),
//!     json!({"Age": 30, "Gender": "F", "Blood_Type": "A", "Medical_Condition": "Flu", "Days_Hospitalized": 5}),
//! ];
//! let rows: Vec<_> = rows.into_iter().filter_map(|r| r.as_object().cloned()).collect();
//! let schema = TrainedSchema::derive(&rows, &FeatureSet::readmission()).unwrap();
//! assert_eq!(schema.columns()[..3], ["Age", "Days_Hospitalized", "Gender_F"]);
//! ```

pub mod encode;
pub mod error;
pub mod field;
pub mod ndjson;
pub mod pipeline;
pub mod reconcile;
pub mod record;
pub mod schema;
pub mod vector;

pub use encode::{encode_categorical, indicator_column, EncodedRecord};
pub use error::{FeatureError, FeatureSetError, SchemaError};
pub use field::{FeatureField, FeatureKind, FeatureSet};
pub use ndjson::records_from_ndjson;
pub use pipeline::{transform_record, Transformed};
pub use reconcile::{reconcile, Reconciled};
pub use record::{validate_record, RawRecord, ValidatedRecord};
pub use schema::TrainedSchema;
pub use vector::{build_vector, FeatureVector};
