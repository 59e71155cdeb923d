//! Raw record to model input, end to end

use crate::encode::encode_categorical;
use crate::error::FeatureError;
use crate::field::FeatureSet;
use crate::reconcile::reconcile;
use crate::record::{validate_record, RawRecord};
use crate::schema::TrainedSchema;
use crate::vector::{build_vector, FeatureVector};

#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub vector: FeatureVector,
    /// Input columns the trained schema does not know
    pub dropped: Vec<String>,
}

/// Validate, encode, reconcile and lay out one record.
pub fn transform_record(
    record: &RawRecord,
    fields: &FeatureSet,
    schema: &TrainedSchema,
) -> Result<Transformed, FeatureError> {
    let validated = validate_record(record, fields)?;
    let encoded = encode_categorical(&validated);
    let reconciled = reconcile(&encoded, validated.numeric(), schema);
    let vector = build_vector(&reconciled, schema)?;
    Ok(Transformed {
        vector,
        dropped: reconciled.dropped().to_vec(),
    })
}
