//! Feature vector assembly from a reconciled record

use crate::error::FeatureError;
use crate::reconcile::Reconciled;
use crate::schema::TrainedSchema;

/// Model input: one value per trained schema column, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lay out `reconciled` in schema order.
///
/// A schema column without a reconciled value is a defect in reconciliation
/// and fails with [`FeatureError::Reconciliation`] instead of defaulting.
pub fn build_vector(
    reconciled: &Reconciled<'_>,
    schema: &TrainedSchema,
) -> Result<FeatureVector, FeatureError> {
    let values = schema
        .columns()
        .iter()
        .map(|column| {
            reconciled.get(column).ok_or_else(|| {
                FeatureError::Reconciliation(format!("no value for trained column '{column}'"))
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;
    Ok(FeatureVector(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::EncodedRecord;
    use crate::reconcile::reconcile;

    #[test]
    fn follows_schema_order() {
        let schema =
            TrainedSchema::new(vec!["Days_Hospitalized".into(), "Age".into(), "Gender_F".into()])
                .unwrap();
        let numeric = vec![("Age".to_string(), 61.0), ("Days_Hospitalized".to_string(), 4.0)];
        let r = reconcile(&EncodedRecord::default(), &numeric, &schema);
        let v = build_vector(&r, &schema).unwrap();
        assert_eq!(v.as_slice(), &[4.0, 61.0, 0.0]);
    }

    #[test]
    fn incomplete_mapping_fails_loudly() {
        let narrow = TrainedSchema::new(vec!["Age".into()]).unwrap();
        let wide = TrainedSchema::new(vec!["Age".into(), "Gender_F".into()]).unwrap();
        let numeric = vec![("Age".to_string(), 61.0)];
        let r = reconcile(&EncodedRecord::default(), &numeric, &narrow);

        let err = build_vector(&r, &wide).unwrap_err();
        assert!(matches!(err, FeatureError::Reconciliation(msg) if msg.contains("Gender_F")));
    }
}
