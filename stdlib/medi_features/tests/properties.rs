use medi_features::{transform_record, FeatureSet, RawRecord, TrainedSchema};
use proptest::prelude::*;
use serde_json::json;

const GENDERS: &[&str] = &["F", "M", "Other", "U"];
const BLOOD: &[&str] = &["A+", "A-", "B+", "O-", "AB+", "Z"];
const CONDITIONS: &[&str] = &["Diabetes", "Asthma", "Cancer", "None", "Obesity"];

fn trained() -> TrainedSchema {
    TrainedSchema::new(
        [
            "Age",
            "Days_Hospitalized",
            "Gender_F",
            "Gender_M",
            "Blood Type_A+",
            "Blood Type_A-",
            "Blood Type_B+",
            "Blood Type_O-",
            "Medical Condition_Asthma",
            "Medical Condition_Diabetes",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    )
    .unwrap()
}

fn arb_record() -> impl Strategy<Value = RawRecord> {
    (
        0u32..110,
        0u32..60,
        prop::sample::select(GENDERS),
        prop::sample::select(BLOOD),
        prop::sample::select(CONDITIONS),
    )
        .prop_map(|(age, days, gender, blood, condition)| {
            json!({
                "Age": age,
                "Gender": gender,
                "Blood_Type": blood,
                "Medical_Condition": condition,
                "Days_Hospitalized": days
            })
            .as_object()
            .cloned()
            .unwrap_or_default()
        })
}

proptest! {
    #[test]
    fn vector_has_trained_width(raw in arb_record()) {
        let schema = trained();
        let out = transform_record(&raw, &FeatureSet::readmission(), &schema).unwrap();
        prop_assert_eq!(out.vector.len(), schema.len());
    }

    #[test]
    fn encoding_is_idempotent(raw in arb_record()) {
        let schema = trained();
        let fields = FeatureSet::readmission();
        let a = transform_record(&raw, &fields, &schema).unwrap();
        let b = transform_record(&raw, &fields, &schema).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn at_most_one_indicator_per_field(raw in arb_record()) {
        let schema = trained();
        let out = transform_record(&raw, &FeatureSet::readmission(), &schema).unwrap();
        for prefix in ["Gender_", "Blood Type_", "Medical Condition_"] {
            let hot: f64 = schema
                .columns()
                .iter()
                .zip(out.vector.as_slice())
                .filter(|(c, _)| c.starts_with(prefix))
                .map(|(_, v)| *v)
                .sum();
            prop_assert!(hot == 0.0 || hot == 1.0, "{} has {} hot columns", prefix, hot);
        }
    }

    #[test]
    fn numeric_values_pass_through(raw in arb_record()) {
        let schema = trained();
        let out = transform_record(&raw, &FeatureSet::readmission(), &schema).unwrap();
        prop_assert_eq!(Some(out.vector.as_slice()[0]), raw["Age"].as_f64());
        prop_assert_eq!(Some(out.vector.as_slice()[1]), raw["Days_Hospitalized"].as_f64());
    }
}
