use medi_model::{load_model, ArtifactError, ModelVersion};

#[test]
fn load_forest_from_json_file() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("patient_readmission_model.json");
    std::fs::write(
        &path,
        r#"{
            "kind": "random_forest",
            "metadata": {"id": "rf-1", "name": "readmission", "version": "1.2.0"},
            "classes": [0, 1],
            "n_features": 2,
            "trees": [
                [
                    {"feature": 0, "threshold": 65, "left": 1, "right": 2},
                    {"distribution": [0.9, 0.1]},
                    {"distribution": [0.3, 0.7]}
                ]
            ]
        }"#,
    )
    .expect("write");

    let model = load_model(&path).expect("load");
    let meta = model.metadata().expect("metadata");
    assert_eq!(meta.name, "readmission");
    assert_eq!(meta.version, ModelVersion::new(1, 2, 0));
    assert_eq!(model.predict(&[70.0, 2.0]).unwrap(), 1);
    assert_eq!(model.predict(&[40.0, 2.0]).unwrap(), 0);
}

#[test]
fn missing_file_reports_path() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("absent.json");
    let err = load_model(&path).err().expect("should fail");
    assert!(matches!(err, ArtifactError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn corrupt_file_is_a_parse_error() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("model.json");
    std::fs::write(&path, b"\x00not json").expect("write");
    assert!(matches!(
        load_model(&path).err(),
        Some(ArtifactError::Parse(_))
    ));
}
