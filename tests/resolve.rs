use std::{fs, path::Path};

use modelzoo::{Catalog, VersionSelector, ZooError};

const INDEX: &str = "\
model_name: uc_power_model
versions:
  - version: 1
  - version: 3
latest:
  version: 3
";

const METADATA: &str = "\
model_name: uc_power_model
version: 3
mlflow:
  registered_model_name: uc_power_model
  model_version: 3
  run_id: abc123
git:
  created_at: 2026-02-01T09:30:00Z
status: production
metrics:
  rmse: 0.42
features:
  - x1
";

fn write_fixture(root: &Path) {
    let model_root = root.join("models").join("uc_power_model");
    for v in ["v1", "v3"] {
        fs::create_dir_all(model_root.join(v)).unwrap();
    }
    fs::write(model_root.join("index.yaml"), INDEX).unwrap();
    fs::write(model_root.join("v3").join("metadata.yaml"), METADATA).unwrap();
}

#[test]
fn latest_and_explicit_resolve_to_the_same_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let catalog = Catalog::new(dir.path());

    let latest = catalog
        .version_dir("uc_power_model", VersionSelector::Latest)
        .unwrap();
    let explicit = catalog
        .version_dir("uc_power_model", VersionSelector::Number(3))
        .unwrap();
    assert_eq!(latest, explicit);
    assert!(latest.ends_with("models/uc_power_model/v3"));
}

#[test]
fn load_metadata_returns_the_document_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let catalog = Catalog::new(dir.path());

    let meta = catalog
        .load_metadata("uc_power_model", VersionSelector::Latest)
        .unwrap();
    assert_eq!(meta["version"], serde_yaml::Value::from(3));
    assert_eq!(
        meta["mlflow"]["run_id"],
        serde_yaml::Value::from("abc123")
    );
}

#[test]
fn metadata_for_a_version_without_the_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let catalog = Catalog::new(dir.path());

    // v1 exists but holds no metadata.yaml.
    let err = catalog
        .load_metadata("uc_power_model", VersionSelector::Number(1))
        .unwrap_err();
    match err {
        ZooError::NotFound(path) => assert!(path.ends_with("v1/metadata.yaml"), "{path:?}"),
        other => panic!("expected NotFound, got {other}"),
    }
}

#[test]
fn artifact_path_does_not_require_the_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let catalog = Catalog::new(dir.path());

    let path = catalog
        .artifact_path("uc_power_model", VersionSelector::Latest)
        .unwrap();
    assert!(path.ends_with("models/uc_power_model/v3/model.pkl"));
    assert!(!path.exists());
}

#[test]
fn selector_display_round_trips() {
    for s in ["latest", "0", "42"] {
        let sel: VersionSelector = s.parse().unwrap();
        assert_eq!(sel.to_string(), s);
    }
}
