//! Catalog-wide structural validation.
//!
//! Unlike the resolver in [`crate::catalog`], which fails fast, the sweep here
//! accumulates every violation it finds as a plain string and keeps going.
//! Catalog authors fix metadata in batches, so one run should surface every
//! problem at once. The only fatal conditions are a missing `models/`
//! directory and I/O errors while listing the tree.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    catalog::{ARTIFACT_FILE, FEATURE_SCHEMA_FILE, INDEX_FILE, METADATA_FILE, MODELS_DIR},
    error::{ZooError, ZooResult},
};

// Required-key sets, kept sorted so missing-key messages are stable.
const INDEX_REQUIRED: [&str; 3] = ["latest", "model_name", "versions"];
const METADATA_REQUIRED: [&str; 7] = [
    "features",
    "git",
    "metrics",
    "mlflow",
    "model_name",
    "status",
    "version",
];
const MLFLOW_REQUIRED: [&str; 3] = ["model_version", "registered_model_name", "run_id"];
const FEATURE_SCHEMA_REQUIRED: [&str; 2] = ["features", "target"];
const STATUS_VALID: [&str; 4] = ["staging", "production", "archived", "none"];

#[derive(Clone, Copy, Debug, Default)]
pub struct ValidateOptions {
    /// Also attempt to deserialize each `model.pkl`.
    pub strict: bool,
}

/// Outcome of a full sweep: every violation found, in traversal order.
#[derive(Clone, Debug, Default)]
pub struct Report {
    errors: Vec<String>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Walk every model and version under `root` and check the catalog contract.
///
/// Fails only when `root` has no `models/` directory or a directory listing
/// errors out; every per-document problem lands in the returned [`Report`].
#[tracing::instrument(skip(opts))]
pub fn validate_catalog(root: &Path, opts: &ValidateOptions) -> ZooResult<Report> {
    let models_dir = root.join(MODELS_DIR);
    if !models_dir.is_dir() {
        return Err(ZooError::not_found(models_dir));
    }

    let mut errors = Vec::new();

    for model_dir in sorted_subdirs(&models_dir)? {
        let model_name = dir_name(&model_dir);
        if model_name.starts_with('.') {
            continue;
        }
        tracing::debug!(model = %model_name, "validating model");

        let index_path = model_dir.join(INDEX_FILE);
        if !index_path.exists() {
            errors.push(format!("{model_name}: missing {INDEX_FILE}"));
            continue;
        }
        errors.extend(validate_index(&index_path, &model_dir));

        for v_dir in sorted_subdirs(&model_dir)? {
            if !dir_name(&v_dir).starts_with('v') {
                continue;
            }
            validate_version_dir(&v_dir, opts, &mut errors);
        }
    }

    Ok(Report { errors })
}

fn validate_version_dir(v_dir: &Path, opts: &ValidateOptions, errors: &mut Vec<String>) {
    let meta_path = v_dir.join(METADATA_FILE);
    if meta_path.exists() {
        errors.extend(validate_metadata(&meta_path));
    } else {
        errors.push(format!("{}: missing {METADATA_FILE}", v_dir.display()));
    }

    let schema_path = v_dir.join(FEATURE_SCHEMA_FILE);
    if schema_path.exists() {
        errors.extend(validate_feature_schema(&schema_path));
    } else {
        errors.push(format!("{}: missing {FEATURE_SCHEMA_FILE}", v_dir.display()));
    }

    let artifact_path = v_dir.join(ARTIFACT_FILE);
    if !artifact_path.exists() {
        errors.push(format!("{}: missing {ARTIFACT_FILE}", v_dir.display()));
    } else if opts.strict {
        errors.extend(check_artifact_load(&artifact_path));
    }
}

/// Validate one `index.yaml` against its model directory.
pub fn validate_index(path: &Path, model_root: &Path) -> Vec<String> {
    let index = match read_yaml(path) {
        Ok(v) => v,
        Err(msg) => return vec![msg],
    };
    if !index.is_mapping() {
        return vec![format!("{}: root must be a mapping", path.display())];
    }

    let mut errors = Vec::new();

    let missing = missing_yaml_keys(&index, &INDEX_REQUIRED);
    if !missing.is_empty() {
        errors.push(format!(
            "{}: missing required keys: {missing:?}",
            path.display()
        ));
    }

    if let Some(versions) = index.get("versions") {
        if let Some(seq) = versions.as_sequence() {
            for (i, entry) in seq.iter().enumerate() {
                if !entry.is_mapping() {
                    errors.push(format!("{}: versions[{i}] must be a mapping", path.display()));
                } else if let Some(ver) = entry.get("version") {
                    let ver_dir = model_root.join(format!("v{}", yaml_scalar(ver)));
                    if !ver_dir.is_dir() {
                        errors.push(format!(
                            "{}: version {} missing dir {}",
                            path.display(),
                            yaml_scalar(ver),
                            ver_dir.display()
                        ));
                    }
                } else {
                    errors.push(format!("{}: versions[{i}] missing 'version'", path.display()));
                }
            }
        } else {
            errors.push(format!("{}: versions must be a list", path.display()));
        }
    }

    if let Some(latest) = index.get("latest")
        && latest.is_mapping()
        && let Some(lv) = latest.get("version")
    {
        let ver_dir = model_root.join(format!("v{}", yaml_scalar(lv)));
        if !ver_dir.is_dir() {
            errors.push(format!(
                "{}: latest.version={} but dir {} missing",
                path.display(),
                yaml_scalar(lv),
                ver_dir.display()
            ));
        }
    }

    errors
}

/// Validate one `metadata.yaml`. Every check runs independently.
pub fn validate_metadata(path: &Path) -> Vec<String> {
    let meta = match read_yaml(path) {
        Ok(v) => v,
        Err(msg) => return vec![msg],
    };
    if !meta.is_mapping() {
        return vec![format!("{}: root must be a mapping", path.display())];
    }

    let mut errors = Vec::new();

    let missing = missing_yaml_keys(&meta, &METADATA_REQUIRED);
    if !missing.is_empty() {
        errors.push(format!(
            "{}: missing required keys: {missing:?}",
            path.display()
        ));
    }

    if let Some(version) = meta.get("version")
        && !version.is_number()
    {
        errors.push(format!(
            "{}: version must be numeric, got {}",
            path.display(),
            yaml_type_name(version)
        ));
    }

    if let Some(mlf) = meta.get("mlflow") {
        if !mlf.is_mapping() {
            errors.push(format!("{}: mlflow must be a mapping", path.display()));
        } else {
            let missing = missing_yaml_keys(mlf, &MLFLOW_REQUIRED);
            if !missing.is_empty() {
                errors.push(format!("{}: mlflow missing: {missing:?}", path.display()));
            }
            if let (Some(mv), Some(v)) = (mlf.get("model_version"), meta.get("version")) {
                // Exact numeric comparison: fractional versions mismatch
                // instead of truncating to equality.
                match (coerce_number(mv), coerce_number(v)) {
                    (Some(a), Some(b)) if a != b => errors.push(format!(
                        "{}: mlflow.model_version ({}) != version ({})",
                        path.display(),
                        yaml_scalar(mv),
                        yaml_scalar(v)
                    )),
                    (Some(_), Some(_)) => {}
                    _ => errors.push(format!(
                        "{}: mlflow.model_version and version must both be numeric",
                        path.display()
                    )),
                }
            }
        }
    }

    if let Some(git) = meta.get("git") {
        if !git.is_mapping() {
            errors.push(format!("{}: git must be a mapping", path.display()));
        } else if git.get("created_at").is_none() {
            errors.push(format!("{}: git.created_at required", path.display()));
        }
    }

    if let Some(status) = meta.get("status") {
        let s = yaml_scalar(status).to_lowercase();
        if !STATUS_VALID.contains(&s.as_str()) {
            errors.push(format!(
                "{}: status must be one of {STATUS_VALID:?}, got '{}'",
                path.display(),
                yaml_scalar(status)
            ));
        }
    }

    if let Some(features) = meta.get("features") {
        if let Some(seq) = features.as_sequence() {
            if !seq.is_empty() && !seq.iter().all(serde_yaml::Value::is_string) {
                errors.push(format!(
                    "{}: features must be list of strings",
                    path.display()
                ));
            }
        } else {
            errors.push(format!("{}: features must be a list", path.display()));
        }
    }

    errors
}

/// Validate one `feature_schema.json`.
pub fn validate_feature_schema(path: &Path) -> Vec<String> {
    let schema = match read_json(path) {
        Ok(v) => v,
        Err(msg) => return vec![msg],
    };
    let Some(obj) = schema.as_object() else {
        return vec![format!("{}: root must be an object", path.display())];
    };

    let mut errors = Vec::new();

    let missing: Vec<&str> = FEATURE_SCHEMA_REQUIRED
        .iter()
        .copied()
        .filter(|k| !obj.contains_key(*k))
        .collect();
    if !missing.is_empty() {
        errors.push(format!(
            "{}: missing required keys: {missing:?}",
            path.display()
        ));
    }

    if let Some(features) = obj.get("features")
        && !features.is_array()
    {
        errors.push(format!("{}: features must be a list", path.display()));
    }

    errors
}

#[cfg(feature = "strict-artifacts")]
fn check_artifact_load(path: &Path) -> Vec<String> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return vec![format!("{}: failed to load artifact: {e}", path.display())],
    };
    match serde_pickle::value_from_reader(BufReader::new(file), serde_pickle::DeOptions::new()) {
        Ok(_) => Vec::new(),
        Err(e) => vec![format!("{}: failed to load artifact: {e}", path.display())],
    }
}

#[cfg(not(feature = "strict-artifacts"))]
fn check_artifact_load(path: &Path) -> Vec<String> {
    vec![format!(
        "{}: artifact load-check unavailable (built without the 'strict-artifacts' feature)",
        path.display()
    )]
}

fn sorted_subdirs(dir: &Path) -> ZooResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_yaml(path: &Path) -> Result<serde_yaml::Value, String> {
    let file =
        File::open(path).map_err(|e| format!("could not parse {}: {e}", path.display()))?;
    serde_yaml::from_reader(BufReader::new(file))
        .map_err(|e| format!("could not parse {}: {e}", path.display()))
}

fn read_json(path: &Path) -> Result<serde_json::Value, String> {
    let file =
        File::open(path).map_err(|e| format!("could not parse {}: {e}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("could not parse {}: {e}", path.display()))
}

fn missing_yaml_keys<'a>(value: &serde_yaml::Value, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|k| value.get(k).is_none())
        .collect()
}

/// Scalar rendered the way it appears in the document, for error messages.
fn yaml_scalar(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => format!("{other:?}"),
    }
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "list",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

/// Numeric coercion for the mlflow/version cross-check. Digit strings count,
/// matching catalogs that quote version numbers.
fn coerce_number(value: &serde_yaml::Value) -> Option<f64> {
    match value {
        serde_yaml::Value::Number(n) => n.as_f64(),
        serde_yaml::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
