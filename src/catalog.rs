use std::{
    fmt,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::{ZooError, ZooResult};

/// Directory under the catalog root holding one subdirectory per model.
pub const MODELS_DIR: &str = "models";
/// Per-model index document.
pub const INDEX_FILE: &str = "index.yaml";
/// Per-version metadata document.
pub const METADATA_FILE: &str = "metadata.yaml";
/// Per-version feature schema document.
pub const FEATURE_SCHEMA_FILE: &str = "feature_schema.json";
/// Per-version artifact blob (opaque to this crate outside strict mode).
pub const ARTIFACT_FILE: &str = "model.pkl";

/// Which released version of a model to address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionSelector {
    /// Resolve through the model's `index.yaml` `latest.version` entry.
    Latest,
    /// An explicit version number (`v<N>` directory).
    Number(u64),
}

impl FromStr for VersionSelector {
    type Err = ZooError;

    fn from_str(s: &str) -> ZooResult<Self> {
        if s == "latest" {
            return Ok(Self::Latest);
        }
        s.parse::<u64>().map(Self::Number).map_err(|_| {
            ZooError::selector(format!(
                "version must be an integer or 'latest', got '{s}'"
            ))
        })
    }
}

impl From<u64> for VersionSelector {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Typed view of the one slice of `index.yaml` the resolver needs.
///
/// Everything except `latest` is deliberately left untyped and ignored:
/// shape problems elsewhere in the index are the validator's to report and
/// must not block resolving a valid `latest.version`.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ModelIndex {
    pub latest: Option<VersionRef>,
}

#[derive(Clone, Copy, Debug, serde::Deserialize)]
pub struct VersionRef {
    pub version: Option<u64>,
}

/// Read-only accessor for a catalog root.
///
/// All lookups are fail-fast: the first missing required file aborts the call
/// with a single [`ZooError`]. Path computations do not touch the filesystem
/// beyond what selector resolution requires.
#[derive(Clone, Debug)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn models_dir(&self) -> PathBuf {
        self.root.join(MODELS_DIR)
    }

    pub fn model_root(&self, model_name: &str) -> PathBuf {
        self.models_dir().join(model_name)
    }

    /// Parse a model's `index.yaml`. Fails with `NotFound` if absent.
    pub fn load_index(&self, model_name: &str) -> ZooResult<ModelIndex> {
        let path = self.model_root(model_name).join(INDEX_FILE);
        if !path.exists() {
            return Err(ZooError::not_found(path));
        }
        let f = File::open(&path)?;
        serde_yaml::from_reader(BufReader::new(f))
            .map_err(|e| ZooError::parse(format!("could not parse {}: {e}", path.display())))
    }

    /// Directory for a model version, e.g. `models/uc_power_model/v2`.
    ///
    /// `Latest` consults `index.yaml`; an explicit number is pure path
    /// computation and the directory's existence is not checked.
    pub fn version_dir(&self, model_name: &str, selector: VersionSelector) -> ZooResult<PathBuf> {
        let version = match selector {
            VersionSelector::Number(n) => n,
            VersionSelector::Latest => {
                let index = self.load_index(model_name)?;
                index
                    .latest
                    .and_then(|l| l.version)
                    .ok_or_else(|| {
                        ZooError::selector(format!(
                            "{}: no latest.version entry",
                            self.model_root(model_name).join(INDEX_FILE).display()
                        ))
                    })?
            }
        };
        Ok(self.model_root(model_name).join(format!("v{version}")))
    }

    /// Parse a version's `metadata.yaml` and return it verbatim.
    ///
    /// No schema validation happens here; that is the validator's job.
    pub fn load_metadata(
        &self,
        model_name: &str,
        selector: VersionSelector,
    ) -> ZooResult<serde_yaml::Value> {
        let path = self.version_dir(model_name, selector)?.join(METADATA_FILE);
        if !path.exists() {
            return Err(ZooError::not_found(path));
        }
        let f = File::open(&path)?;
        serde_yaml::from_reader(BufReader::new(f))
            .map_err(|e| ZooError::parse(format!("could not parse {}: {e}", path.display())))
    }

    /// Path to a version's artifact blob. Existence is not checked.
    pub fn artifact_path(
        &self,
        model_name: &str,
        selector: VersionSelector,
    ) -> ZooResult<PathBuf> {
        Ok(self.version_dir(model_name, selector)?.join(ARTIFACT_FILE))
    }
}
