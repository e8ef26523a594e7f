#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod validate;

pub use catalog::{
    ARTIFACT_FILE, Catalog, FEATURE_SCHEMA_FILE, INDEX_FILE, METADATA_FILE, MODELS_DIR,
    ModelIndex, VersionSelector,
};
pub use error::{ZooError, ZooResult};
pub use validate::{Report, ValidateOptions, validate_catalog};
