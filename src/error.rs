use std::path::PathBuf;

pub type ZooResult<T> = Result<T, ZooError>;

#[derive(thiserror::Error, Debug)]
pub enum ZooError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("selector error: {0}")]
    Selector(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ZooError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    pub fn selector(msg: impl Into<String>) -> Self {
        Self::Selector(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
