use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Glob error: {0}")]
    Glob(String),

    #[error("Manifest error in {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

impl From<glob::PatternError> for RegistryError {
    fn from(error: glob::PatternError) -> Self {
        Self::Glob(error.to_string())
    }
}

impl From<glob::GlobError> for RegistryError {
    fn from(error: glob::GlobError) -> Self {
        Self::Glob(error.to_string())
    }
}
