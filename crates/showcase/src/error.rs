use std::fmt;

use registry::RegistryError;

/// Unified error type for the showcase server.
#[derive(Debug)]
pub enum ShowcaseError {
    /// A configuration value could not be used.
    InvalidConfig(String),
    /// Project discovery failed.
    Registry(RegistryError),
    /// Socket or filesystem failure.
    Io(std::io::Error),
    /// Internal error.
    Internal(String),
}

impl fmt::Display for ShowcaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowcaseError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            ShowcaseError::Registry(error) => write!(f, "registry error: {error}"),
            ShowcaseError::Io(error) => write!(f, "io error: {error}"),
            ShowcaseError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for ShowcaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShowcaseError::Registry(error) => Some(error),
            ShowcaseError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<RegistryError> for ShowcaseError {
    fn from(error: RegistryError) -> Self {
        ShowcaseError::Registry(error)
    }
}

impl From<std::io::Error> for ShowcaseError {
    fn from(error: std::io::Error) -> Self {
        ShowcaseError::Io(error)
    }
}

/// Result type alias using [`ShowcaseError`].
pub type ShowcaseResult<T> = Result<T, ShowcaseError>;
