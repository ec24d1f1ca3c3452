//! Error types for cicd-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a run before any target is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the settings file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with the file path for context.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// An explicitly requested source directory does not exist.
    #[error("source template directory not found at {path}")]
    SourceNotFound { path: PathBuf },

    /// No installation-relative template directory could be located.
    #[error("could not locate a {dir}/ template directory next to the installation; pass --source")]
    NoDefaultSource { dir: &'static str },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
