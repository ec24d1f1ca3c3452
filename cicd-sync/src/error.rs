//! Error types for cicd-sync.
//!
//! These never leave the crate's public operations: [`crate::copy_templates`]
//! folds them into a per-target status.

use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can arise while enumerating or writing templates.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying one file failed (read side or write side).
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination resolves to the template source itself.
    #[error("{path} resolves to the template source {source_dir}; refusing to overwrite it")]
    SameAsSource { path: PathBuf, source_dir: PathBuf },
}

impl SyncError {
    /// The underlying I/O error, if there is one.
    pub fn io(&self) -> Option<&std::io::Error> {
        match self {
            SyncError::Io { source, .. } | SyncError::Copy { source, .. } => Some(source),
            SyncError::SameAsSource { .. } => None,
        }
    }

    /// True when the failure is about access rights.
    pub fn is_permission_denied(&self) -> bool {
        self.io()
            .is_some_and(|e| e.kind() == ErrorKind::PermissionDenied)
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
