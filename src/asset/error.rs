//! Error types for the asset provisioning pipeline.

use std::io;
use std::path::PathBuf;

/// Result type alias for asset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while provisioning or tearing down demo assets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required stack output is absent: the referenced stack is not the
    /// expected kind or not fully deployed. Never retried.
    #[error("the stack output {key} not found, is the app OTA demo stack {stack} invalid?")]
    MissingStackOutput {
        /// Output key that was expected.
        key: String,
        /// Stack that was queried.
        stack: String,
    },

    /// A build-time asset (key, CA, template, agent package) cannot be
    /// located; indicates a packaging defect.
    #[error("resource file {name} not found")]
    ResourceMissing {
        /// Resource-directory-relative name.
        name: String,
    },

    /// Teardown finished but one or more independent purge steps failed.
    #[error("cleanup incomplete, {} step(s) failed: {}", failures.len(), failures.join("; "))]
    CleanupIncomplete {
        /// One message per failed purge step.
        failures: Vec<String>,
    },

    /// Control plane operation failed.
    #[error(transparent)]
    Cloud(#[from] cloudkit::Error),

    /// Archiving the credential bundle failed.
    #[error("failed to write credential archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error during file operations.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
