//! Error types for control-plane operations.

use std::io;
use std::path::PathBuf;

/// Result type alias for control-plane operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the control plane.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// An object upload was rejected by the store.
    #[error("failed to upload {key} to bucket {bucket}: {message}")]
    Transfer {
        /// Target bucket.
        bucket: String,
        /// Object key being uploaded.
        key: String,
        /// Error message.
        message: String,
    },

    /// A list or delete call on a bucket was rejected by the store.
    #[error("object store rejected operation on bucket {bucket}: {message}")]
    Store {
        /// Bucket the operation targeted.
        bucket: String,
        /// Error message.
        message: String,
    },

    /// The identity service has no record of the certificate.
    #[error("certificate {0} not found")]
    CertificateNotFound(String),

    /// Job-deletion confirmation did not complete inside the bounded wait.
    #[error("job {job_id} still present after {attempts} confirmation attempts")]
    ReapTimeout {
        /// Job that never reported absent.
        job_id: String,
        /// Confirmation attempts made before giving up.
        attempts: u32,
    },

    /// Response body could not be parsed.
    #[error("invalid control plane response: {0}")]
    InvalidResponse(String),

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

    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_bucket_and_key() {
        let err = Error::Transfer {
            bucket: "dev-files".to_string(),
            key: "credentials.zip".to_string(),
            message: "connection reset".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("dev-files"));
        assert!(display.contains("credentials.zip"));
    }

    #[test]
    fn test_error_http_constructor() {
        let err = Error::http("service unavailable", Some(503));
        match err {
            Error::Http { message, status } => {
                assert_eq!(message, "service unavailable");
                assert_eq!(status, Some(503));
            }
            _ => panic!("Expected Error::Http"),
        }
    }

    #[test]
    fn test_error_io_constructor() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/credentials.zip", io_err);
        match err {
            Error::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/tmp/credentials.zip"));
            }
            _ => panic!("Expected Error::Io"),
        }
    }

    #[test]
    fn test_reap_timeout_display() {
        let err = Error::ReapTimeout {
            job_id: "nw-app-ota-demo-deploy-app-v1".to_string(),
            attempts: 30,
        };
        let display = format!("{}", err);
        assert!(display.contains("nw-app-ota-demo-deploy-app-v1"));
        assert!(display.contains("30"));
    }
}
