//! Object store gateway.
//!
//! Uploads local files, empties buckets page by page, and mints presigned
//! read URLs. Upload and purge faults are fatal for the current sub-step
//! and are never retried here; the caller owns sequencing and isolation.

use crate::backend::http::HttpBackend;
use crate::backend::StoreBackend;
use crate::error::{Error, Result};
use crate::types::PresignedUrl;
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Content type every published artifact is stored under.
const OBJECT_CONTENT_TYPE: &str = "application/octet-stream";

/// Listing page size used while emptying a bucket.
const EMPTY_PAGE_SIZE: u32 = 10;

/// Client for the object store.
pub struct StoreClient {
    backend: Box<dyn StoreBackend>,
}

impl StoreClient {
    /// Create a client against the given control-plane endpoint.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            backend: Box::new(HttpBackend::new(endpoint)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    /// Upload a local file, keyed by its base name.
    ///
    /// Overwrites any existing object under the same key. Returns the
    /// object key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transfer`] when the store rejects the upload;
    /// the caller must treat this as fatal for the current operation.
    pub fn upload(&self, bucket: &str, local_file: &Path) -> Result<String> {
        let key = local_file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Transfer {
                bucket: bucket.to_string(),
                key: local_file.display().to_string(),
                message: "local file has no usable base name".to_string(),
            })?
            .to_string();

        let body = fs::read(local_file).map_err(|e| Error::io(local_file, e))?;
        let checksum = blake3::hash(&body).to_hex().to_string();

        log::debug!("uploading file {} ({} bytes) ...", key, body.len());

        self.backend
            .put_object(bucket, &key, &body, OBJECT_CONTENT_TYPE, &checksum)
            .map_err(|e| Error::Transfer {
                bucket: bucket.to_string(),
                key: key.clone(),
                message: e.to_string(),
            })?;

        log::info!(
            "file {} uploaded to the bucket {} (blake3 {})",
            key,
            bucket,
            checksum
        );
        Ok(key)
    }

    /// Mint a presigned read URL valid for `validity_days` from now.
    ///
    /// The URL is an unauthenticated bearer capability; it is logged at
    /// debug level only.
    pub fn presign(&self, bucket: &str, key: &str, validity_days: u64) -> Result<PresignedUrl> {
        let expires_in_secs = validity_days * 24 * 60 * 60;
        let url = self.backend.presign_object(bucket, key, expires_in_secs)?;
        let expires_at = Utc::now() + chrono::Duration::days(validity_days as i64);

        log::debug!(
            "presigned URL for {} in bucket {} expires at {}",
            key,
            bucket,
            expires_at
        );

        Ok(PresignedUrl {
            key: key.to_string(),
            url,
            expires_at,
        })
    }

    /// Delete every object in a bucket.
    ///
    /// Lists in pages and follows continuation tokens until the listing
    /// reports no further truncation. An already-empty bucket is success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] when a list or delete call is rejected;
    /// remaining objects in this bucket are left as-is, but the caller
    /// should still attempt sibling buckets.
    pub fn empty(&self, bucket: &str) -> Result<()> {
        let mut token: Option<String> = None;

        loop {
            let page = self
                .backend
                .list_objects(bucket, EMPTY_PAGE_SIZE, token.as_deref())
                .map_err(|e| Error::Store {
                    bucket: bucket.to_string(),
                    message: e.to_string(),
                })?;

            for obj in &page.objects {
                log::debug!("deleting file {} from the bucket {} ...", obj.key, bucket);
                self.backend
                    .delete_object(bucket, &obj.key)
                    .map_err(|e| Error::Store {
                        bucket: bucket.to_string(),
                        message: e.to_string(),
                    })?;
            }

            if !page.truncated {
                return Ok(());
            }
            token = page.next_token;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockControlPlane;
    use std::io::Write;

    fn temp_file(name: &str, content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_upload_keys_by_base_name() {
        let mock = MockControlPlane::new();
        let client = StoreClient::with_backend(Box::new(mock.clone()));
        let (_dir, path) = temp_file("credentials.zip", b"zip bytes");

        let key = client.upload("dev-files", &path).unwrap();
        assert_eq!(key, "credentials.zip");

        let stored = mock.object("dev-files", "credentials.zip").unwrap();
        assert_eq!(stored.body, b"zip bytes");
        assert_eq!(stored.content_type, "application/octet-stream");
        assert_eq!(stored.checksum, blake3::hash(b"zip bytes").to_hex().to_string());
    }

    #[test]
    fn test_upload_overwrites_existing_key() {
        let mock = MockControlPlane::new();
        let client = StoreClient::with_backend(Box::new(mock.clone()));

        let (_d1, first) = temp_file("setup.py", b"old");
        let (_d2, second) = temp_file("setup.py", b"new");
        client.upload("dev-files", &first).unwrap();
        client.upload("dev-files", &second).unwrap();

        assert_eq!(mock.object_count("dev-files"), 1);
        assert_eq!(mock.object("dev-files", "setup.py").unwrap().body, b"new");
    }

    #[test]
    fn test_upload_missing_local_file() {
        let client = StoreClient::with_backend(Box::new(MockControlPlane::new()));
        let result = client.upload("dev-files", Path::new("/nonexistent/file.zip"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_upload_rejected_is_transfer_error() {
        let mock = MockControlPlane::new();
        mock.fail_bucket("dev-files");
        let client = StoreClient::with_backend(Box::new(mock));
        let (_dir, path) = temp_file("credentials.zip", b"zip bytes");

        let result = client.upload("dev-files", &path);
        assert!(matches!(result, Err(Error::Transfer { bucket, .. }) if bucket == "dev-files"));
    }

    #[test]
    fn test_presign_expiry_seconds_and_stamp() {
        let mock = MockControlPlane::new();
        let client = StoreClient::with_backend(Box::new(mock.clone()));

        let before = Utc::now();
        let url = client.presign("dev-files", "credentials.zip", 7).unwrap();
        let after = Utc::now();

        let calls = mock.presign_calls();
        assert_eq!(calls, vec![("dev-files".to_string(), "credentials.zip".to_string(), 604_800)]);

        let lower = before + chrono::Duration::days(7);
        let upper = after + chrono::Duration::days(7);
        assert!(url.expires_at >= lower && url.expires_at <= upper);
        assert_eq!(url.key, "credentials.zip");
    }

    #[test]
    fn test_empty_bucket_across_pages() {
        let mock = MockControlPlane::new();
        for i in 0..23 {
            let key = format!("obj-{:02}", i);
            mock.put_object("dev-files", &key, b"x", "application/octet-stream", "c")
                .unwrap();
        }

        let client = StoreClient::with_backend(Box::new(mock.clone()));
        client.empty("dev-files").unwrap();

        assert_eq!(mock.object_count("dev-files"), 0);
        assert_eq!(mock.delete_calls().len(), 23);
    }

    #[test]
    fn test_empty_already_empty_issues_no_deletes() {
        let mock = MockControlPlane::new();
        let client = StoreClient::with_backend(Box::new(mock.clone()));

        client.empty("dev-files").unwrap();
        assert!(mock.delete_calls().is_empty());
    }

    #[test]
    fn test_empty_rejected_is_store_error() {
        let mock = MockControlPlane::new();
        mock.fail_bucket("job-docs");
        let client = StoreClient::with_backend(Box::new(mock));

        let result = client.empty("job-docs");
        assert!(matches!(result, Err(Error::Store { bucket, .. }) if bucket == "job-docs"));
    }
}
