//! Backend traits and implementations for the control-plane services.
//!
//! Each external collaborator is one trait: [`StackBackend`] for stack
//! output lookups, [`IdentityBackend`] for certificate material,
//! [`StoreBackend`] for the object store and [`JobBackend`] for the job
//! queue. The production implementation is [`http::HttpBackend`], which
//! implements all four against the control plane's REST API.
//!
//! # Testing
//!
//! Use [`MockControlPlane`] for testing without network access. The mock
//! is `Clone` over shared state, so one instance can back several clients
//! in the same test:
//!
//! ```
//! use cloudkit::backend::{MockControlPlane, StackBackend};
//!
//! let mock = MockControlPlane::new();
//! mock.add_stack_output("demo-stack", "devfilesbucketname", "dev-files");
//!
//! let value = mock.stack_output("demo-stack", "devfilesbucketname").unwrap();
//! assert_eq!(value.as_deref(), Some("dev-files"));
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{Certificate, CertificateStatus, ObjectPage, ObjectSummary};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Backend for stack output lookups.
pub trait StackBackend: Send + Sync {
    /// Look up one output value on a deployed stack.
    ///
    /// Returns `Ok(None)` when the stack has no output under `key`.
    fn stack_output(&self, stack: &str, key: &str) -> Result<Option<String>>;
}

/// Backend for the device identity service.
pub trait IdentityBackend: Send + Sync {
    /// Fetch a certificate by id, or `None` if the service has no record.
    fn describe_certificate(&self, cert_id: &str) -> Result<Option<Certificate>>;

    /// Transition a certificate to a new lifecycle status.
    fn set_certificate_status(&self, cert_id: &str, status: CertificateStatus) -> Result<()>;

    /// Resolve the device-facing data endpoint address.
    fn data_endpoint(&self, endpoint_type: &str) -> Result<String>;
}

/// Backend for the object store.
pub trait StoreBackend: Send + Sync {
    /// Store an object, overwriting any existing object with the same key.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
        checksum: &str,
    ) -> Result<()>;

    /// List one page of objects, optionally continuing from `token`.
    fn list_objects(&self, bucket: &str, max_keys: u32, token: Option<&str>) -> Result<ObjectPage>;

    /// Delete one object. Deleting an absent key is not an error.
    fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Mint a time-limited read URL for one object.
    fn presign_object(&self, bucket: &str, key: &str, expires_in_secs: u64) -> Result<String>;
}

/// Backend for the job queue.
pub trait JobBackend: Send + Sync {
    /// Issue a forced delete for a job.
    ///
    /// Returns `Ok(true)` when the delete was accepted, `Ok(false)` when
    /// the queue has no such job.
    fn delete_job(&self, job_id: &str, force: bool) -> Result<bool>;

    /// Query whether a job still exists; `None` means the queue reports
    /// the job absent.
    fn describe_job(&self, job_id: &str) -> Result<Option<String>>;
}

/// An object held by the mock store, with the metadata the client sent.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object body bytes.
    pub body: Vec<u8>,
    /// Content type the client uploaded with.
    pub content_type: String,
    /// Integrity checksum header the client sent.
    pub checksum: String,
}

#[derive(Debug, Clone)]
struct MockJob {
    deleting: bool,
    /// Confirmation queries answered "still present" after the delete
    /// is accepted, before the job disappears. `u32::MAX` never completes.
    confirm_after: u32,
}

/// Mock control plane for testing without network access.
///
/// All state lives behind shared handles, so clones observe each other's
/// writes - hand clones of one mock to several clients in a test.
#[derive(Debug, Clone, Default)]
pub struct MockControlPlane {
    stack_outputs: Arc<Mutex<HashMap<(String, String), String>>>,
    certificates: Arc<Mutex<HashMap<String, Certificate>>>,
    endpoint_address: Arc<Mutex<Option<String>>>,
    buckets: Arc<Mutex<HashMap<String, BTreeMap<String, StoredObject>>>>,
    failing_buckets: Arc<Mutex<HashSet<String>>>,
    jobs: Arc<Mutex<HashMap<String, MockJob>>>,
    delete_calls: Arc<Mutex<Vec<(String, String)>>>,
    presign_calls: Arc<Mutex<Vec<(String, String, u64)>>>,
}

impl MockControlPlane {
    /// Create a new empty mock control plane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stack output value.
    pub fn add_stack_output(&self, stack: &str, key: &str, value: &str) {
        let mut outputs = self.stack_outputs.lock().unwrap();
        outputs.insert((stack.to_string(), key.to_string()), value.to_string());
    }

    /// Register an active certificate with the given PEM body.
    pub fn add_certificate(&self, cert_id: &str, pem: &str) {
        let mut certs = self.certificates.lock().unwrap();
        certs.insert(
            cert_id.to_string(),
            Certificate {
                certificate_id: cert_id.to_string(),
                certificate_pem: pem.to_string(),
                status: CertificateStatus::Active,
            },
        );
    }

    /// Current status of a registered certificate.
    #[must_use]
    pub fn certificate_status(&self, cert_id: &str) -> Option<CertificateStatus> {
        let certs = self.certificates.lock().unwrap();
        certs.get(cert_id).map(|c| c.status)
    }

    /// Set the data endpoint address returned by `data_endpoint`.
    pub fn set_endpoint_address(&self, address: &str) {
        *self.endpoint_address.lock().unwrap() = Some(address.to_string());
    }

    /// Register a job that disappears on the first confirmation query
    /// after its delete is accepted.
    pub fn add_job(&self, job_id: &str) {
        self.add_job_with_lag(job_id, 0);
    }

    /// Register a job that keeps answering "present" for `lag` confirmation
    /// queries after its delete is accepted. Use `u32::MAX` for a job that
    /// never completes deletion.
    pub fn add_job_with_lag(&self, job_id: &str, lag: u32) {
        let mut jobs = self.jobs.lock().unwrap();
        jobs.insert(
            job_id.to_string(),
            MockJob {
                deleting: false,
                confirm_after: lag,
            },
        );
    }

    /// Make every store operation on `bucket` fail.
    pub fn fail_bucket(&self, bucket: &str) {
        self.failing_buckets.lock().unwrap().insert(bucket.to_string());
    }

    /// Fetch a stored object for assertions.
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let buckets = self.buckets.lock().unwrap();
        buckets.get(bucket).and_then(|b| b.get(key)).cloned()
    }

    /// Number of objects currently in a bucket.
    #[must_use]
    pub fn object_count(&self, bucket: &str) -> usize {
        let buckets = self.buckets.lock().unwrap();
        buckets.get(bucket).map_or(0, BTreeMap::len)
    }

    /// Keys currently in a bucket, sorted.
    #[must_use]
    pub fn bucket_keys(&self, bucket: &str) -> Vec<String> {
        let buckets = self.buckets.lock().unwrap();
        buckets
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether a job is still known to the queue.
    #[must_use]
    pub fn job_exists(&self, job_id: &str) -> bool {
        self.jobs.lock().unwrap().contains_key(job_id)
    }

    /// Every `delete_object` call recorded, in order.
    #[must_use]
    pub fn delete_calls(&self) -> Vec<(String, String)> {
        self.delete_calls.lock().unwrap().clone()
    }

    /// Every `presign_object` call recorded, in order.
    #[must_use]
    pub fn presign_calls(&self) -> Vec<(String, String, u64)> {
        self.presign_calls.lock().unwrap().clone()
    }

    fn check_bucket(&self, bucket: &str) -> Result<()> {
        if self.failing_buckets.lock().unwrap().contains(bucket) {
            return Err(Error::http(
                format!("injected failure for bucket {}", bucket),
                Some(500),
            ));
        }
        Ok(())
    }
}

impl StackBackend for MockControlPlane {
    fn stack_output(&self, stack: &str, key: &str) -> Result<Option<String>> {
        let outputs = self.stack_outputs.lock().unwrap();
        Ok(outputs.get(&(stack.to_string(), key.to_string())).cloned())
    }
}

impl IdentityBackend for MockControlPlane {
    fn describe_certificate(&self, cert_id: &str) -> Result<Option<Certificate>> {
        let certs = self.certificates.lock().unwrap();
        Ok(certs.get(cert_id).cloned())
    }

    fn set_certificate_status(&self, cert_id: &str, status: CertificateStatus) -> Result<()> {
        let mut certs = self.certificates.lock().unwrap();
        match certs.get_mut(cert_id) {
            Some(cert) => {
                cert.status = status;
                Ok(())
            }
            None => Err(Error::CertificateNotFound(cert_id.to_string())),
        }
    }

    fn data_endpoint(&self, _endpoint_type: &str) -> Result<String> {
        self.endpoint_address
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::InvalidResponse("mock endpoint address not configured".to_string()))
    }
}

impl StoreBackend for MockControlPlane {
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
        checksum: &str,
    ) -> Result<()> {
        self.check_bucket(bucket)?;
        let mut buckets = self.buckets.lock().unwrap();
        buckets.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
                checksum: checksum.to_string(),
            },
        );
        Ok(())
    }

    fn list_objects(&self, bucket: &str, max_keys: u32, token: Option<&str>) -> Result<ObjectPage> {
        self.check_bucket(bucket)?;
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets.get(bucket);

        let keys: Vec<String> = objects
            .map(|b| {
                b.keys()
                    .filter(|k| token.is_none_or(|t| k.as_str() > t))
                    .take(max_keys as usize + 1)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let truncated = keys.len() > max_keys as usize;
        let page: Vec<String> = keys.into_iter().take(max_keys as usize).collect();
        let next_token = if truncated { page.last().cloned() } else { None };

        Ok(ObjectPage {
            objects: page.into_iter().map(|key| ObjectSummary { key }).collect(),
            next_token,
            truncated,
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.check_bucket(bucket)?;
        self.delete_calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        let mut buckets = self.buckets.lock().unwrap();
        if let Some(b) = buckets.get_mut(bucket) {
            b.remove(key);
        }
        Ok(())
    }

    fn presign_object(&self, bucket: &str, key: &str, expires_in_secs: u64) -> Result<String> {
        self.check_bucket(bucket)?;
        self.presign_calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), expires_in_secs));
        Ok(format!(
            "https://store.mock/{}/{}?sig=mock&expires={}",
            bucket, key, expires_in_secs
        ))
    }
}

impl JobBackend for MockControlPlane {
    fn delete_job(&self, job_id: &str, _force: bool) -> Result<bool> {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.get_mut(job_id) {
            Some(job) => {
                job.deleting = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn describe_job(&self, job_id: &str) -> Result<Option<String>> {
        let mut jobs = self.jobs.lock().unwrap();
        let status = match jobs.get_mut(job_id) {
            None => return Ok(None),
            Some(job) if job.deleting && job.confirm_after == 0 => None,
            Some(job) => {
                if job.deleting && job.confirm_after != u32::MAX {
                    job.confirm_after -= 1;
                }
                let status = if job.deleting { "DELETION_IN_PROGRESS" } else { "QUEUED" };
                Some(status.to_string())
            }
        };
        if status.is_none() {
            jobs.remove(job_id);
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_stack_output_absent() {
        let mock = MockControlPlane::new();
        let value = mock.stack_output("demo-stack", "devfilesbucketname").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_mock_certificate_lifecycle() {
        let mock = MockControlPlane::new();
        mock.add_certificate("cert-1", "-----BEGIN CERTIFICATE-----");

        let cert = mock.describe_certificate("cert-1").unwrap().unwrap();
        assert_eq!(cert.status, CertificateStatus::Active);

        mock.set_certificate_status("cert-1", CertificateStatus::Inactive)
            .unwrap();
        assert_eq!(
            mock.certificate_status("cert-1"),
            Some(CertificateStatus::Inactive)
        );
    }

    #[test]
    fn test_mock_set_status_unknown_certificate() {
        let mock = MockControlPlane::new();
        let result = mock.set_certificate_status("missing", CertificateStatus::Inactive);
        assert!(matches!(result, Err(Error::CertificateNotFound(_))));
    }

    #[test]
    fn test_mock_put_overwrites() {
        let mock = MockControlPlane::new();
        mock.put_object("b", "k", b"one", "application/octet-stream", "c1")
            .unwrap();
        mock.put_object("b", "k", b"two", "application/octet-stream", "c2")
            .unwrap();

        assert_eq!(mock.object_count("b"), 1);
        assert_eq!(mock.object("b", "k").unwrap().body, b"two");
    }

    #[test]
    fn test_mock_list_pagination() {
        let mock = MockControlPlane::new();
        for i in 0..25 {
            let key = format!("obj-{:02}", i);
            mock.put_object("b", &key, b"x", "application/octet-stream", "c")
                .unwrap();
        }

        let first = mock.list_objects("b", 10, None).unwrap();
        assert_eq!(first.objects.len(), 10);
        assert!(first.truncated);

        let second = mock
            .list_objects("b", 10, first.next_token.as_deref())
            .unwrap();
        assert_eq!(second.objects.len(), 10);
        assert!(second.truncated);

        let third = mock
            .list_objects("b", 10, second.next_token.as_deref())
            .unwrap();
        assert_eq!(third.objects.len(), 5);
        assert!(!third.truncated);
        assert!(third.next_token.is_none());
    }

    #[test]
    fn test_mock_clone_shares_state() {
        let mock = MockControlPlane::new();
        let clone = mock.clone();

        clone
            .put_object("b", "k", b"body", "application/octet-stream", "c")
            .unwrap();
        assert_eq!(mock.object_count("b"), 1);
    }

    #[test]
    fn test_mock_job_delete_and_confirm() {
        let mock = MockControlPlane::new();
        mock.add_job_with_lag("job-1", 2);

        assert!(mock.delete_job("job-1", true).unwrap());
        assert!(mock.describe_job("job-1").unwrap().is_some());
        assert!(mock.describe_job("job-1").unwrap().is_some());
        assert!(mock.describe_job("job-1").unwrap().is_none());
        assert!(!mock.job_exists("job-1"));
    }

    #[test]
    fn test_mock_job_delete_absent() {
        let mock = MockControlPlane::new();
        assert!(!mock.delete_job("missing", true).unwrap());
    }

    #[test]
    fn test_mock_failing_bucket() {
        let mock = MockControlPlane::new();
        mock.fail_bucket("broken");

        assert!(mock.list_objects("broken", 10, None).is_err());
        assert!(mock.list_objects("healthy", 10, None).is_ok());
    }
}
