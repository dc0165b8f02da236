//! HTTP backend for the control plane REST API.
//!
//! One [`HttpBackend`] implements all four service traits against a single
//! control-plane endpoint. Requests are blocking and unauthenticated
//! beyond what the deployment's network boundary provides; presigned URL
//! responses are bearer capabilities and are never logged above debug.

use crate::backend::{IdentityBackend, JobBackend, StackBackend, StoreBackend};
use crate::error::{Error, Result};
use crate::types::{Certificate, CertificateStatus, ObjectPage};
use serde::Deserialize;
use serde_json::json;

/// Maximum response body size accepted from the control plane (1 MB; the
/// largest payload we read back is a certificate PEM).
const MAX_BODY_SIZE: u64 = 1024 * 1024;

/// Control plane backend over HTTP.
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Control plane base URL.
    api_base: String,
}

impl HttpBackend {
    /// Create a backend against the given control-plane base URL.
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn stack_output_url(&self, stack: &str, key: &str) -> String {
        format!("{}/v1/stacks/{}/outputs/{}", self.api_base, stack, key)
    }

    fn certificate_url(&self, cert_id: &str) -> String {
        format!("{}/v1/certificates/{}", self.api_base, cert_id)
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/v1/buckets/{}/objects/{}", self.api_base, bucket, key)
    }

    fn job_url(&self, job_id: &str) -> String {
        format!("{}/v1/jobs/{}", self.api_base, job_id)
    }
}

impl StackBackend for HttpBackend {
    fn stack_output(&self, stack: &str, key: &str) -> Result<Option<String>> {
        let url = self.stack_output_url(stack, key);

        match self.agent.get(&url).call() {
            Ok(mut resp) => {
                let body: StackOutputResponse = resp.body_mut().read_json()?;
                Ok(Some(body.value))
            }
            Err(ureq::Error::StatusCode(404)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl IdentityBackend for HttpBackend {
    fn describe_certificate(&self, cert_id: &str) -> Result<Option<Certificate>> {
        let url = self.certificate_url(cert_id);

        match self.agent.get(&url).call() {
            Ok(mut resp) => Ok(Some(resp.body_mut().read_json()?)),
            Err(ureq::Error::StatusCode(404)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_certificate_status(&self, cert_id: &str, status: CertificateStatus) -> Result<()> {
        let url = format!("{}/status", self.certificate_url(cert_id));

        match self
            .agent
            .post(&url)
            .send_json(json!({ "new_status": status.as_str() }))
        {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(404)) => {
                Err(Error::CertificateNotFound(cert_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn data_endpoint(&self, endpoint_type: &str) -> Result<String> {
        let url = format!("{}/v1/endpoint", self.api_base);

        let body: EndpointResponse = self
            .agent
            .get(&url)
            .query("type", endpoint_type)
            .call()?
            .body_mut()
            .read_json()?;

        Ok(body.endpoint_address)
    }
}

impl StoreBackend for HttpBackend {
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
        checksum: &str,
    ) -> Result<()> {
        let url = self.object_url(bucket, key);

        self.agent
            .put(&url)
            .header("Content-Type", content_type)
            .header("x-checksum-blake3", checksum)
            .send(body)?;

        Ok(())
    }

    fn list_objects(&self, bucket: &str, max_keys: u32, token: Option<&str>) -> Result<ObjectPage> {
        let url = format!("{}/v1/buckets/{}/objects", self.api_base, bucket);

        let mut req = self
            .agent
            .get(&url)
            .query("max_keys", &max_keys.to_string());
        if let Some(token) = token {
            req = req.query("token", token);
        }

        let page: ObjectPage = req
            .call()?
            .body_mut()
            .with_config()
            .limit(MAX_BODY_SIZE)
            .read_json()?;

        Ok(page)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let url = self.object_url(bucket, key);

        match self.agent.delete(&url).call() {
            // Deleting an absent key is success - purge must be idempotent.
            Ok(_) | Err(ureq::Error::StatusCode(404)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn presign_object(&self, bucket: &str, key: &str, expires_in_secs: u64) -> Result<String> {
        let url = format!("{}/presign", self.object_url(bucket, key));

        let body: PresignResponse = self
            .agent
            .post(&url)
            .send_json(json!({ "expires_in_secs": expires_in_secs }))?
            .body_mut()
            .read_json()?;

        Ok(body.url)
    }
}

impl JobBackend for HttpBackend {
    fn delete_job(&self, job_id: &str, force: bool) -> Result<bool> {
        let url = self.job_url(job_id);

        let req = self
            .agent
            .delete(&url)
            .query("force", if force { "true" } else { "false" });

        match req.call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::StatusCode(404)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn describe_job(&self, job_id: &str) -> Result<Option<String>> {
        let url = self.job_url(job_id);

        match self.agent.get(&url).call() {
            Ok(mut resp) => {
                let body: JobResponse = resp.body_mut().read_json()?;
                Ok(Some(body.status))
            }
            Err(ureq::Error::StatusCode(404)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Control plane response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StackOutputResponse {
    value: String,
}

#[derive(Debug, Deserialize)]
struct EndpointResponse {
    endpoint_address: String,
}

#[derive(Debug, Deserialize)]
struct PresignResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let backend = HttpBackend::new("https://cp.example.com/");
        assert_eq!(backend.api_base(), "https://cp.example.com");
    }

    #[test]
    fn test_stack_output_url() {
        let backend = HttpBackend::new("https://cp.example.com");
        assert_eq!(
            backend.stack_output_url("demo-stack", "certid"),
            "https://cp.example.com/v1/stacks/demo-stack/outputs/certid"
        );
    }

    #[test]
    fn test_object_url() {
        let backend = HttpBackend::new("https://cp.example.com");
        assert_eq!(
            backend.object_url("dev-files", "credentials.zip"),
            "https://cp.example.com/v1/buckets/dev-files/objects/credentials.zip"
        );
    }

    #[test]
    fn test_job_url() {
        let backend = HttpBackend::new("https://cp.example.com");
        assert_eq!(
            backend.job_url("nw-app-ota-demo-deploy-app-v1"),
            "https://cp.example.com/v1/jobs/nw-app-ota-demo-deploy-app-v1"
        );
    }
}
