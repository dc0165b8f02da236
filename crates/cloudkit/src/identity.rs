//! Device identity service client.
//!
//! Fetches certificate PEM material by id and drives the one lifecycle
//! transition the builder needs: active to inactive. Deactivation is not
//! polled for confirmation - nothing downstream of it depends on the
//! status change having propagated, unlike job deletion (see
//! [`crate::jobs`]).

use crate::backend::http::HttpBackend;
use crate::backend::IdentityBackend;
use crate::error::{Error, Result};
use crate::types::CertificateStatus;

/// Endpoint type of the device-facing MQTT data plane.
pub const DATA_ENDPOINT_TYPE: &str = "iot:Data-ATS";

/// Client for the device identity service.
pub struct IdentityClient {
    backend: Box<dyn IdentityBackend>,
}

impl IdentityClient {
    /// Create a client against the given control-plane endpoint.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            backend: Box::new(HttpBackend::new(endpoint)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn IdentityBackend>) -> Self {
        Self { backend }
    }

    /// Fetch the PEM body of a certificate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CertificateNotFound`] when the identity service
    /// has no record of `cert_id`.
    pub fn certificate_pem(&self, cert_id: &str) -> Result<String> {
        log::debug!("fetching certificate {} ...", cert_id);

        let cert = self
            .backend
            .describe_certificate(cert_id)?
            .ok_or_else(|| Error::CertificateNotFound(cert_id.to_string()))?;

        log::debug!(
            "certificate {} fetched, status: {}",
            cert_id,
            cert.status.as_str()
        );
        Ok(cert.certificate_pem)
    }

    /// Deactivate a certificate so the device can no longer authenticate.
    pub fn deactivate(&self, cert_id: &str) -> Result<()> {
        self.backend
            .set_certificate_status(cert_id, CertificateStatus::Inactive)?;
        log::info!("the certificate {} is deactivated", cert_id);
        Ok(())
    }

    /// Resolve the MQTT data endpoint address for the demo devices.
    pub fn data_endpoint(&self) -> Result<String> {
        self.backend.data_endpoint(DATA_ENDPOINT_TYPE)
    }
}
