//! Asset provisioning orchestration.
//!
//! [`AssetProvisioner`] turns identity state held in the demo stack into a
//! published, self-contained bootstrap bundle, and later reverses the
//! process. Provisioning sequences bundle → upload → presign → render →
//! upload; deprovisioning deactivates the device identity, purges both
//! buckets and reaps the demo jobs.
//!
//! Every step is re-run safe: staging directories are recreated fresh,
//! uploads overwrite by key, and bucket-empty and job-reap are idempotent.

pub mod bundle;
pub mod error;
pub mod names;
pub mod script;

pub use error::{Error, Result};

use crate::paths;
use crate::resources::Resources;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bundle::CredentialBundler;
use cloudkit::{IdentityClient, JobClient, StackClient, StoreClient};
use names::DemoNames;
use std::fs;
use std::path::PathBuf;

/// Orchestrates provisioning and teardown of the demo device assets.
pub struct AssetProvisioner {
    stacks: StackClient,
    identity: IdentityClient,
    store: StoreClient,
    jobs: JobClient,
    resources: Resources,
    staging_root: PathBuf,
    names: &'static DemoNames,
}

impl AssetProvisioner {
    /// Create a provisioner against the given control-plane endpoint.
    pub fn new(endpoint: &str, resources: Resources, staging_root: PathBuf) -> Self {
        Self {
            stacks: StackClient::new(endpoint),
            identity: IdentityClient::new(endpoint),
            store: StoreClient::new(endpoint),
            jobs: JobClient::new(endpoint),
            resources,
            staging_root,
            names: &names::DEMO,
        }
    }

    /// Create a provisioner from pre-built clients (useful for testing).
    pub fn with_clients(
        stacks: StackClient,
        identity: IdentityClient,
        store: StoreClient,
        jobs: JobClient,
        resources: Resources,
        staging_root: PathBuf,
    ) -> Self {
        Self {
            stacks,
            identity,
            store,
            jobs,
            resources,
            staging_root,
            names: &names::DEMO,
        }
    }

    /// Publish the device bootstrap assets for `stack`.
    ///
    /// Returns the presigned URL of the rendered setup script,
    /// base64-encoded as a single opaque token - the only output a
    /// consumer needs to bootstrap a device instance.
    pub fn provision(&self, stack: &str) -> Result<String> {
        let bucket = self.require_output(stack, self.names.dev_file_bucket_output)?;
        let cert_id = self.require_output(stack, self.names.cert_id_output)?;

        let bundler = CredentialBundler::new(&self.identity, &self.resources, self.names);
        let credentials_dir = self.staging_root.join(self.names.credentials_staging_dir);
        let zip_path = bundler.prepare(&credentials_dir, &cert_id)?;
        self.store.upload(&bucket, &zip_path)?;

        let ranger_path = self.stage_ranger_package()?;
        self.store.upload(&bucket, &ranger_path)?;

        let days = self.names.presign_validity_days;
        let credentials_url = self.store.presign(&bucket, self.names.credentials_file, days)?;
        let ranger_url = self.store.presign(&bucket, self.names.ranger_package_file, days)?;

        let script_path = self.stage_setup_script(&credentials_url.url, &ranger_url.url)?;
        self.store.upload(&bucket, &script_path)?;

        let script_url = self.store.presign(&bucket, self.names.setup_script_file, days)?;
        Ok(BASE64.encode(script_url.url))
    }

    /// Revoke the device identity and purge everything `provision`
    /// published, plus any deployment jobs sharing the demo's id namespace.
    ///
    /// The independent purge steps - certificate deactivation, each bucket,
    /// each job - are attempted regardless of earlier failures; teardown
    /// means "purge everything possible". Collected failures surface as
    /// one [`Error::CleanupIncomplete`] at the end.
    pub fn deprovision(&self, stack: &str) -> Result<()> {
        let dev_bucket = self.require_output(stack, self.names.dev_file_bucket_output)?;
        let job_bucket = self.require_output(stack, self.names.job_doc_bucket_output)?;
        let cert_id = self.require_output(stack, self.names.cert_id_output)?;

        let mut failures = Vec::new();

        // Deactivation is fire-and-forget: nothing later in teardown
        // depends on the status change having propagated.
        if let Err(e) = self.identity.deactivate(&cert_id) {
            log::error!("failed to deactivate the certificate {}: {}", cert_id, e);
            failures.push(format!("certificate {}: {}", cert_id, e));
        }

        for bucket in [&dev_bucket, &job_bucket] {
            match self.store.empty(bucket) {
                Ok(()) => log::info!("the bucket {} is cleaned up to empty", bucket),
                Err(e) => {
                    log::error!("failed to empty the bucket {}: {}", bucket, e);
                    failures.push(format!("bucket {}: {}", bucket, e));
                }
            }
        }

        let report = self.jobs.reap_all(&self.names.job_ids);
        if report.is_success() {
            log::info!("the jobs are all removed");
        }
        for (job_id, message) in report.failed {
            failures.push(format!("job {}: {}", job_id, message));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::CleanupIncomplete { failures })
        }
    }

    /// Resolve the MQTT data endpoint for the demo device.
    pub fn service_endpoint(&self, stack: &str) -> Result<String> {
        // The thing name is only resolved to validate that the referenced
        // stack really is the demo stack before answering.
        let thing_name = self.require_output(stack, self.names.thing_name_output)?;
        log::debug!("the demo stack {} owns the IoT device {}", stack, thing_name);
        Ok(self.identity.data_endpoint()?)
    }

    fn require_output(&self, stack: &str, key: &str) -> Result<String> {
        self.stacks
            .output(stack, key)?
            .ok_or_else(|| Error::MissingStackOutput {
                key: key.to_string(),
                stack: stack.to_string(),
            })
    }

    /// Stage a copy of the opaque runtime-agent package for upload.
    fn stage_ranger_package(&self) -> Result<PathBuf> {
        let dir = self.staging_root.join(self.names.ranger_staging_dir);
        paths::fresh_dir(&dir).map_err(|e| Error::io(&dir, e))?;

        let bytes = self.resources.load(self.names.ranger_package_resource)?;
        let path = dir.join(self.names.ranger_package_file);
        fs::write(&path, bytes).map_err(|e| Error::io(&path, e))?;

        log::info!(
            "the runtime agent package of the IoT device is prepared at {}",
            path.display()
        );
        Ok(path)
    }

    /// Render the setup script with both presigned URLs and stage it.
    fn stage_setup_script(&self, credentials_url: &str, ranger_url: &str) -> Result<PathBuf> {
        let rendered = script::render(
            &self.resources,
            self.names.setup_script_resource,
            &[
                (self.names.credentials_url_placeholder, credentials_url),
                (self.names.ranger_url_placeholder, ranger_url),
            ],
        )?;

        let dir = self.staging_root.join(self.names.setup_script_staging_dir);
        paths::fresh_dir(&dir).map_err(|e| Error::io(&dir, e))?;

        let path = dir.join(self.names.setup_script_file);
        fs::write(&path, rendered).map_err(|e| Error::io(&path, e))?;

        log::info!(
            "the setup script of the IoT device is prepared at {}",
            path.display()
        );
        Ok(path)
    }
}
