//! Credential bundling.
//!
//! Collects the four pieces of device identity material - the certificate
//! fetched from the identity service plus the fixed root CA and key pair
//! from the resource directory - into a staging directory, then archives
//! them as `credentials.zip`.
//!
//! Entry order and names are part of the bundle's external contract: the
//! device-side unpacking logic expects exactly `cert.pem`, `root-ca.crt`,
//! `public.key`, `private.key`.

use crate::asset::names::DemoNames;
use crate::asset::{Error, Result};
use crate::paths;
use crate::resources::Resources;
use cloudkit::IdentityClient;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Builds the device credential bundle.
pub struct CredentialBundler<'a> {
    identity: &'a IdentityClient,
    resources: &'a Resources,
    names: &'a DemoNames,
}

impl<'a> CredentialBundler<'a> {
    /// Create a bundler over the given identity client and resources.
    pub fn new(
        identity: &'a IdentityClient,
        resources: &'a Resources,
        names: &'a DemoNames,
    ) -> Self {
        Self {
            identity,
            resources,
            names,
        }
    }

    /// Prepare the credential archive in `staging_dir` for `cert_id`.
    ///
    /// The staging directory is recreated fresh. All four payloads must be
    /// written before archiving; a missing certificate or resource aborts
    /// the operation.
    ///
    /// Returns the path of the finished archive.
    pub fn prepare(&self, staging_dir: &Path, cert_id: &str) -> Result<PathBuf> {
        paths::fresh_dir(staging_dir).map_err(|e| Error::io(staging_dir, e))?;

        let cert_path = staging_dir.join(self.names.cert_entry);
        let pem = self.identity.certificate_pem(cert_id)?;
        fs::write(&cert_path, pem).map_err(|e| Error::io(&cert_path, e))?;
        log::info!(
            "the IoT device certificate {} is downloaded at {}",
            cert_id,
            cert_path.display()
        );

        let fixed_assets = [
            (self.names.root_ca_resource, self.names.root_ca_entry),
            (self.names.public_key_resource, self.names.public_key_entry),
            (self.names.private_key_resource, self.names.private_key_entry),
        ];
        for (resource, entry) in fixed_assets {
            let bytes = self.resources.load(resource)?;
            let path = staging_dir.join(entry);
            fs::write(&path, bytes).map_err(|e| Error::io(&path, e))?;
            log::info!("the IoT device asset {} is generated at {}", entry, path.display());
        }

        let zip_path = self.archive(staging_dir)?;
        log::info!(
            "the credentials package of the IoT device is prepared at {}",
            zip_path.display()
        );
        Ok(zip_path)
    }

    /// Archive the four staged files, in the fixed entry order.
    fn archive(&self, staging_dir: &Path) -> Result<PathBuf> {
        let entries = [
            self.names.cert_entry,
            self.names.root_ca_entry,
            self.names.public_key_entry,
            self.names.private_key_entry,
        ];

        let zip_path = staging_dir.join(self.names.credentials_file);
        let file = fs::File::create(&zip_path).map_err(|e| Error::io(&zip_path, e))?;
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        for entry in entries {
            let src = staging_dir.join(entry);
            let bytes = fs::read(&src).map_err(|e| Error::io(&src, e))?;
            zip.start_file(entry, options)?;
            zip.write_all(&bytes).map_err(|e| Error::io(&zip_path, e))?;
        }

        zip.finish()?;
        Ok(zip_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::names::DEMO;
    use cloudkit::MockControlPlane;
    use std::io::Read;

    const PEM: &str = "-----BEGIN CERTIFICATE-----\ndGVzdA==\n-----END CERTIFICATE-----\n";

    fn demo_resources() -> (tempfile::TempDir, Resources) {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("nw-app-ota-demo");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("root-ca.crt"), b"root ca pem").unwrap();
        fs::write(base.join("nw-app-ota-demo-dev-public.key"), b"public key pem").unwrap();
        fs::write(base.join("nw-app-ota-demo-dev-private.key"), b"private key pem").unwrap();
        let resources = Resources::at(dir.path());
        (dir, resources)
    }

    fn identity_with_cert() -> IdentityClient {
        let mock = MockControlPlane::new();
        mock.add_certificate("cert-1", PEM);
        IdentityClient::with_backend(Box::new(mock))
    }

    #[test]
    fn test_prepare_archive_round_trip() {
        let (_res_dir, resources) = demo_resources();
        let identity = identity_with_cert();
        let staging = tempfile::tempdir().unwrap();
        let dir = staging.path().join("credentials");

        let bundler = CredentialBundler::new(&identity, &resources, &DEMO);
        let zip_path = bundler.prepare(&dir, "cert-1").unwrap();
        assert_eq!(zip_path.file_name().unwrap(), "credentials.zip");

        let mut archive = zip::ZipArchive::new(fs::File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 4);

        // Entry order and names are the device-side contract.
        let expected = ["cert.pem", "root-ca.crt", "public.key", "private.key"];
        for (i, name) in expected.iter().enumerate() {
            assert_eq!(archive.by_index(i).unwrap().name(), *name);
        }

        let mut cert_content = String::new();
        archive
            .by_name("cert.pem")
            .unwrap()
            .read_to_string(&mut cert_content)
            .unwrap();
        assert_eq!(cert_content, PEM);
    }

    #[test]
    fn test_prepare_wipes_stale_staging() {
        let (_res_dir, resources) = demo_resources();
        let identity = identity_with_cert();
        let staging = tempfile::tempdir().unwrap();
        let dir = staging.path().join("credentials");

        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.txt"), b"leftover").unwrap();

        let bundler = CredentialBundler::new(&identity, &resources, &DEMO);
        bundler.prepare(&dir, "cert-1").unwrap();

        assert!(!dir.join("stale.txt").exists());
    }

    #[test]
    fn test_prepare_unknown_certificate() {
        let (_res_dir, resources) = demo_resources();
        let identity = IdentityClient::with_backend(Box::new(MockControlPlane::new()));
        let staging = tempfile::tempdir().unwrap();

        let bundler = CredentialBundler::new(&identity, &resources, &DEMO);
        let result = bundler.prepare(&staging.path().join("credentials"), "missing-cert");

        assert!(matches!(
            result,
            Err(Error::Cloud(cloudkit::Error::CertificateNotFound(_)))
        ));
    }

    #[test]
    fn test_prepare_missing_static_asset() {
        let res_dir = tempfile::tempdir().unwrap();
        let resources = Resources::at(res_dir.path());
        let identity = identity_with_cert();
        let staging = tempfile::tempdir().unwrap();

        let bundler = CredentialBundler::new(&identity, &resources, &DEMO);
        let result = bundler.prepare(&staging.path().join("credentials"), "cert-1");

        assert!(matches!(
            result,
            Err(Error::ResourceMissing { name }) if name == DEMO.root_ca_resource
        ));
    }
}
