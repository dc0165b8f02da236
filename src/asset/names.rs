//! The cross-component naming contract.
//!
//! Bucket outputs, object keys, archive entry names, placeholders and job
//! ids are shared between this builder, the deployed stack, the sibling
//! deployment subsystem, and the device-side unpacking logic. They live in
//! one immutable value passed by reference so the contract is enforceable
//! in one place; none of these strings may change without a coordinated
//! device-side change.

/// Fixed names shared across the demo's components.
#[derive(Debug)]
pub struct DemoNames {
    /// Stack holding the demo's cloud-side resources.
    pub iot_stack: &'static str,

    /// Stack output: bucket for device asset files.
    pub dev_file_bucket_output: &'static str,
    /// Stack output: bucket for deployment job documents.
    pub job_doc_bucket_output: &'static str,
    /// Stack output: device certificate id.
    pub cert_id_output: &'static str,
    /// Stack output: device (thing) name.
    pub thing_name_output: &'static str,

    /// Published credential archive key.
    pub credentials_file: &'static str,
    /// Published runtime-agent package key.
    pub ranger_package_file: &'static str,
    /// Published bootstrap script key.
    pub setup_script_file: &'static str,

    /// Archive entry: device certificate.
    pub cert_entry: &'static str,
    /// Archive entry: root CA certificate.
    pub root_ca_entry: &'static str,
    /// Archive entry: device public key.
    pub public_key_entry: &'static str,
    /// Archive entry: device private key.
    pub private_key_entry: &'static str,

    /// Resource: root CA certificate.
    pub root_ca_resource: &'static str,
    /// Resource: device public key.
    pub public_key_resource: &'static str,
    /// Resource: device private key.
    pub private_key_resource: &'static str,
    /// Resource: setup script template.
    pub setup_script_resource: &'static str,
    /// Resource: runtime-agent package (dropped in by packaging).
    pub ranger_package_resource: &'static str,

    /// Template placeholder for the credentials package URL.
    pub credentials_url_placeholder: &'static str,
    /// Template placeholder for the runtime-agent package URL.
    pub ranger_url_placeholder: &'static str,

    /// Job ids the sibling deployment subsystem may have created.
    pub job_ids: [&'static str; 4],

    /// Presigned URL validity for published assets, in days.
    pub presign_validity_days: u64,

    /// Staging subdirectory for credential material.
    pub credentials_staging_dir: &'static str,
    /// Staging subdirectory for the runtime-agent package copy.
    pub ranger_staging_dir: &'static str,
    /// Staging subdirectory for the rendered setup script.
    pub setup_script_staging_dir: &'static str,
}

/// The app OTA demo naming contract.
pub const DEMO: DemoNames = DemoNames {
    iot_stack: "nightswatch-app-ota-demo-iot",

    dev_file_bucket_output: "devfilesbucketname",
    job_doc_bucket_output: "jobdocbucketname",
    cert_id_output: "certid",
    thing_name_output: "thingname",

    credentials_file: "credentials.zip",
    ranger_package_file: "nightswatch-ranger.tar.gz",
    setup_script_file: "setup.py",

    cert_entry: "cert.pem",
    root_ca_entry: "root-ca.crt",
    public_key_entry: "public.key",
    private_key_entry: "private.key",

    root_ca_resource: "nw-app-ota-demo/root-ca.crt",
    public_key_resource: "nw-app-ota-demo/nw-app-ota-demo-dev-public.key",
    private_key_resource: "nw-app-ota-demo/nw-app-ota-demo-dev-private.key",
    setup_script_resource: "nw-app-ota-demo/setup.py",
    ranger_package_resource: "nightswatch-ranger_x64/nightswatch-ranger.tar.gz",

    credentials_url_placeholder: "<CREDENTIALS_PACKAGE_URL>",
    ranger_url_placeholder: "<NW_RANGER_PACKAGE_URL>",

    job_ids: [
        "nw-app-ota-demo-deploy-app-v1",
        "nw-app-ota-demo-deploy-app-v2",
        "nw-app-ota-demo-destroy-app-v1",
        "nw-app-ota-demo-destroy-app-v2",
    ],

    presign_validity_days: 7,

    credentials_staging_dir: "credentials",
    ranger_staging_dir: "nightswatch-ranger",
    setup_script_staging_dir: "setup-script",
};
