//! # cloudkit
//!
//! Blocking client library for the demo cloud control plane.
//!
//! This crate wraps the four control-plane services the builder talks to:
//!
//! - Stack outputs ([`StackClient`]) - read-only name/value lookups on a
//!   deployed stack
//! - Device identity ([`IdentityClient`]) - certificate material and
//!   certificate lifecycle
//! - Object store ([`StoreClient`]) - uploads, bucket purges, presigned
//!   read URLs
//! - Job queue ([`JobClient`]) - forced job deletion with confirmed removal
//!
//! All I/O is synchronous and blocking (`ureq`); there is no connection or
//! state shared between clients. Each client takes its backend as a trait
//! object, so tests can swap in [`MockControlPlane`] and never touch the
//! network.
//!
//! ## Example
//!
//! ```no_run
//! use cloudkit::{StackClient, StoreClient};
//!
//! let stacks = StackClient::new("https://cp.example.com");
//! let bucket = stacks
//!     .output("nightswatch-app-ota-demo-iot", "devfilesbucketname")
//!     .expect("control plane unreachable")
//!     .expect("stack output missing");
//!
//! let store = StoreClient::new("https://cp.example.com");
//! let url = store.presign(&bucket, "credentials.zip", 7).unwrap();
//! println!("expires at {}", url.expires_at);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod identity;
pub mod jobs;
pub mod stacks;
pub mod store;
pub mod types;

pub use backend::MockControlPlane;
pub use error::{Error, Result};
pub use identity::IdentityClient;
pub use jobs::JobClient;
pub use stacks::StackClient;
pub use store::StoreClient;
pub use types::{Certificate, CertificateStatus, ObjectPage, ObjectSummary, PollConfig, PresignedUrl, ReapReport};
