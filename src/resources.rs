//! Build-time resource lookup.
//!
//! The builder ships a small set of fixed assets next to the binary: the
//! device root CA, the demo key pair, the setup script template, and the
//! runtime-agent package dropped in by the packaging step. They are read
//! at runtime from a resource directory so a broken packaging run surfaces
//! as a clear [`ResourceMissing`](crate::asset::Error::ResourceMissing)
//! error instead of a corrupt bundle.

use crate::asset::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Handle to the resource directory.
#[derive(Debug, Clone)]
pub struct Resources {
    root: PathBuf,
}

impl Resources {
    /// Use the given directory as the resource root.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The resource root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a resource by its directory-relative name.
    ///
    /// A missing file is a packaging defect, not a runtime condition to
    /// recover from.
    pub fn load(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        fs::read(&path).map_err(|_| Error::ResourceMissing {
            name: name.to_string(),
        })
    }

    /// Load a text resource by its directory-relative name.
    pub fn read_to_string(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        fs::read_to_string(&path).map_err(|_| Error::ResourceMissing {
            name: name.to_string(),
        })
    }
}
