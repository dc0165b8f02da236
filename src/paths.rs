//! Centralized path resolution for nw-builder
//!
//! This module resolves the two local directories the builder works with:
//! the build-time resource directory (templates, CA, key material) and the
//! per-operation staging root.
//!
//! # Path Resolution Priority
//!
//! 1. Environment variable (`NW_BUILDER_RESOURCE_DIR` / `NW_BUILDER_STAGING_DIR`)
//! 2. Value from `config.toml`, if present
//! 3. Default relative to the current directory (`resources/`,
//!    `target/app-ota-demo/`)

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable for resource directory override
pub const ENV_RESOURCE_DIR: &str = "NW_BUILDER_RESOURCE_DIR";

/// Environment variable for staging directory override
pub const ENV_STAGING_DIR: &str = "NW_BUILDER_STAGING_DIR";

/// Resolve the build-time resource directory.
pub fn resource_root(configured: Option<&str>) -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_RESOURCE_DIR) {
        let path = expand(&dir);
        log::debug!("using resource dir from {}: {}", ENV_RESOURCE_DIR, path.display());
        return Ok(path);
    }

    if let Some(dir) = configured {
        let path = expand(dir);
        log::debug!("using resource dir from config: {}", path.display());
        return Ok(path);
    }

    let cwd = std::env::current_dir().context("Could not determine current directory")?;
    Ok(cwd.join("resources"))
}

/// Resolve the staging root for per-operation working directories.
pub fn staging_root(configured: Option<&str>) -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_STAGING_DIR) {
        let path = expand(&dir);
        log::debug!("using staging dir from {}: {}", ENV_STAGING_DIR, path.display());
        return Ok(path);
    }

    if let Some(dir) = configured {
        let path = expand(dir);
        log::debug!("using staging dir from config: {}", path.display());
        return Ok(path);
    }

    let cwd = std::env::current_dir().context("Could not determine current directory")?;
    Ok(cwd.join("target").join("app-ota-demo"))
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

/// Recreate a directory from scratch: delete it if present, then create it.
///
/// Staging directories are wiped on every run so no stale files leak
/// between operations. The directory is exclusively owned by the in-flight
/// operation; concurrent runs need disjoint staging roots.
pub fn fresh_dir(path: &Path) -> io::Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Helper to run a test with temporary env var
    ///
    /// # Safety
    /// This function uses unsafe env::set_var/remove_var which can cause issues
    /// if other threads read environment variables concurrently.
    /// Only use in single-threaded test contexts.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_resource_root_env_override() {
        with_env_var(ENV_RESOURCE_DIR, "/custom/resources", || {
            let result = resource_root(Some("/from/config")).unwrap();
            assert_eq!(result, PathBuf::from("/custom/resources"));
        });
    }

    #[test]
    fn test_staging_root_config_fallback() {
        // Only meaningful when no env override is present in the test
        // environment.
        if env::var(ENV_STAGING_DIR).is_err() {
            let result = staging_root(Some("/from/config")).unwrap();
            assert_eq!(result, PathBuf::from("/from/config"));
        }
    }

    #[test]
    fn test_expand_absolute() {
        let result = expand("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/staging");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("staging"));
    }

    #[test]
    fn test_fresh_dir_wipes_stale_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("credentials");

        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.pem"), b"old").unwrap();

        fresh_dir(&dir).unwrap();

        assert!(dir.exists());
        assert!(!dir.join("stale.pem").exists());
    }

    #[test]
    fn test_fresh_dir_creates_missing() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("setup-script");

        fresh_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
