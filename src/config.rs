use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::asset::names;
use crate::paths;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "NW_BUILDER_CONFIG_DIR";

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        return Ok(paths::expand(&dir));
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("nw-builder"))
}

// ============================================================================
// Builder Config
// ============================================================================

/// Optional on-disk configuration (`config.toml` in the config dir).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Control plane API endpoint.
    pub endpoint: Option<String>,
    /// Demo stack name override.
    pub stack: Option<String>,
    /// Build-time resource directory override.
    pub resource_dir: Option<String>,
    /// Staging root override.
    pub staging_dir: Option<String>,
}

impl BuilderConfig {
    /// Load config.toml, falling back to defaults when the file is absent.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config at {}", path.display()))
    }
}

// ============================================================================
// Resolved Settings
// ============================================================================

/// Fully resolved settings for one invocation.
///
/// Precedence per value: CLI flag (clap also reads the matching env var) >
/// `config.toml` > built-in default. The endpoint has no default - the
/// builder cannot guess which control plane owns the demo stack.
#[derive(Debug)]
pub struct Settings {
    /// Control plane API endpoint.
    pub endpoint: String,
    /// Demo stack to operate on.
    pub stack: String,
    /// Build-time resource directory.
    pub resource_root: PathBuf,
    /// Staging root for per-operation directories.
    pub staging_root: PathBuf,
}

impl Settings {
    /// Resolve settings from CLI flags and the optional config file.
    pub fn resolve(endpoint_flag: Option<String>, stack_flag: Option<String>) -> Result<Self> {
        let file = BuilderConfig::load()?;

        let endpoint = endpoint_flag.or(file.endpoint).context(
            "control plane endpoint not configured \
             (use --endpoint, NW_BUILDER_ENDPOINT, or endpoint in config.toml)",
        )?;

        let stack = stack_flag
            .or(file.stack)
            .unwrap_or_else(|| names::DEMO.iot_stack.to_string());

        let resource_root = paths::resource_root(file.resource_dir.as_deref())?;
        let staging_root = paths::staging_root(file.staging_dir.as_deref())?;

        Ok(Self {
            endpoint,
            stack,
            resource_root,
            staging_root,
        })
    }
}
