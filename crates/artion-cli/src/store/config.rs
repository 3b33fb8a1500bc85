//! Persisted CLI configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredConfig {
    /// Default store URL.
    pub store: String,
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "artion").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("config.json"))
}

/// Save the configuration to disk.
pub fn save(config: &StoredConfig) -> Result<()> {
    let path = config_path()?;
    let json = serde_json::to_string_pretty(config)?;

    fs::write(&path, &json).context("Failed to write config file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Load the configuration, if one was saved.
pub fn load() -> Result<Option<StoredConfig>> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read config file")?;
    let config = serde_json::from_str(&json).context("Invalid config file")?;
    Ok(Some(config))
}

/// Remove the saved configuration. Returns true if one existed.
pub fn clear() -> Result<bool> {
    let path = config_path()?;

    if path.exists() {
        fs::remove_file(&path).context("Failed to remove config file")?;
        Ok(true)
    } else {
        Ok(false)
    }
}
