//! Vault configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Result, VaultError};

/// Where exported notes and their assets land inside a vault.
///
/// Loaded from a small JSON file; `vault_path`, `vault_name`,
/// `import_folder` and `images_folder` are required, the attachments
/// folder defaults to `Attachments`.
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Root directory of the Obsidian vault
    pub vault_path: PathBuf,
    /// Vault name as registered in Obsidian (used for `obsidian://` links)
    pub vault_name: String,
    /// Folder for imported notes, relative to the vault root
    pub import_folder: String,
    /// Folder for extracted images, relative to the vault root
    pub images_folder: String,
    /// Folder for copied attachments, relative to the vault root
    #[serde(default = "default_attachments_folder")]
    pub attachments_folder: String,
}

fn default_attachments_folder() -> String {
    "Attachments".to_string()
}

impl VaultConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            VaultError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        serde_json::from_str(&raw).map_err(|err| {
            VaultError::Config(format!("invalid config {}: {}", path.display(), err))
        })
    }
}
