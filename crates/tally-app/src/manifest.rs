use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Name of the manifest file at an app directory's root.
pub const MANIFEST_FILE: &str = "tallyapp.toml";

/// The `tallyapp.toml` manifest describing a deployable app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Entry point within the app's `src/` tree.
    #[serde(default = "default_entry")]
    pub entry: String,
}

fn default_version() -> String {
    "0.1.0".into()
}

fn default_entry() -> String {
    "src/main.js".into()
}

impl AppManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: default_version(),
            entry: default_entry(),
        }
    }

    /// Load the manifest from an app directory.
    pub fn load(app_dir: &Path) -> AppResult<Self> {
        let path = app_dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(AppError::ManifestNotFound(path));
        }
        let raw = std::fs::read_to_string(&path)?;
        let manifest: Self =
            toml::from_str(&raw).map_err(|e| AppError::InvalidManifest(e.to_string()))?;
        if manifest.name.trim().is_empty() {
            return Err(AppError::InvalidManifest("name must not be empty".into()));
        }
        Ok(manifest)
    }

    /// Serialize to manifest file contents.
    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::InvalidManifest(e.to_string()))
    }
}
