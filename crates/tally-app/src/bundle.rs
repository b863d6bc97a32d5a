//! Bundling an app directory into a deployable JSON payload.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{AppError, AppResult};
use crate::manifest::AppManifest;

/// One source file within a bundle, path-relative to the app root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleFile {
    pub path: String,
    pub contents: String,
}

/// The deployable payload: manifest plus every source file under `src/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppBundle {
    pub manifest: AppManifest,
    pub files: Vec<BundleFile>,
}

impl AppBundle {
    /// The JSON value posted to the remote deploy endpoint.
    pub fn to_payload(&self) -> AppResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Walk the app's `src/` tree and assemble a bundle.
///
/// Files are collected in sorted path order so the same tree always
/// produces the same bundle.
pub fn build_bundle(app_dir: &Path) -> AppResult<AppBundle> {
    let manifest = AppManifest::load(app_dir)?;

    let src_dir = app_dir.join("src");
    let mut files = Vec::new();
    for entry in WalkDir::new(&src_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| AppError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let contents = std::fs::read(path)?;
        let contents = String::from_utf8(contents)
            .map_err(|_| AppError::NonUtf8Source(path.to_path_buf()))?;
        let relative = path
            .strip_prefix(app_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        files.push(BundleFile { path: relative, contents });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(app = %manifest.name, files = files.len(), "built bundle");
    Ok(AppBundle { manifest, files })
}
