//! Scaffolding a new app directory.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::manifest::{AppManifest, MANIFEST_FILE};

const STARTER_SOURCE: &str = r#"// Entry point. The remote platform calls `onTransactionPosted`
// for every transaction posted to the book this app is installed on.
function onTransactionPosted(book, transaction) {
  return transaction;
}
"#;

/// Create a new app directory under `parent` with a manifest and a starter
/// source file. Fails if the directory already exists.
pub fn scaffold_app(parent: &Path, name: &str) -> AppResult<PathBuf> {
    let app_dir = parent.join(name);
    if app_dir.exists() {
        return Err(AppError::DirectoryExists(app_dir));
    }

    std::fs::create_dir_all(app_dir.join("src"))?;
    let manifest = AppManifest::new(name);
    std::fs::write(app_dir.join(MANIFEST_FILE), manifest.to_toml()?)?;
    std::fs::write(app_dir.join(&manifest.entry), STARTER_SOURCE)?;

    info!(app = name, dir = %app_dir.display(), "scaffolded app");
    Ok(app_dir)
}
