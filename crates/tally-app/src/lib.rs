//! App tooling for the Tally bookkeeping client.
//!
//! Scaffolds, bundles, and prepares for deployment the small server-side
//! apps that extend the remote bookkeeping platform. An app is a directory
//! with a `tallyapp.toml` manifest and a `src/` tree; bundling collects the
//! manifest and sources into a single JSON payload the remote service
//! accepts.

pub mod bundle;
pub mod error;
pub mod manifest;
pub mod scaffold;

pub use bundle::{build_bundle, AppBundle, BundleFile};
pub use error::{AppError, AppResult};
pub use manifest::AppManifest;
pub use scaffold::scaffold_app;
