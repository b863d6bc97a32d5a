//! Remote ledger API client for Tally.
//!
//! Defines the [`LedgerService`] boundary consumed by the merge engine and
//! the CLI, and an HTTP implementation over the remote bookkeeping service's
//! JSON API.

pub mod error;
pub mod http;
pub mod service;

pub use error::{ApiError, ApiResult};
pub use http::HttpLedgerService;
pub use service::LedgerService;
