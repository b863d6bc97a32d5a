//! Transaction merge engine for the Tally bookkeeping client.
//!
//! Takes two ledger transactions believed to represent the same economic
//! event (e.g. duplicate imports) and collapses them into one canonical
//! transaction: the *edit* transaction survives and receives reconciled
//! data, the *revert* transaction is trashed. An amount mismatch between
//! the two is a hard gate — the engine never collapses two differently
//! valued postings into one.
//!
//! Control flow: load both transactions concurrently, gate on the conflict
//! report, reconcile fields, then commit the update and the trash
//! concurrently. Field reconciliation is pure and idempotent, so re-running
//! a merge after a partial write failure is the sanctioned recovery path.

pub mod conflict;
pub mod engine;
pub mod error;
pub mod loader;
pub mod operation;
pub mod policy;
pub mod reconcile;

pub use conflict::detect_conflict;
pub use engine::{MergeEngine, MergeResult};
pub use error::MergeError;
pub use loader::load_pair;
pub use operation::{MergeOperation, MergeState};
pub use policy::{Designation, FirstArgumentWins, SurvivorPolicy};
pub use reconcile::{reconcile, MergedFields};
