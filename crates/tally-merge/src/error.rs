use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by the merge engine.
#[derive(Debug, Error)]
pub enum MergeError {
    /// One or both transaction ids did not resolve. Always aggregate: every
    /// failing id is named, never just the first.
    #[error("transaction(s) not found: {}", missing.join(", "))]
    TransactionsNotFound { missing: Vec<String> },

    /// The two transactions carry different amounts. Raised before any
    /// mutation; safe to retry after correcting the input.
    #[error("cannot merge: surviving transaction has amount {edit_amount}, retired transaction has amount {revert_amount}")]
    AmountConflict {
        edit_amount: Decimal,
        revert_amount: Decimal,
    },

    /// A remote write failed during commit. Not locally recovered; re-running
    /// the whole merge is the recovery path.
    #[error("ledger API error: {0}")]
    Api(#[from] tally_api::ApiError),
}
