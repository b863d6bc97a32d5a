//! Ledger snapshot loading: the dual concurrent lookup that feeds a merge.

use tally_api::LedgerService;
use tally_types::Transaction;
use tracing::debug;

use crate::error::MergeError;

/// Load both merge candidates from the remote ledger.
///
/// The two lookups run concurrently with no ordering dependency. Both are
/// awaited before any error is raised: every unresolvable id is collected
/// into a single [`MergeError::TransactionsNotFound`], so a caller who
/// mistyped both ids sees both problems in one response. This is the only
/// place validation errors originate.
pub async fn load_pair(
    service: &dyn LedgerService,
    book_id: &str,
    id_a: &str,
    id_b: &str,
) -> Result<(Transaction, Transaction), MergeError> {
    debug!(book_id, id_a, id_b, "loading merge candidates");
    let (a, b) = tokio::join!(
        service.lookup_transaction(book_id, id_a),
        service.lookup_transaction(book_id, id_b),
    );

    match (a?, b?) {
        (Some(a), Some(b)) => Ok((a, b)),
        (a, b) => {
            let mut missing = Vec::new();
            if a.is_none() {
                missing.push(id_a.to_string());
            }
            if b.is_none() {
                missing.push(id_b.to_string());
            }
            Err(MergeError::TransactionsNotFound { missing })
        }
    }
}
