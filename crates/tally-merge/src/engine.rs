//! The merge engine: loads, gates, reconciles, and commits a merge.

use std::sync::Arc;

use tally_api::LedgerService;
use tally_types::Transaction;
use tracing::{debug, info, warn};

use crate::error::MergeError;
use crate::loader::load_pair;
use crate::operation::MergeOperation;
use crate::policy::{FirstArgumentWins, SurvivorPolicy};

/// The outcome of a committed merge, returned to the caller.
#[derive(Clone, Debug)]
pub struct MergeResult {
    /// The surviving transaction, as persisted by the remote ledger.
    pub transaction: Transaction,
    /// Identifier of the retired (trashed) transaction.
    pub reverted_id: String,
    /// Mirror of the conflict report at approval time. Always `None` for a
    /// merge that reached commit, since a non-`None` report blocks earlier.
    pub audit: Option<String>,
}

/// Drives a whole merge: load, gate, reconcile, commit.
pub struct MergeEngine {
    service: Arc<dyn LedgerService>,
    policy: Box<dyn SurvivorPolicy>,
}

impl MergeEngine {
    /// Engine with the default first-argument-wins survivor policy.
    pub fn new(service: Arc<dyn LedgerService>) -> Self {
        Self::with_policy(service, Box::new(FirstArgumentWins))
    }

    pub fn with_policy(service: Arc<dyn LedgerService>, policy: Box<dyn SurvivorPolicy>) -> Self {
        Self { service, policy }
    }

    /// Merge two transactions believed to represent the same economic event.
    ///
    /// Fails with an aggregate validation error if either id is
    /// unresolvable, with an amount conflict if the two amounts differ
    /// (before any mutation), or with the underlying API error if a commit
    /// write fails. After a partial commit failure, re-running the same
    /// merge is the sanctioned recovery path: reconciliation is idempotent
    /// and an already-trashed revert transaction is not re-trashed.
    pub async fn merge(
        &self,
        book_id: &str,
        id_a: &str,
        id_b: &str,
    ) -> Result<MergeResult, MergeError> {
        let (first, second) = load_pair(self.service.as_ref(), book_id, id_a, id_b).await?;

        let mut op = MergeOperation::with_policy(self.policy.as_ref(), first, second);
        if let Some(report) = op.conflict_report() {
            warn!(book_id, report, "merge blocked");
            return Err(MergeError::AmountConflict {
                edit_amount: op.edit_transaction().amount,
                revert_amount: op.revert_transaction().amount,
            });
        }

        op.apply_merged_data()?;
        let audit = op.conflict_report().map(str::to_string);
        op.mark_applying();

        let edit = op.edit_transaction().clone();
        let revert = op.revert_transaction().clone();
        debug!(edit = %edit.id, revert = %revert.id, "committing merge");

        // Both writes run concurrently; ordering between them is unspecified.
        // An already-trashed revert transaction is not re-trashed, so retry
        // after a partial failure cannot depend on the remote service
        // tolerating a double trash.
        let commit = if revert.trashed {
            self.service.update_transaction(&edit).await
        } else {
            let (updated, trashed) = tokio::join!(
                self.service.update_transaction(&edit),
                self.service.trash_transaction(&revert),
            );
            trashed.and(updated)
        };

        let updated = match commit {
            Ok(updated) => updated,
            Err(err) => {
                op.mark_failed();
                warn!(edit = %edit.id, revert = %revert.id, %err, "merge commit failed");
                return Err(err.into());
            }
        };

        op.mark_committed();
        info!(book_id, edit = %updated.id, revert = %revert.id, "merge committed");
        Ok(MergeResult { transaction: updated, reverted_id: revert.id, audit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use tally_api::{ApiError, ApiResult};
    use tally_types::{Account, AccountRef, App, Balance, Book, Collection, Group};

    fn tx(id: &str, amount: Decimal) -> Transaction {
        Transaction {
            id: id.into(),
            book_id: "b1".into(),
            date: "2024-05-01".into(),
            amount,
            description: String::new(),
            credit_account: None,
            debit_account: None,
            urls: vec![],
            attachments: vec![],
            properties: BTreeMap::new(),
            posted: false,
            checked: false,
            trashed: false,
        }
    }

    /// In-memory ledger recording every write, with optional trash failure
    /// injection.
    #[derive(Default)]
    struct MockLedger {
        transactions: Mutex<BTreeMap<String, Transaction>>,
        calls: Mutex<Vec<String>>,
        fail_trash: Mutex<bool>,
    }

    impl MockLedger {
        fn with_transactions(txs: Vec<Transaction>) -> Arc<Self> {
            let ledger = Self::default();
            {
                let mut map = ledger.transactions.lock().unwrap();
                for t in txs {
                    map.insert(t.id.clone(), t);
                }
            }
            Arc::new(ledger)
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn stored(&self, id: &str) -> Option<Transaction> {
            self.transactions.lock().unwrap().get(id).cloned()
        }

        fn set_fail_trash(&self, fail: bool) {
            *self.fail_trash.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl LedgerService for MockLedger {
        async fn list_books(&self) -> ApiResult<Vec<Book>> {
            unimplemented!()
        }
        async fn get_book(&self, _: &str) -> ApiResult<Book> {
            unimplemented!()
        }
        async fn update_book(&self, _: &Book) -> ApiResult<Book> {
            unimplemented!()
        }
        async fn list_accounts(&self, _: &str) -> ApiResult<Vec<Account>> {
            unimplemented!()
        }
        async fn get_account(&self, _: &str, _: &str) -> ApiResult<Account> {
            unimplemented!()
        }
        async fn create_account(&self, _: &str, _: &Account) -> ApiResult<Account> {
            unimplemented!()
        }
        async fn update_account(&self, _: &str, _: &Account) -> ApiResult<Account> {
            unimplemented!()
        }
        async fn delete_account(&self, _: &str, _: &str) -> ApiResult<()> {
            unimplemented!()
        }
        async fn list_groups(&self, _: &str) -> ApiResult<Vec<Group>> {
            unimplemented!()
        }
        async fn get_group(&self, _: &str, _: &str) -> ApiResult<Group> {
            unimplemented!()
        }
        async fn create_group(&self, _: &str, _: &Group) -> ApiResult<Group> {
            unimplemented!()
        }
        async fn update_group(&self, _: &str, _: &Group) -> ApiResult<Group> {
            unimplemented!()
        }
        async fn delete_group(&self, _: &str, _: &str) -> ApiResult<()> {
            unimplemented!()
        }
        async fn list_transactions(&self, _: &str, _: Option<&str>) -> ApiResult<Vec<Transaction>> {
            unimplemented!()
        }

        async fn lookup_transaction(
            &self,
            _book_id: &str,
            transaction_id: &str,
        ) -> ApiResult<Option<Transaction>> {
            self.calls.lock().unwrap().push(format!("lookup:{transaction_id}"));
            Ok(self.transactions.lock().unwrap().get(transaction_id).cloned())
        }

        async fn create_transaction(&self, _: &str, _: &Transaction) -> ApiResult<Transaction> {
            unimplemented!()
        }

        async fn update_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction> {
            self.calls.lock().unwrap().push(format!("update:{}", transaction.id));
            self.transactions
                .lock()
                .unwrap()
                .insert(transaction.id.clone(), transaction.clone());
            Ok(transaction.clone())
        }

        async fn trash_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction> {
            self.calls.lock().unwrap().push(format!("trash:{}", transaction.id));
            if *self.fail_trash.lock().unwrap() {
                return Err(ApiError::api(500, "trash failed"));
            }
            let mut map = self.transactions.lock().unwrap();
            let mut trashed = transaction.clone();
            trashed.trashed = true;
            map.insert(trashed.id.clone(), trashed.clone());
            Ok(trashed)
        }

        async fn restore_transaction(&self, _: &Transaction) -> ApiResult<Transaction> {
            unimplemented!()
        }
        async fn post_transaction(&self, _: &Transaction) -> ApiResult<Transaction> {
            unimplemented!()
        }
        async fn check_transaction(&self, _: &Transaction) -> ApiResult<Transaction> {
            unimplemented!()
        }
        async fn uncheck_transaction(&self, _: &Transaction) -> ApiResult<Transaction> {
            unimplemented!()
        }
        async fn query_balances(&self, _: &str, _: &str) -> ApiResult<Vec<Balance>> {
            unimplemented!()
        }
        async fn list_collections(&self) -> ApiResult<Vec<Collection>> {
            unimplemented!()
        }
        async fn get_collection(&self, _: &str) -> ApiResult<Collection> {
            unimplemented!()
        }
        async fn list_apps(&self, _: &str) -> ApiResult<Vec<App>> {
            unimplemented!()
        }
        async fn deploy_app(&self, _: serde_json::Value) -> ApiResult<App> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn simple_merge_commits() {
        let mut a = tx("t1", dec!(100));
        a.urls = vec!["a".into()];
        a.properties.insert("code".into(), "X".into());
        let mut b = tx("t2", dec!(100));
        b.urls = vec!["b".into()];
        b.properties.insert("note".into(), "y".into());

        let ledger = MockLedger::with_transactions(vec![a, b]);
        let engine = MergeEngine::new(ledger.clone());
        let result = engine.merge("b1", "t1", "t2").await.unwrap();

        assert_eq!(result.transaction.id, "t1");
        assert_eq!(result.reverted_id, "t2");
        assert_eq!(result.audit, None);
        assert_eq!(result.transaction.urls, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(result.transaction.properties.get("code").map(String::as_str), Some("X"));
        assert_eq!(result.transaction.properties.get("note").map(String::as_str), Some("y"));

        let calls = ledger.calls();
        assert!(calls.contains(&"update:t1".to_string()));
        assert!(calls.contains(&"trash:t2".to_string()));
        assert!(ledger.stored("t2").unwrap().trashed);
    }

    #[tokio::test]
    async fn blocked_merge_issues_no_writes() {
        let ledger =
            MockLedger::with_transactions(vec![tx("t1", dec!(100)), tx("t2", dec!(150))]);
        let engine = MergeEngine::new(ledger.clone());
        let err = engine.merge("b1", "t1", "t2").await.unwrap_err();

        match err {
            MergeError::AmountConflict { edit_amount, revert_amount } => {
                assert_eq!(edit_amount, dec!(100));
                assert_eq!(revert_amount, dec!(150));
            }
            other => panic!("expected AmountConflict, got {other:?}"),
        }
        // Only the two lookups ran.
        assert!(ledger.calls().iter().all(|c| c.starts_with("lookup:")));
    }

    #[tokio::test]
    async fn missing_ids_aggregate() {
        let ledger = MockLedger::with_transactions(vec![]);
        let engine = MergeEngine::new(ledger);
        let err = engine.merge("b1", "ghost-1", "ghost-2").await.unwrap_err();

        match err {
            MergeError::TransactionsNotFound { missing } => {
                assert_eq!(missing, vec!["ghost-1".to_string(), "ghost-2".to_string()]);
            }
            other => panic!("expected TransactionsNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn one_missing_id_reported() {
        let ledger = MockLedger::with_transactions(vec![tx("t1", dec!(10))]);
        let engine = MergeEngine::new(ledger);
        let err = engine.merge("b1", "t1", "ghost").await.unwrap_err();

        match err {
            MergeError::TransactionsNotFound { missing } => {
                assert_eq!(missing, vec!["ghost".to_string()]);
            }
            other => panic!("expected TransactionsNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn trash_failure_surfaces_api_error() {
        let ledger =
            MockLedger::with_transactions(vec![tx("t1", dec!(100)), tx("t2", dec!(100))]);
        ledger.set_fail_trash(true);
        let engine = MergeEngine::new(ledger.clone());
        let err = engine.merge("b1", "t1", "t2").await.unwrap_err();
        assert!(matches!(err, MergeError::Api(_)));
    }

    #[tokio::test]
    async fn retry_after_partial_failure_is_idempotent() {
        let mut a = tx("t1", dec!(100));
        a.urls = vec!["a".into()];
        let mut b = tx("t2", dec!(100));
        b.urls = vec!["b".into()];
        b.properties.insert("note".into(), "y".into());

        let ledger = MockLedger::with_transactions(vec![a, b]);
        ledger.set_fail_trash(true);
        let engine = MergeEngine::new(ledger.clone());

        // First run: update lands, trash fails.
        engine.merge("b1", "t1", "t2").await.unwrap_err();
        let after_first = ledger.stored("t1").unwrap();
        assert_eq!(after_first.urls, vec!["a".to_string(), "b".to_string()]);

        // Retry against the already-merged edit transaction.
        ledger.set_fail_trash(false);
        let result = engine.merge("b1", "t1", "t2").await.unwrap();
        assert_eq!(result.transaction.urls, after_first.urls);
        assert_eq!(result.transaction.properties, after_first.properties);
        assert_eq!(result.transaction.attachments, after_first.attachments);
        assert!(ledger.stored("t2").unwrap().trashed);
    }

    #[tokio::test]
    async fn already_trashed_revert_not_retrashed() {
        let a = tx("t1", dec!(100));
        let mut b = tx("t2", dec!(100));
        b.trashed = true;

        let ledger = MockLedger::with_transactions(vec![a, b]);
        let engine = MergeEngine::new(ledger.clone());
        let result = engine.merge("b1", "t1", "t2").await.unwrap();

        assert_eq!(result.reverted_id, "t2");
        assert!(!ledger.calls().contains(&"trash:t2".to_string()));
    }

    #[tokio::test]
    async fn custom_policy_designates_survivor() {
        struct SecondWins;
        impl SurvivorPolicy for SecondWins {
            fn designate(
                &self,
                first: Transaction,
                second: Transaction,
            ) -> crate::policy::Designation {
                crate::policy::Designation { edit: second, revert: first }
            }
        }

        let ledger =
            MockLedger::with_transactions(vec![tx("t1", dec!(100)), tx("t2", dec!(100))]);
        let engine = MergeEngine::with_policy(ledger.clone(), Box::new(SecondWins));
        let result = engine.merge("b1", "t1", "t2").await.unwrap();
        assert_eq!(result.transaction.id, "t2");
        assert_eq!(result.reverted_id, "t1");
    }

    #[tokio::test]
    async fn gap_filled_refs_survive_commit() {
        let a = tx("t1", dec!(100));
        let mut b = tx("t2", dec!(100));
        b.credit_account = Some(AccountRef::new("c1", "Bank"));
        b.debit_account = Some(AccountRef::new("d1", "Rent"));

        let ledger = MockLedger::with_transactions(vec![a, b]);
        let engine = MergeEngine::new(ledger.clone());
        let result = engine.merge("b1", "t1", "t2").await.unwrap();
        assert_eq!(result.transaction.credit_account.map(|r| r.id), Some("c1".to_string()));
        assert_eq!(result.transaction.debit_account.map(|r| r.id), Some("d1".to_string()));
    }
}
