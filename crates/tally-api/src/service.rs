use async_trait::async_trait;
use tally_types::{Account, App, Balance, Book, Collection, Group, Transaction};

use crate::error::ApiResult;

/// The remote bookkeeping service boundary.
///
/// All operations are asynchronous, non-blocking calls against a shared
/// remote ledger; the client holds no locks and shares no mutable state
/// across concurrent invocations beyond what the remote service enforces.
///
/// [`lookup_transaction`](Self::lookup_transaction) resolves a missing id to
/// `Ok(None)` rather than an error so callers can aggregate several misses
/// into one report.
#[async_trait]
pub trait LedgerService: Send + Sync {
    // ---- Books ----
    async fn list_books(&self) -> ApiResult<Vec<Book>>;
    async fn get_book(&self, book_id: &str) -> ApiResult<Book>;
    async fn update_book(&self, book: &Book) -> ApiResult<Book>;

    // ---- Accounts ----
    async fn list_accounts(&self, book_id: &str) -> ApiResult<Vec<Account>>;
    async fn get_account(&self, book_id: &str, account_id: &str) -> ApiResult<Account>;
    async fn create_account(&self, book_id: &str, account: &Account) -> ApiResult<Account>;
    async fn update_account(&self, book_id: &str, account: &Account) -> ApiResult<Account>;
    async fn delete_account(&self, book_id: &str, account_id: &str) -> ApiResult<()>;

    // ---- Groups ----
    async fn list_groups(&self, book_id: &str) -> ApiResult<Vec<Group>>;
    async fn get_group(&self, book_id: &str, group_id: &str) -> ApiResult<Group>;
    async fn create_group(&self, book_id: &str, group: &Group) -> ApiResult<Group>;
    async fn update_group(&self, book_id: &str, group: &Group) -> ApiResult<Group>;
    async fn delete_group(&self, book_id: &str, group_id: &str) -> ApiResult<()>;

    // ---- Transactions ----
    async fn list_transactions(
        &self,
        book_id: &str,
        query: Option<&str>,
    ) -> ApiResult<Vec<Transaction>>;

    /// Resolve a transaction by id, or `None` when the id does not exist.
    async fn lookup_transaction(
        &self,
        book_id: &str,
        transaction_id: &str,
    ) -> ApiResult<Option<Transaction>>;

    async fn create_transaction(
        &self,
        book_id: &str,
        transaction: &Transaction,
    ) -> ApiResult<Transaction>;

    /// Persist the full state of an existing transaction.
    async fn update_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction>;

    /// Soft-delete a transaction. Reversible on the remote service via
    /// [`restore_transaction`](Self::restore_transaction).
    async fn trash_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction>;

    async fn restore_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction>;
    async fn post_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction>;
    async fn check_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction>;
    async fn uncheck_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction>;

    // ---- Balances ----
    async fn query_balances(&self, book_id: &str, query: &str) -> ApiResult<Vec<Balance>>;

    // ---- Collections ----
    async fn list_collections(&self) -> ApiResult<Vec<Collection>>;
    async fn get_collection(&self, collection_id: &str) -> ApiResult<Collection>;

    // ---- Apps ----
    async fn list_apps(&self, book_id: &str) -> ApiResult<Vec<App>>;
    async fn deploy_app(&self, payload: serde_json::Value) -> ApiResult<App>;
}
