//! HTTP implementation of the ledger service boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tally_types::{Account, App, Balance, Book, Collection, Group, Transaction};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::service::LedgerService;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the remote bookkeeping service's JSON API.
pub struct HttpLedgerService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpLedgerService {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path, "PUT");
        let response = self
            .client
            .put(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        debug!(path, "DELETE");
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_for(response).await)
        }
    }

    /// Empty-bodied POST used by lifecycle endpoints (trash, restore, post).
    async fn post_action<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_for(response).await)
        }
    }

    async fn error_for(response: Response) -> ApiError {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            _ => ApiError::api(status.as_u16(), message),
        }
    }
}

#[async_trait]
impl LedgerService for HttpLedgerService {
    async fn list_books(&self) -> ApiResult<Vec<Book>> {
        self.get_json("/v1/books").await
    }

    async fn get_book(&self, book_id: &str) -> ApiResult<Book> {
        self.get_json(&format!("/v1/books/{book_id}")).await
    }

    async fn update_book(&self, book: &Book) -> ApiResult<Book> {
        self.put_json(&format!("/v1/books/{}", book.id), book).await
    }

    async fn list_accounts(&self, book_id: &str) -> ApiResult<Vec<Account>> {
        self.get_json(&format!("/v1/books/{book_id}/accounts")).await
    }

    async fn get_account(&self, book_id: &str, account_id: &str) -> ApiResult<Account> {
        self.get_json(&format!("/v1/books/{book_id}/accounts/{account_id}")).await
    }

    async fn create_account(&self, book_id: &str, account: &Account) -> ApiResult<Account> {
        self.post_json(&format!("/v1/books/{book_id}/accounts"), account).await
    }

    async fn update_account(&self, book_id: &str, account: &Account) -> ApiResult<Account> {
        self.put_json(&format!("/v1/books/{book_id}/accounts/{}", account.id), account).await
    }

    async fn delete_account(&self, book_id: &str, account_id: &str) -> ApiResult<()> {
        self.delete(&format!("/v1/books/{book_id}/accounts/{account_id}")).await
    }

    async fn list_groups(&self, book_id: &str) -> ApiResult<Vec<Group>> {
        self.get_json(&format!("/v1/books/{book_id}/groups")).await
    }

    async fn get_group(&self, book_id: &str, group_id: &str) -> ApiResult<Group> {
        self.get_json(&format!("/v1/books/{book_id}/groups/{group_id}")).await
    }

    async fn create_group(&self, book_id: &str, group: &Group) -> ApiResult<Group> {
        self.post_json(&format!("/v1/books/{book_id}/groups"), group).await
    }

    async fn update_group(&self, book_id: &str, group: &Group) -> ApiResult<Group> {
        self.put_json(&format!("/v1/books/{book_id}/groups/{}", group.id), group).await
    }

    async fn delete_group(&self, book_id: &str, group_id: &str) -> ApiResult<()> {
        self.delete(&format!("/v1/books/{book_id}/groups/{group_id}")).await
    }

    async fn list_transactions(
        &self,
        book_id: &str,
        query: Option<&str>,
    ) -> ApiResult<Vec<Transaction>> {
        let path = format!("/v1/books/{book_id}/transactions");
        debug!(path, "GET");
        let mut request = self.client.get(self.url(&path)).bearer_auth(&self.api_key);
        if let Some(q) = query {
            request = request.query(&[("query", q)]);
        }
        Self::read_json(request.send().await?).await
    }

    async fn lookup_transaction(
        &self,
        book_id: &str,
        transaction_id: &str,
    ) -> ApiResult<Option<Transaction>> {
        debug!(book_id, transaction_id, "lookup transaction");
        let response = self
            .client
            .get(self.url(&format!("/v1/books/{book_id}/transactions/{transaction_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read_json(response).await.map(Some)
    }

    async fn create_transaction(
        &self,
        book_id: &str,
        transaction: &Transaction,
    ) -> ApiResult<Transaction> {
        self.post_json(&format!("/v1/books/{book_id}/transactions"), transaction).await
    }

    async fn update_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction> {
        self.put_json(
            &format!("/v1/books/{}/transactions/{}", transaction.book_id, transaction.id),
            transaction,
        )
        .await
    }

    async fn trash_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction> {
        self.post_action(&format!(
            "/v1/books/{}/transactions/{}/trash",
            transaction.book_id, transaction.id
        ))
        .await
    }

    async fn restore_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction> {
        self.post_action(&format!(
            "/v1/books/{}/transactions/{}/restore",
            transaction.book_id, transaction.id
        ))
        .await
    }

    async fn post_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction> {
        self.post_action(&format!(
            "/v1/books/{}/transactions/{}/post",
            transaction.book_id, transaction.id
        ))
        .await
    }

    async fn check_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction> {
        self.post_action(&format!(
            "/v1/books/{}/transactions/{}/check",
            transaction.book_id, transaction.id
        ))
        .await
    }

    async fn uncheck_transaction(&self, transaction: &Transaction) -> ApiResult<Transaction> {
        self.post_action(&format!(
            "/v1/books/{}/transactions/{}/uncheck",
            transaction.book_id, transaction.id
        ))
        .await
    }

    async fn query_balances(&self, book_id: &str, query: &str) -> ApiResult<Vec<Balance>> {
        let path = format!("/v1/books/{book_id}/balances");
        debug!(path, query, "GET");
        let response = self
            .client
            .get(self.url(&path))
            .bearer_auth(&self.api_key)
            .query(&[("query", query)])
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_collections(&self) -> ApiResult<Vec<Collection>> {
        self.get_json("/v1/collections").await
    }

    async fn get_collection(&self, collection_id: &str) -> ApiResult<Collection> {
        self.get_json(&format!("/v1/collections/{collection_id}")).await
    }

    async fn list_apps(&self, book_id: &str) -> ApiResult<Vec<App>> {
        self.get_json(&format!("/v1/books/{book_id}/apps")).await
    }

    async fn deploy_app(&self, payload: serde_json::Value) -> ApiResult<App> {
        self.post_json("/v1/apps", &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_stripped() {
        let svc = HttpLedgerService::new("https://api.example.com/", "key").unwrap();
        assert_eq!(svc.url("/v1/books"), "https://api.example.com/v1/books");
    }

    #[test]
    fn query_parameter_is_form_encoded() {
        let svc = HttpLedgerService::new("https://api.example.com", "key").unwrap();
        let request = svc
            .client
            .get(svc.url("/v1/books/b1/balances"))
            .query(&[("query", "account:'Bank' after:2024-01-01")])
            .build()
            .unwrap();
        let encoded = request.url().query().unwrap();
        assert!(encoded.starts_with("query="));
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('\''));
    }
}
