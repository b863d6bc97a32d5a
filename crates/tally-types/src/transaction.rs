use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::AccountRef;
use crate::error::TypeError;

/// Parse a user-supplied amount string into an exact decimal.
///
/// Never coerces through floating point; scientific notation is rejected.
pub fn parse_amount(raw: &str) -> Result<Decimal, TypeError> {
    Decimal::from_str_exact(raw.trim()).map_err(|_| TypeError::InvalidAmount(raw.to_string()))
}

/// An opaque file reference carried by a transaction.
///
/// An attachment is identified by its remote file id when it has one, or by
/// its source url when it was attached by reference and never uploaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Attachment {
    /// The deduplication key: the file id, or the source url when no id exists.
    pub fn dedup_key(&self) -> Option<&str> {
        self.id.as_deref().or(self.url.as_deref())
    }
}

/// A single dated monetary posting between a credit and a debit account.
///
/// Amounts are exact decimals; the remote service never deals in floats and
/// neither does this client. `urls` and `attachments` have set semantics:
/// order is insignificant and duplicates are semantically equal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub book_id: String,
    /// Calendar date, string-encoded in the book's date pattern.
    pub date: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub credit_account: Option<AccountRef>,
    #[serde(default)]
    pub debit_account: Option<AccountRef>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// String-keyed metadata; keys are case-sensitive.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Lifecycle state owned by the remote ledger; read-only to this client.
    #[serde(default)]
    pub posted: bool,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub trashed: bool,
}

impl Transaction {
    /// Returns `true` if both the credit and debit references are present.
    pub fn is_fully_linked(&self) -> bool {
        self.credit_account.is_some() && self.debit_account.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(id: &str) -> Transaction {
        Transaction {
            id: id.into(),
            book_id: "book-1".into(),
            date: "2024-05-01".into(),
            amount: dec!(100),
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

    #[test]
    fn parses_exact_amounts() {
        assert_eq!(parse_amount("12.50"), Ok(dec!(12.50)));
        assert_eq!(parse_amount(" 100 "), Ok(dec!(100)));
    }

    #[test]
    fn rejects_malformed_amounts() {
        let err = parse_amount("12,50").unwrap_err();
        assert_eq!(err, TypeError::InvalidAmount("12,50".into()));
        assert!(err.to_string().contains("12,50"));
    }

    #[test]
    fn attachment_key_prefers_id() {
        let a = Attachment {
            id: Some("file-1".into()),
            url: Some("https://example.com/r.pdf".into()),
            name: None,
        };
        assert_eq!(a.dedup_key(), Some("file-1"));
    }

    #[test]
    fn attachment_key_falls_back_to_url() {
        let a = Attachment { id: None, url: Some("https://example.com/r.pdf".into()), name: None };
        assert_eq!(a.dedup_key(), Some("https://example.com/r.pdf"));
    }

    #[test]
    fn fully_linked() {
        let mut t = tx("t1");
        assert!(!t.is_fully_linked());
        t.credit_account = Some(AccountRef::new("a", "Bank"));
        t.debit_account = Some(AccountRef::new("b", "Rent"));
        assert!(t.is_fully_linked());
    }

    #[test]
    fn amount_equality_is_exact() {
        let mut a = tx("t1");
        let mut b = tx("t2");
        a.amount = dec!(0.1) + dec!(0.2);
        b.amount = dec!(0.3);
        assert_eq!(a.amount, b.amount);
    }

    #[test]
    fn deserializes_with_defaults() {
        let t: Transaction = serde_json::from_str(
            r#"{"id":"t1","book_id":"b1","date":"2024-01-01","amount":"12.50"}"#,
        )
        .unwrap();
        assert_eq!(t.amount, dec!(12.50));
        assert!(t.urls.is_empty());
        assert!(!t.trashed);
    }
}
