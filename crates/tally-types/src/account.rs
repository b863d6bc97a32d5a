use std::fmt;

use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

use crate::error::TypeError;

/// Classification of an account within a double-entry book.
///
/// The account type determines which side of the balance sheet the account
/// lives on and how the remote service signs its running balance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Something owned (bank account, receivable).
    Asset,
    /// Something owed (credit card, payable).
    Liability,
    /// Money entering the book (revenue).
    Incoming,
    /// Money leaving the book (expense).
    Outgoing,
}

impl AccountType {
    /// Parse the remote service's wire name for an account type.
    pub fn parse(name: &str) -> Result<Self, TypeError> {
        match name {
            "ASSET" => Ok(Self::Asset),
            "LIABILITY" => Ok(Self::Liability),
            "INCOMING" => Ok(Self::Incoming),
            "OUTGOING" => Ok(Self::Outgoing),
            other => Err(TypeError::UnknownAccountType(other.to_string())),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => write!(f, "ASSET"),
            Self::Liability => write!(f, "LIABILITY"),
            Self::Incoming => write!(f, "INCOMING"),
            Self::Outgoing => write!(f, "OUTGOING"),
        }
    }
}

/// A full account record as stored by the remote ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Lowercased, whitespace-normalized name used for lookups.
    #[serde(default)]
    pub normalized_name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Ids of the groups this account belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub archived: bool,
}

/// A lightweight reference to an account, as carried by a transaction.
///
/// References are value copies: mutating a transaction's reference never
/// touches the account record it points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: String,
    pub name: String,
}

impl AccountRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl From<&Account> for AccountRef {
    fn from(account: &Account) -> Self {
        Self { id: account.id.clone(), name: account.name.clone() }
    }
}

/// A named grouping of accounts, optionally nested under a parent group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_roundtrip() {
        for t in [
            AccountType::Asset,
            AccountType::Liability,
            AccountType::Incoming,
            AccountType::Outgoing,
        ] {
            assert_eq!(AccountType::parse(&t.to_string()), Ok(t));
        }
    }

    #[test]
    fn unknown_account_type() {
        let err = AccountType::parse("EQUITY").unwrap_err();
        assert_eq!(err, TypeError::UnknownAccountType("EQUITY".into()));
        assert!(err.to_string().contains("EQUITY"));
    }

    #[test]
    fn ref_from_account_copies_values() {
        let account = Account {
            id: "acc-1".into(),
            name: "Bank".into(),
            normalized_name: "bank".into(),
            account_type: AccountType::Asset,
            groups: vec![],
            balance: None,
            archived: false,
        };
        let r = AccountRef::from(&account);
        assert_eq!(r.id, "acc-1");
        assert_eq!(r.name, "Bank");
    }
}
