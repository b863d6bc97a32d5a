//! Foundation types for the Tally bookkeeping client.
//!
//! This crate provides the remote-ledger entity types used throughout the
//! Tally system. Every other Tally crate depends on `tally-types`.
//!
//! # Key Types
//!
//! - [`Book`] — A double-entry account book owned by the remote service
//! - [`Account`] — A credit/debit account within a book
//! - [`Transaction`] — A dated monetary posting between two accounts
//! - [`Attachment`] — An opaque file reference carried by a transaction
//! - [`Balance`] — A period total for an account or group
//! - [`Collection`] — A named set of books
//! - [`App`] — A server-side app installed on a book

pub mod account;
pub mod app;
pub mod balance;
pub mod book;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountRef, AccountType, Group};
pub use app::App;
pub use balance::{Balance, BalancePeriod};
pub use book::{Book, Collection};
pub use error::TypeError;
pub use transaction::{parse_amount, Attachment, Transaction};
