//! Field reconciliation: computes the merged field set written onto the
//! surviving transaction.
//!
//! Pure and deterministic. Given the same two inputs the result is always
//! byte-identical, which is what makes whole-merge retry after a partial
//! write failure safe.

use std::collections::{BTreeMap, BTreeSet};

use tally_types::{AccountRef, Attachment, Transaction};

/// The reconciled field values to write onto the edit transaction.
///
/// Owns independent value copies of everything it carries; building or
/// applying it never mutates a shared account or attachment in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedFields {
    /// Union of both url sets, deduplicated, sorted.
    pub urls: BTreeSet<String>,
    /// Union of both attachment sets, keyed by id (or source url).
    pub attachments: Vec<Attachment>,
    /// Edit-side pairs, plus revert-only keys. Edit wins on collision.
    pub properties: BTreeMap<String, String>,
    pub credit_account: Option<AccountRef>,
    pub debit_account: Option<AccountRef>,
}

/// Compute the merged field set for a non-conflicting pair.
///
/// Rules:
/// - urls: case-sensitive exact-string union.
/// - attachments: union by id, falling back to source url when no id is
///   present; revert-only attachments are re-attached to the edit side.
/// - properties: a key present on both sides keeps the edit side's value.
/// - account references: gap-filling only — a missing credit or debit
///   reference on the edit side is filled from the revert side, never
///   overridden.
/// - date, description, and amount are not touched (the amounts are already
///   known equal by the conflict gate).
pub fn reconcile(edit: &Transaction, revert: &Transaction) -> MergedFields {
    let urls: BTreeSet<String> =
        edit.urls.iter().chain(revert.urls.iter()).cloned().collect();

    let mut attachments = Vec::new();
    let mut seen_keys: BTreeSet<String> = BTreeSet::new();
    for attachment in edit.attachments.iter().chain(revert.attachments.iter()) {
        match attachment.dedup_key() {
            Some(key) => {
                if seen_keys.insert(key.to_string()) {
                    attachments.push(attachment.clone());
                }
            }
            // No identity to compare on; deduplicated by full value so a
            // re-merge does not accumulate copies.
            None => {
                if !attachments.contains(attachment) {
                    attachments.push(attachment.clone());
                }
            }
        }
    }

    let mut properties = edit.properties.clone();
    for (key, value) in &revert.properties {
        properties.entry(key.clone()).or_insert_with(|| value.clone());
    }

    let credit_account = edit
        .credit_account
        .clone()
        .or_else(|| revert.credit_account.clone());
    let debit_account = edit
        .debit_account
        .clone()
        .or_else(|| revert.debit_account.clone());

    MergedFields { urls, attachments, properties, credit_account, debit_account }
}

impl MergedFields {
    /// Write the reconciled values onto the edit transaction.
    ///
    /// Date, description, and amount are left untouched.
    pub fn apply_to(&self, edit: &mut Transaction) {
        edit.urls = self.urls.iter().cloned().collect();
        edit.attachments = self.attachments.clone();
        edit.properties = self.properties.clone();
        edit.credit_account = self.credit_account.clone();
        edit.debit_account = self.debit_account.clone();
    }
}
