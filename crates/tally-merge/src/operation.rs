//! The merge operation: an ephemeral record of one in-flight merge.

use tally_types::Transaction;

use crate::conflict::detect_conflict;
use crate::error::MergeError;
use crate::policy::{FirstArgumentWins, SurvivorPolicy};
use crate::reconcile::reconcile;

/// Engine-level lifecycle of a merge operation. In-memory only, never
/// persisted. Validation of the two ids happens in the loader, before an
/// operation exists, so every operation starts out gated: `Blocked` or
/// `Reconciled`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeState {
    /// Terminal; the conflict gate fired. No side effects have occurred.
    Blocked,
    Reconciled,
    Applying,
    Committed,
    /// Terminal for this instance; one or both remote writes failed. The
    /// merge as a whole is safely retryable.
    Failed,
}

/// One in-flight merge of two loaded transactions.
///
/// Owns its designation and conflict report, both computed once at
/// construction and never re-derived. Works on its own clones of the loaded
/// transactions; nothing is mutated until [`apply_merged_data`]
/// (Self::apply_merged_data) is invoked explicitly.
#[derive(Clone, Debug)]
pub struct MergeOperation {
    edit: Transaction,
    revert: Transaction,
    conflict_report: Option<String>,
    state: MergeState,
}

impl MergeOperation {
    /// Construct with the default first-argument-wins designation.
    pub fn new(first: Transaction, second: Transaction) -> Self {
        Self::with_policy(&FirstArgumentWins, first, second)
    }

    /// Construct with a caller-supplied survivor policy.
    pub fn with_policy(
        policy: &dyn SurvivorPolicy,
        first: Transaction,
        second: Transaction,
    ) -> Self {
        let designation = policy.designate(first, second);
        let conflict_report = detect_conflict(&designation.edit, &designation.revert);
        let state = if conflict_report.is_some() {
            MergeState::Blocked
        } else {
            MergeState::Reconciled
        };
        Self {
            edit: designation.edit,
            revert: designation.revert,
            conflict_report,
            state,
        }
    }

    /// The blocking conflict report, if the gate fired.
    pub fn conflict_report(&self) -> Option<&str> {
        self.conflict_report.as_deref()
    }

    pub fn is_blocked(&self) -> bool {
        self.conflict_report.is_some()
    }

    pub fn state(&self) -> MergeState {
        self.state
    }

    /// The transaction designated to survive.
    pub fn edit_transaction(&self) -> &Transaction {
        &self.edit
    }

    /// The transaction designated to be retired.
    pub fn revert_transaction(&self) -> &Transaction {
        &self.revert
    }

    /// Write the reconciled field set onto the edit transaction.
    ///
    /// The conflict report is a hard gate: on a blocked operation this
    /// returns the amount conflict and mutates nothing.
    pub fn apply_merged_data(&mut self) -> Result<(), MergeError> {
        if self.is_blocked() {
            return Err(MergeError::AmountConflict {
                edit_amount: self.edit.amount,
                revert_amount: self.revert.amount,
            });
        }
        let merged = reconcile(&self.edit, &self.revert);
        merged.apply_to(&mut self.edit);
        Ok(())
    }

    pub(crate) fn mark_applying(&mut self) {
        self.state = MergeState::Applying;
    }

    pub(crate) fn mark_committed(&mut self) {
        self.state = MergeState::Committed;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.state = MergeState::Failed;
    }
}
