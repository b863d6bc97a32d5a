use tally_types::Transaction;

/// The designation of which transaction survives a merge.
#[derive(Clone, Debug)]
pub struct Designation {
    /// The transaction that survives and receives reconciled data.
    pub edit: Transaction,
    /// The transaction that is retired (trashed).
    pub revert: Transaction,
}

/// Decides which of two candidate transactions survives a merge.
///
/// The designation is computed once, at operation construction, and never
/// re-derived. Nothing else in the engine depends on argument order, so a
/// different policy (keep the posted one, keep the oldest) can be swapped in
/// without touching the rest of the engine.
pub trait SurvivorPolicy: Send + Sync {
    fn designate(&self, first: Transaction, second: Transaction) -> Designation;
}

/// The default policy: whichever transaction the caller passed first
/// survives.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstArgumentWins;

impl SurvivorPolicy for FirstArgumentWins {
    fn designate(&self, first: Transaction, second: Transaction) -> Designation {
        Designation { edit: first, revert: second }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn tx(id: &str) -> Transaction {
        Transaction {
            id: id.into(),
            book_id: "b1".into(),
            date: "2024-05-01".into(),
            amount: rust_decimal::Decimal::ONE_HUNDRED,
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
    fn first_argument_wins() {
        let d = FirstArgumentWins.designate(tx("a"), tx("b"));
        assert_eq!(d.edit.id, "a");
        assert_eq!(d.revert.id, "b");
    }

    #[test]
    fn designation_ignores_posting_state() {
        let mut second = tx("b");
        second.posted = true;
        let d = FirstArgumentWins.designate(tx("a"), second);
        assert_eq!(d.edit.id, "a");
    }
}
