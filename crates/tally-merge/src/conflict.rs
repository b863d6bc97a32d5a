//! The conflict gate: decides whether two transactions can be merged at all.
//!
//! Only the monetary amount participates. A differing date, description, or
//! account is still mergeable; a differing amount would misstate the book
//! and blocks the merge outright.

use tally_types::Transaction;

/// Compare the two candidates' amounts using exact decimal equality.
///
/// Returns `None` when the amounts are equal, or a non-empty human-readable
/// report naming both amounts when they differ.
pub fn detect_conflict(edit: &Transaction, revert: &Transaction) -> Option<String> {
    if edit.amount == revert.amount {
        None
    } else {
        Some(format!(
            "amounts differ: surviving transaction {} has {}, retired transaction {} has {}",
            edit.id, edit.amount, revert.id, revert.amount
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

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

    #[test]
    fn equal_amounts_no_conflict() {
        assert_eq!(detect_conflict(&tx("a", dec!(100)), &tx("b", dec!(100))), None);
    }

    #[test]
    fn unequal_amounts_report_both() {
        let report = detect_conflict(&tx("a", dec!(100)), &tx("b", dec!(150))).unwrap();
        assert!(report.contains("100"));
        assert!(report.contains("150"));
    }

    #[test]
    fn comparison_is_decimal_exact() {
        // Values that would collide through f64 still compare exactly.
        assert!(detect_conflict(
            &tx("a", dec!(0.10000000000000001)),
            &tx("b", dec!(0.1))
        )
        .is_some());
    }

    #[test]
    fn other_fields_do_not_gate() {
        let mut a = tx("a", dec!(42));
        let mut b = tx("b", dec!(42));
        a.description = "coffee".into();
        b.description = "espresso".into();
        a.date = "2024-01-01".into();
        b.date = "2024-02-02".into();
        assert_eq!(detect_conflict(&a, &b), None);
    }

    proptest! {
        #[test]
        fn report_iff_amounts_differ(cents_a in -1_000_000i64..1_000_000, cents_b in -1_000_000i64..1_000_000) {
            let a = tx("a", Decimal::new(cents_a, 2));
            let b = tx("b", Decimal::new(cents_b, 2));
            let report = detect_conflict(&a, &b);
            if cents_a == cents_b {
                prop_assert!(report.is_none());
            } else {
                let report = report.unwrap();
                prop_assert!(!report.is_empty());
                prop_assert!(report.contains(&a.amount.to_string()));
                prop_assert!(report.contains(&b.amount.to_string()));
            }
        }
    }
}
