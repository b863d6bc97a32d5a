use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A period total reported by the remote balance query.
///
/// Balance computation is owned by the remote ledger; this is a read-only
/// projection of its answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Account or group name the total belongs to.
    pub name: String,
    #[serde(default)]
    pub periods: Vec<BalancePeriod>,
    pub total: Decimal,
}

/// One period bucket within a balance report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalancePeriod {
    /// Period label (e.g. a month or a fiscal quarter), as reported remotely.
    pub label: String,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn balance_deserializes() {
        let b: Balance = serde_json::from_str(
            r#"{"name":"Bank","total":"1250.75","periods":[{"label":"2024-04","amount":"1250.75"}]}"#,
        )
        .unwrap();
        assert_eq!(b.total, dec!(1250.75));
        assert_eq!(b.periods.len(), 1);
    }
}
