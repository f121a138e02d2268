//! Display identifier formats.
//!
//! Plans: `<PREFIX>-<YY><NNNN>` (`OP-250012`, `CA-260001`).
//! Transactions: `TRX-<TYPE>-<YY>-<NNNN>` (`TRX-CAPEX-25-0003`).
//!
//! `YY` is the reference year modulo 100 and `NNNN` the running number
//! within the (kind, year) partition, zero-padded to four digits.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::types::BudgetType;

/// Largest running number the fixed four-digit field can hold.
pub const MAX_RUNNING_NUMBER: u32 = 9999;

const RUNNING_NUMBER_WIDTH: usize = 4;

/// Which series a display ID belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Budget plan identifiers.
    Plan(BudgetType),
    /// Transaction identifiers.
    Transaction(BudgetType),
}

impl SequenceKind {
    /// Stable key of the series, used to name counter rows.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Plan(BudgetType::Opex) => "opex_plan",
            Self::Plan(BudgetType::Capex) => "capex_plan",
            Self::Transaction(BudgetType::Opex) => "opex_transaction",
            Self::Transaction(BudgetType::Capex) => "capex_transaction",
        }
    }

    /// Budget type the series belongs to.
    #[must_use]
    pub const fn budget_type(self) -> BudgetType {
        match self {
            Self::Plan(t) | Self::Transaction(t) => t,
        }
    }

    /// Everything before the running number, e.g. `OP-25` or `TRX-OPEX-25-`.
    #[must_use]
    pub fn partition_prefix(self, year_prefix: &str) -> String {
        match self {
            Self::Plan(t) => format!("{}-{year_prefix}", t.plan_prefix()),
            Self::Transaction(t) => format!("TRX-{}-{year_prefix}-", t.code()),
        }
    }

    /// Full identifier for a running number.
    #[must_use]
    pub fn format(self, year_prefix: &str, running_number: u32) -> String {
        format!(
            "{}{running_number:0width$}",
            self.partition_prefix(year_prefix),
            width = RUNNING_NUMBER_WIDTH
        )
    }
}

/// Two-digit year suffix for a reference instant.
#[must_use]
pub fn year_prefix(reference_time: DateTime<Utc>) -> String {
    format!("{:02}", reference_time.year().rem_euclid(100))
}

/// Running number carried in the last four characters of an identifier.
///
/// Returns `None` when those characters are not all ASCII digits.
#[must_use]
pub fn parse_running_number(display_id: &str) -> Option<u32> {
    let start = display_id.len().checked_sub(RUNNING_NUMBER_WIDTH)?;
    let tail = display_id.get(start..)?;
    if !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(2025, "25")]
    #[case(2000, "00")]
    #[case(2009, "09")]
    #[case(1999, "99")]
    fn test_year_prefix(#[case] year: i32, #[case] expected: &str) {
        let at = Utc.with_ymd_and_hms(year, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(year_prefix(at), expected);
    }

    #[rstest]
    #[case(SequenceKind::Plan(BudgetType::Opex), 12, "OP-250012")]
    #[case(SequenceKind::Plan(BudgetType::Capex), 1, "CA-250001")]
    #[case(SequenceKind::Transaction(BudgetType::Opex), 7, "TRX-OPEX-25-0007")]
    #[case(SequenceKind::Transaction(BudgetType::Capex), 9999, "TRX-CAPEX-25-9999")]
    fn test_format(#[case] kind: SequenceKind, #[case] n: u32, #[case] expected: &str) {
        assert_eq!(kind.format("25", n), expected);
    }

    #[rstest]
    #[case("OP-250012", Some(12))]
    #[case("TRX-CAPEX-25-0300", Some(300))]
    #[case("OP-25ABCD", None)]
    #[case("OP-25001X", None)]
    #[case("123", None)]
    #[case("", None)]
    #[case("OP-25é01", None)]
    fn test_parse_running_number(#[case] id: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_running_number(id), expected);
    }

    #[test]
    fn test_keys_unique_per_series() {
        let keys = [
            SequenceKind::Plan(BudgetType::Opex).key(),
            SequenceKind::Plan(BudgetType::Capex).key(),
            SequenceKind::Transaction(BudgetType::Opex).key(),
            SequenceKind::Transaction(BudgetType::Capex).key(),
        ];
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }
}
