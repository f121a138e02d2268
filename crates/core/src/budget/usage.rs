//! Budget usage aggregation.
//!
//! All amounts stay in `Decimal`. The percentage multiplies before it
//! divides and is rounded once, to one decimal place, half away from zero.
//! Totals across plans sum first and derive the percentage from the sums;
//! per-plan percentages are never averaged.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

use super::types::{BudgetPlan, BudgetTransaction, BudgetType};

/// Usage percentage of `planned` consumed by `used`.
///
/// A plan with no positive planned amount reports zero.
#[must_use]
pub fn usage_percentage(used: Decimal, planned: Decimal) -> Decimal {
    if planned <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (used * Decimal::ONE_HUNDRED / planned)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Usage of a single plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanUsage {
    /// Plan ID.
    pub plan_id: Uuid,
    /// Plan display ID.
    pub display_id: String,
    /// Budget type of the plan.
    pub budget_type: BudgetType,
    /// Budgeting year.
    pub year: i32,
    /// Allocated amount.
    #[serde(with = "rust_decimal::serde::str")]
    pub planned: Decimal,
    /// Sum of transaction amounts.
    #[serde(with = "rust_decimal::serde::str")]
    pub used: Decimal,
    /// `planned - used`; negative when over budget.
    #[serde(with = "rust_decimal::serde::str")]
    pub remaining: Decimal,
    /// Percentage used, one decimal place.
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
}

impl PlanUsage {
    /// Aggregates the transactions charged to `plan`.
    ///
    /// The caller passes only the plan's own transactions. Negative amounts
    /// are not rejected here; they flow through the sum as given.
    #[must_use]
    pub fn from_transactions<'a, I>(plan: &BudgetPlan, transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a BudgetTransaction>,
    {
        let used = transactions.into_iter().map(|t| t.amount).sum();
        Self::from_total(plan, used)
    }

    /// Builds the usage from an already summed transaction total.
    #[must_use]
    pub fn from_total(plan: &BudgetPlan, used: Decimal) -> Self {
        let planned = plan.planned_amount;
        Self {
            plan_id: plan.id,
            display_id: plan.display_id.clone(),
            budget_type: plan.budget_type(),
            year: plan.year,
            planned,
            used,
            remaining: planned - used,
            percentage: usage_percentage(used, planned),
        }
    }
}

/// Totals across many plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageTotals {
    /// Number of plans aggregated.
    pub plan_count: usize,
    /// Sum of planned amounts.
    #[serde(with = "rust_decimal::serde::str")]
    pub planned: Decimal,
    /// Sum of used amounts.
    #[serde(with = "rust_decimal::serde::str")]
    pub used: Decimal,
    /// Sum of remaining amounts.
    #[serde(with = "rust_decimal::serde::str")]
    pub remaining: Decimal,
    /// `used * 100 / planned` over the sums.
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
}

impl Default for UsageTotals {
    fn default() -> Self {
        Self {
            plan_count: 0,
            planned: Decimal::ZERO,
            used: Decimal::ZERO,
            remaining: Decimal::ZERO,
            percentage: Decimal::ZERO,
        }
    }
}

impl UsageTotals {
    /// Sums plan usages, then derives one percentage from the sums.
    #[must_use]
    pub fn from_usages<'a, I>(usages: I) -> Self
    where
        I: IntoIterator<Item = &'a PlanUsage>,
    {
        let mut totals = usages.into_iter().fold(Self::default(), |mut acc, u| {
            acc.plan_count += 1;
            acc.planned += u.planned;
            acc.used += u.used;
            acc.remaining += u.remaining;
            acc
        });
        totals.percentage = usage_percentage(totals.used, totals.planned);
        totals
    }
}

/// Totals per group key, for chart breakdowns.
#[must_use]
pub fn group_usage<'a, K, I>(items: I) -> BTreeMap<K, UsageTotals>
where
    K: Ord,
    I: IntoIterator<Item = (K, &'a PlanUsage)>,
{
    let mut groups: BTreeMap<K, Vec<&'a PlanUsage>> = BTreeMap::new();
    for (key, usage) in items {
        groups.entry(key).or_default().push(usage);
    }
    groups
        .into_iter()
        .map(|(key, members)| (key, UsageTotals::from_usages(members)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::types::{PlanClassification, TransactionStatus};
    use chrono::{NaiveDate, Utc};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn plan(planned: Decimal) -> BudgetPlan {
        BudgetPlan {
            id: Uuid::new_v4(),
            display_id: "OP-250001".to_string(),
            year: 2025,
            planned_amount: planned,
            realized_amount: Decimal::ZERO,
            remaining_amount: planned,
            classification: PlanClassification::Opex {
                coa: Some("6100".to_string()),
                category: Some("Software".to_string()),
                component: None,
            },
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn trx(plan: &BudgetPlan, amount: Decimal) -> BudgetTransaction {
        BudgetTransaction {
            id: Uuid::new_v4(),
            display_id: "TRX-OPEX-25-0001".to_string(),
            budget_plan_id: plan.id,
            budget_type: BudgetType::Opex,
            amount,
            status: TransactionStatus::Draft,
            description: "License renewal".to_string(),
            vendor: None,
            transaction_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(dec!(1000), dec!(250), dec!(25.0))]
    #[case(dec!(3), dec!(1), dec!(33.3))]
    #[case(dec!(3), dec!(2), dec!(66.7))]
    #[case(dec!(1000), dec!(1500), dec!(150.0))]
    #[case(dec!(200), dec!(1), dec!(0.5))]
    #[case(dec!(400), dec!(1), dec!(0.3))]
    #[case(dec!(0), dec!(500), dec!(0))]
    #[case(dec!(1000), dec!(0), dec!(0))]
    fn test_usage_percentage(#[case] planned: Decimal, #[case] used: Decimal, #[case] expected: Decimal) {
        assert_eq!(usage_percentage(used, planned), expected);
    }

    #[test]
    fn test_percentage_rounds_half_away_from_zero() {
        // 1 * 100 / 16 = 6.25 -> 6.3
        assert_eq!(usage_percentage(dec!(1), dec!(16)), dec!(6.3));
        // -1 * 100 / 16 = -6.25 -> -6.3
        assert_eq!(usage_percentage(dec!(-1), dec!(16)), dec!(-6.3));
    }

    #[test]
    fn test_plan_usage_sums_transactions() {
        let p = plan(dec!(1000000));
        let txs = vec![trx(&p, dec!(250000)), trx(&p, dec!(125000))];

        let usage = PlanUsage::from_transactions(&p, &txs);

        assert_eq!(usage.used, dec!(375000));
        assert_eq!(usage.remaining, dec!(625000));
        assert_eq!(usage.percentage, dec!(37.5));
        assert_eq!(usage.plan_id, p.id);
        assert_eq!(usage.budget_type, BudgetType::Opex);
    }

    #[test]
    fn test_empty_transactions() {
        let p = plan(dec!(500));
        let usage = PlanUsage::from_transactions(&p, &[]);

        assert_eq!(usage.used, Decimal::ZERO);
        assert_eq!(usage.remaining, dec!(500));
        assert_eq!(usage.percentage, Decimal::ZERO);
    }

    #[test]
    fn test_over_budget_remaining_is_negative() {
        let p = plan(dec!(1000));
        let txs = vec![trx(&p, dec!(800)), trx(&p, dec!(700))];

        let usage = PlanUsage::from_transactions(&p, &txs);

        assert_eq!(usage.remaining, dec!(-500));
        assert_eq!(usage.percentage, dec!(150.0));
    }

    #[test]
    fn test_negative_amounts_propagate() {
        let p = plan(dec!(1000));
        let txs = vec![trx(&p, dec!(300)), trx(&p, dec!(-100))];

        let usage = PlanUsage::from_transactions(&p, &txs);

        assert_eq!(usage.used, dec!(200));
        assert_eq!(usage.remaining, dec!(800));
    }

    #[test]
    fn test_zero_plans_total_is_zero() {
        let totals = UsageTotals::from_usages(&[]);

        assert_eq!(totals, UsageTotals::default());
        assert_eq!(totals.plan_count, 0);
        assert_eq!(totals.percentage, Decimal::ZERO);
    }

    #[test]
    fn test_totals_sum_then_divide() {
        let a = plan(dec!(1000));
        let b = plan(dec!(100));
        let usages = [
            PlanUsage::from_total(&a, dec!(1000)),
            PlanUsage::from_total(&b, dec!(0)),
        ];

        let totals = UsageTotals::from_usages(&usages);

        assert_eq!(usages[0].percentage, dec!(100.0));
        assert_eq!(usages[1].percentage, dec!(0));
        assert_eq!(totals.planned, dec!(1100));
        assert_eq!(totals.used, dec!(1000));
        assert_eq!(totals.remaining, dec!(100));
        // 1000 * 100 / 1100 = 90.909..., not the 50 an average would give
        assert_eq!(totals.percentage, dec!(90.9));
    }

    #[test]
    fn test_group_usage_per_key() {
        let a = plan(dec!(1000));
        let b = plan(dec!(3000));
        let c = plan(dec!(500));
        let ua = PlanUsage::from_total(&a, dec!(500));
        let ub = PlanUsage::from_total(&b, dec!(1500));
        let uc = PlanUsage::from_total(&c, dec!(600));

        let groups = group_usage([("Hardware", &ua), ("Hardware", &ub), ("Software", &uc)]);

        assert_eq!(groups.len(), 2);
        let hw = &groups["Hardware"];
        assert_eq!(hw.plan_count, 2);
        assert_eq!(hw.planned, dec!(4000));
        assert_eq!(hw.percentage, dec!(50.0));
        let sw = &groups["Software"];
        assert_eq!(sw.remaining, dec!(-100));
        assert_eq!(sw.percentage, dec!(120.0));
    }

    #[test]
    fn test_usage_serializes_amounts_as_strings() {
        let p = plan(dec!(1000));
        let usage = PlanUsage::from_total(&p, dec!(250));
        let json = serde_json::to_value(&usage).unwrap();

        assert_eq!(json["planned"], "1000");
        assert_eq!(json["used"], "250");
        let percentage: Decimal = json["percentage"].as_str().unwrap().parse().unwrap();
        assert_eq!(percentage, dec!(25));
        assert_eq!(json["budget_type"], "opex");
    }
}
