//! Budget rules applied before plans and transactions are persisted.

use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{BudgetPlan, BudgetType};

/// Budget service for business rules.
pub struct BudgetService;

impl BudgetService {
    /// Checks a currency amount: non-negative and integer-valued.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAmount` or `BudgetError::FractionalAmount`.
    pub fn validate_amount(amount: Decimal) -> Result<(), BudgetError> {
        if amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount);
        }
        if !amount.fract().is_zero() {
            return Err(BudgetError::FractionalAmount);
        }
        Ok(())
    }

    /// Checks a transaction about to be charged to `plan`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::TypeMismatch` when the types differ, or the
    /// amount errors of [`Self::validate_amount`].
    pub fn validate_transaction(
        plan: &BudgetPlan,
        transaction_type: BudgetType,
        amount: Decimal,
    ) -> Result<(), BudgetError> {
        if plan.budget_type() != transaction_type {
            return Err(BudgetError::TypeMismatch {
                plan: plan.budget_type(),
                transaction: transaction_type,
            });
        }
        Self::validate_amount(amount)
    }

    /// Only CAPEX plans may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::DeleteNotAllowed` for OPEX plans.
    pub fn ensure_deletable(plan: &BudgetPlan) -> Result<(), BudgetError> {
        match plan.budget_type() {
            BudgetType::Capex => Ok(()),
            other => Err(BudgetError::DeleteNotAllowed(other)),
        }
    }
}
