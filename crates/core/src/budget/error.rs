//! Budget error types.

use thiserror::Error;

use super::types::BudgetType;

/// Budget rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Amounts are whole units of the smallest currency denomination.
    #[error("Amount must be a whole number of currency units")]
    FractionalAmount,

    /// Transaction type does not match its plan.
    #[error("Transaction type {transaction} does not match plan type {plan}")]
    TypeMismatch {
        /// Plan's budget type.
        plan: BudgetType,
        /// Requested transaction type.
        transaction: BudgetType,
    },

    /// Plans of this type cannot be deleted.
    #[error("{0} plans cannot be deleted")]
    DeleteNotAllowed(BudgetType),
}
