//! Budget data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Budget category a plan or transaction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    /// Operating expenditure.
    Opex,
    /// Capital expenditure.
    Capex,
}

impl BudgetType {
    /// Prefix of plan display IDs (`OP-250001`).
    #[must_use]
    pub const fn plan_prefix(self) -> &'static str {
        match self {
            Self::Opex => "OP",
            Self::Capex => "CA",
        }
    }

    /// Type token inside transaction display IDs (`TRX-OPEX-25-0001`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Opex => "OPEX",
            Self::Capex => "CAPEX",
        }
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opex => "opex",
            Self::Capex => "capex",
        }
    }
}

impl std::fmt::Display for BudgetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for BudgetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "opex" => Ok(Self::Opex),
            "capex" => Ok(Self::Capex),
            other => Err(format!("unknown budget type: {other}")),
        }
    }
}

/// Descriptive fields that differ between OPEX and CAPEX plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanClassification {
    /// Operating expenditure plan.
    Opex {
        /// Chart-of-accounts code.
        coa: Option<String>,
        /// Spending category.
        category: Option<String>,
        /// Component within the category.
        component: Option<String>,
    },
    /// Capital expenditure plan.
    Capex {
        /// Asset item code.
        item_code: Option<String>,
        /// Asset item description.
        item_description: Option<String>,
        /// CAPEX approval number.
        capex_number: Option<String>,
    },
}

impl PlanClassification {
    /// Budget type implied by the variant.
    #[must_use]
    pub const fn budget_type(&self) -> BudgetType {
        match self {
            Self::Opex { .. } => BudgetType::Opex,
            Self::Capex { .. } => BudgetType::Capex,
        }
    }
}

/// A budget plan: money allocated for a year under one classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPlan {
    /// Plan ID.
    pub id: Uuid,
    /// Human-readable sequential identifier.
    pub display_id: String,
    /// Budgeting year.
    pub year: i32,
    /// Allocated amount in the smallest currency unit.
    pub planned_amount: Decimal,
    /// Sum of all recorded transactions.
    pub realized_amount: Decimal,
    /// `planned_amount - realized_amount`.
    pub remaining_amount: Decimal,
    /// OPEX or CAPEX descriptive fields.
    pub classification: PlanClassification,
    /// User who created the plan.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BudgetPlan {
    /// Budget type of the plan.
    #[must_use]
    pub const fn budget_type(&self) -> BudgetType {
        self.classification.budget_type()
    }

    /// Label used to bucket the plan on dashboard charts.
    ///
    /// OPEX plans group by category, CAPEX plans by item code.
    #[must_use]
    pub fn group_label(&self) -> String {
        let label = match &self.classification {
            PlanClassification::Opex { category, .. } => category.as_deref(),
            PlanClassification::Capex { item_code, .. } => item_code.as_deref(),
        };
        label
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Uncategorized")
            .to_string()
    }
}

/// Workflow state of a transaction. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Recorded, not yet submitted.
    Draft,
    /// Submitted for approval.
    Submitted,
    /// Approved.
    Approved,
    /// Paid out.
    Paid,
    /// Cancelled.
    Cancelled,
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown transaction status: {other}")),
        }
    }
}

/// A realized expenditure against a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetTransaction {
    /// Transaction ID.
    pub id: Uuid,
    /// Human-readable sequential identifier.
    pub display_id: String,
    /// Plan this transaction is charged to.
    pub budget_plan_id: Uuid,
    /// Budget type; always equal to the plan's.
    pub budget_type: BudgetType,
    /// Amount in the smallest currency unit.
    pub amount: Decimal,
    /// Workflow state.
    pub status: TransactionStatus,
    /// Free-text description.
    pub description: String,
    /// Optional vendor name.
    pub vendor: Option<String>,
    /// Date the expense occurred.
    pub transaction_date: NaiveDate,
    /// User who recorded the transaction.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Planned, realized and remaining amounts of one plan.
///
/// `remaining == planned - realized` holds for every value this type hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanBalance {
    /// Allocated amount.
    pub planned: Decimal,
    /// Sum of transactions.
    pub realized: Decimal,
    /// Planned minus realized; negative when over budget.
    pub remaining: Decimal,
}

impl PlanBalance {
    /// Balance of a freshly created plan.
    #[must_use]
    pub fn new(planned: Decimal) -> Self {
        Self {
            planned,
            realized: Decimal::ZERO,
            remaining: planned,
        }
    }

    /// Balance with `realized` already charged.
    #[must_use]
    pub fn with_realized(planned: Decimal, realized: Decimal) -> Self {
        Self {
            planned,
            realized,
            remaining: planned - realized,
        }
    }

    /// Balance after charging one more transaction.
    #[must_use]
    pub fn record(self, amount: Decimal) -> Self {
        Self::with_realized(self.planned, self.realized + amount)
    }

    /// Balance after removing a previously charged transaction.
    #[must_use]
    pub fn reverse(self, amount: Decimal) -> Self {
        Self::with_realized(self.planned, self.realized - amount)
    }
}
