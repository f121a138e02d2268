//! Budget plans, display-ID allocation, and usage aggregation.

pub mod allocator;
pub mod display_id;
pub mod error;
pub mod filter;
pub mod service;
pub mod types;
pub mod usage;


pub use allocator::{SequenceAllocator, SequenceError, SequenceStore};
pub use display_id::{MAX_RUNNING_NUMBER, SequenceKind, parse_running_number, year_prefix};
pub use error::BudgetError;
pub use filter::{PlanFilter, PlanFilterOptions, distinct_options, distinct_years};
pub use service::BudgetService;
pub use types::{
    BudgetPlan, BudgetTransaction, BudgetType, PlanBalance, PlanClassification, TransactionStatus,
};
pub use usage::{PlanUsage, UsageTotals, group_usage, usage_percentage};
