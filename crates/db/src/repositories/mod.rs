//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod plan;
pub mod sequence;
pub mod transaction;
pub mod user;

pub use plan::{CreatePlanInput, PlanError, PlanRepository, PlanWithUsage};
pub use sequence::PgSequenceStore;
pub use transaction::{CreateTransactionInput, TransactionError, TransactionRepository};
pub use user::{CreateUserInput, UserRepository};
