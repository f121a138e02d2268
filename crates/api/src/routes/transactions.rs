//! Transaction maintenance routes. Admin only.
//!
//! Transactions are recorded under their plan, see the budget routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, put},
};
use chrono::Utc;
use itbudget_core::budget::{BudgetTransaction, TransactionStatus};
use itbudget_db::repositories::TransactionRepository;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Routes that require the admin role.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/{transaction_id}", delete(delete_transaction))
        .route(
            "/transactions/{transaction_id}/status",
            put(update_status),
        )
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New workflow state.
    pub status: TransactionStatus,
}

/// DELETE /transactions/{transaction_id} - Delete and reverse a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    TransactionRepository::new((*state.db).clone())
        .delete_transaction(transaction_id, Utc::now())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /transactions/{transaction_id}/status - Change workflow state.
async fn update_status(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<Json<BudgetTransaction>> {
    let transaction = TransactionRepository::new((*state.db).clone())
        .update_status(transaction_id, payload.status, Utc::now())
        .await?;
    Ok(Json(transaction))
}
