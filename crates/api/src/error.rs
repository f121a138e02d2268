//! HTTP error responses.
//!
//! Handlers return [`ApiResult`]; every domain error converts into an
//! [`AppError`] and renders as `{ "error": <code>, "message": <text> }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use itbudget_core::auth::{PasswordError, PasswordPolicyError};
use itbudget_core::budget::{BudgetError, SequenceError};
use itbudget_db::repositories::{PlanError, TransactionError};
use itbudget_shared::{AppError, JwtError};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned from handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The wrapped application error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if err.is_server_error() {
            error!(error = %err, code = err.error_code(), "Request failed");
            match err {
                AppError::Persistence(_) => "The budget store is unavailable".to_string(),
                _ => "An internal error occurred".to_string(),
            }
        } else {
            err.to_string()
        };

        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(match err {
            DbErr::RecordNotFound(what) => AppError::NotFound(what),
            conn @ (DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
                AppError::Persistence(conn.to_string())
            }
            other => AppError::Internal(other.to_string()),
        })
    }
}

impl From<SequenceError> for ApiError {
    fn from(err: SequenceError) -> Self {
        Self(match err {
            SequenceError::CapacityExceeded { partition } => AppError::CapacityExceeded(format!(
                "no display ids left in partition {partition}"
            )),
            SequenceError::Persistence(msg) => AppError::Persistence(msg),
        })
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        Self(match err {
            BudgetError::NegativeAmount | BudgetError::FractionalAmount => {
                AppError::Validation(err.to_string())
            }
            BudgetError::TypeMismatch { .. } | BudgetError::DeleteNotAllowed(_) => {
                AppError::BusinessRule(err.to_string())
            }
        })
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::NotFound(id) => Self(AppError::NotFound(format!("budget plan {id}"))),
            PlanError::Budget(e) => e.into(),
            PlanError::Sequence(e) => e.into(),
            PlanError::Database(e) => e.into(),
        }
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(id) => Self(AppError::NotFound(format!("transaction {id}"))),
            TransactionError::PlanNotFound(id) => {
                Self(AppError::NotFound(format!("budget plan {id}")))
            }
            TransactionError::Budget(e) => e.into(),
            TransactionError::Sequence(e) => e.into(),
            TransactionError::Database(e) => e.into(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}
