//! User administration routes. Admin only.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use itbudget_core::auth::hash_password;
use itbudget_db::{UserRepository, repositories::CreateUserInput};
use itbudget_shared::{AppError, Role};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::routes::auth::UserResponse;

/// Creates the user routes (auth and admin middleware applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}/active", put(set_active))
}

/// Request body for creating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    /// Initial password; checked against the password policy.
    pub password: String,
    /// Access role, `user` when omitted.
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

/// Request body for activating or deactivating a user.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    /// New active flag.
    pub is_active: bool,
}

/// GET /users - List all users.
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = UserRepository::new((*state.db).clone()).list_users().await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| UserResponse::from_model(u, &state))
            .collect(),
    ))
}

/// POST /users - Create a user.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    payload.validate()?;
    state.password_policy.validate(&payload.password)?;

    let user_repo = UserRepository::new((*state.db).clone());
    if user_repo.email_exists(&payload.email).await? {
        return Err(
            AppError::Conflict(format!("email {} is already registered", payload.email)).into(),
        );
    }

    let password_hash = hash_password(&payload.password)?;
    let user = user_repo
        .create_user(
            CreateUserInput {
                email: payload.email,
                full_name: payload.full_name,
                password_hash,
                role: payload.role.into(),
            },
            Utc::now(),
        )
        .await?;

    info!(user_id = %user.id, created_by = %auth.user_id(), role = %payload.role, "User created");
    Ok((StatusCode::CREATED, Json(UserResponse::from_model(user, &state))))
}

/// PUT /users/{user_id}/active - Activate or deactivate a user.
async fn set_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<SetActiveRequest>,
) -> ApiResult<Json<UserResponse>> {
    if user_id == auth.user_id() && !payload.is_active {
        return Err(AppError::BusinessRule("You cannot deactivate your own account".into()).into());
    }

    let user = UserRepository::new((*state.db).clone())
        .set_active(user_id, payload.is_active, Utc::now())
        .await?;

    info!(user_id = %user.id, is_active = user.is_active, "User activation changed");
    Ok(Json(UserResponse::from_model(user, &state)))
}
