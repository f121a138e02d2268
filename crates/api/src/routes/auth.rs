//! Authentication routes for login and password change.

use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, Utc};
use itbudget_core::auth::{hash_password, verify_password};
use itbudget_db::{UserRepository, entities::users};
use itbudget_shared::{AppError, Role};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Auth routes that accept tokens issued with an expired password.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/change-password", post(change_password))
}

/// Login request body.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1))]
    pub current_password: String,
    /// Replacement password; checked against the password policy.
    #[validate(length(min = 1))]
    pub new_password: String,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Access role.
    pub role: Role,
    /// Whether the account can sign in.
    pub is_active: bool,
    /// Last password change.
    pub password_changed_at: DateTime<Utc>,
    /// When the password must next be changed, if it expires.
    pub password_expires_at: Option<DateTime<Utc>>,
}

impl UserResponse {
    pub(crate) fn from_model(user: users::Model, state: &AppState) -> Self {
        let password_changed_at: DateTime<Utc> = user.password_changed_at.into();
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role.into(),
            is_active: user.is_active,
            password_changed_at,
            password_expires_at: state.password_policy.expires_at(password_changed_at),
        }
    }
}

/// Token response returned by login and password change.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// The token only allows a password change until this is cleared.
    pub password_expired: bool,
    /// Signed-in user.
    pub user: UserResponse,
}

fn issue_token(
    state: &AppState,
    user: users::Model,
    password_expired: bool,
) -> ApiResult<TokenResponse> {
    let role: Role = user.role.into();
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, role, password_expired)?;

    Ok(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.access_token_expires_in(),
        password_expired,
        user: UserResponse::from_model(user, state),
    })
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".into())
}

/// POST /auth/login - Authenticate a user and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    payload.validate()?;
    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_email(&payload.email).await? else {
        info!(email = %payload.email, "Login attempt for non-existent user");
        return Err(invalid_credentials().into());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials().into());
    }

    if !user.is_active {
        info!(user_id = %user.id, "Login attempt for deactivated user");
        return Err(AppError::Forbidden("This account has been deactivated".into()).into());
    }

    let password_expired = state
        .password_policy
        .is_expired(user.password_changed_at.into(), Utc::now());
    if password_expired {
        info!(user_id = %user.id, "Login with expired password");
    } else {
        info!(user_id = %user.id, "User logged in");
    }

    Ok(Json(issue_token(&state, user, password_expired)?))
}

/// POST /auth/change-password - Replace the caller's password.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<TokenResponse>> {
    payload.validate()?;
    let user_repo = UserRepository::new((*state.db).clone());

    let user = user_repo
        .find_by_id(auth.user_id())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::Unauthorized("Account no longer active".into()))?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Current password is incorrect".into()).into());
    }
    if payload.new_password == payload.current_password {
        return Err(AppError::BusinessRule(
            "New password must differ from the current password".into(),
        )
        .into());
    }
    state.password_policy.validate(&payload.new_password)?;

    let password_hash = hash_password(&payload.new_password)?;
    let user = user_repo
        .update_password(user.id, password_hash, Utc::now())
        .await?;

    info!(user_id = %user.id, "Password changed");
    Ok(Json(issue_token(&state, user, false)?))
}
