// handlers/public/auth/login.rs - POST /login

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::api::validation::FieldErrors;
use crate::auth::verify_password;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::{normalize_email, TokenResponse};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /login - exchange credentials for a token
///
/// Unknown email and wrong password produce the same 400
/// `INVALID_CREDENTIALS` response.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(payload) = payload?;

    let mut errors = FieldErrors::new();
    let email = errors.required("email", payload.email.as_deref());
    let password = errors.secret("password", payload.password);
    errors.finish()?;

    let email = normalize_email(&email);
    let Some(user) = state.store.find_user_by_email(&email).await? else {
        tracing::warn!("Login attempt for unknown email");
        return Err(ApiError::invalid_credentials());
    };

    if !verify_password(password, user.password.clone()).await? {
        tracing::warn!("Login attempt with wrong password for user {}", user.id);
        return Err(ApiError::invalid_credentials());
    }

    let token = state.tokens.issue(user.id, &user.email)?;
    Ok(ApiResponse::success(TokenResponse { token, user }))
}
