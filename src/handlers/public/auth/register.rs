// handlers/public/auth/register.rs - POST /register

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::api::validation::FieldErrors;
use crate::auth::hash_password;
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::{normalize_email, TokenResponse};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// POST /register - create an account and return a token for it
///
/// Request: `{"email": "...", "password": "...", "name": "..."}`
///
/// Responds 201 with `{token, user}`. A taken email is a 400 `CONFLICT`;
/// the store decides that atomically, so two concurrent registrations for
/// the same address cannot both succeed.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(payload) = payload?;

    let mut errors = FieldErrors::new();
    let email = errors.required("email", payload.email.as_deref());
    let name = errors.required("name", payload.name.as_deref());
    let password = errors.secret("password", payload.password);
    errors.finish()?;

    let password_hash = hash_password(password, state.config.security.bcrypt_cost).await?;
    let user = state
        .store
        .create_user(NewUser {
            email: normalize_email(&email),
            password_hash,
            name,
        })
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::conflict("User already exists"),
            other => other,
        })?;

    let token = state.tokens.issue(user.id, &user.email)?;
    tracing::info!("Registered user {}", user.id);

    Ok(ApiResponse::created(TokenResponse { token, user }))
}
