use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Json, Router};
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::store::MemoryStore;

    fn test_state() -> AppState {
        let config = AppConfig::from_vars(|key| match key {
            "JWT_SECRET" => Some("middleware-secret".to_string()),
            "BCRYPT_COST" => Some("4".to_string()),
            _ => None,
        })
        .unwrap();
        AppState::new(config, Arc::new(MemoryStore::new()))
    }

    fn protected_app(state: AppState) -> Router {
        Router::new()
            .route(
                "/me",
                get(|Extension(user): Extension<AuthUser>| async move { Json(user) }),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
            .with_state(state)
    }

    fn request(auth: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/me");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn valid_token_exposes_the_same_user() {
        let state = test_state();
        let user_id = Uuid::new_v4();
        let token = state.tokens.issue(user_id, "ada@example.com").unwrap();

        let response = protected_app(state)
            .oneshot(request(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["userId"], user_id.to_string());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_unauthorized() {
        for auth in [None, Some("Bearer "), Some("Basic abc"), Some("Bearer garbage")] {
            let response = protected_app(test_state()).oneshot(request(auth)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "auth header {:?}", auth);
        }
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_unauthorized() {
        let other = crate::auth::TokenService::new("someone-else", 1);
        let token = other.issue(Uuid::new_v4(), "eve@example.com").unwrap();

        let response = protected_app(test_state())
            .oneshot(request(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
