use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /auth/whoami - identity carried by the presented token
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success(user))
}
