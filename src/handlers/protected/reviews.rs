// handlers/protected/reviews.rs - PUT and DELETE /reviews/:id

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Review, ReviewChanges};
use crate::error::ApiError;
use crate::handlers::public::books::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::policy::can_modify_review;
use crate::state::AppState;

use super::books::ReviewRequest;

#[derive(Debug, Serialize)]
pub struct DeletedReview {
    pub id: Uuid,
}

/// Load a review the caller is allowed to change.
async fn owned_review(
    state: &AppState,
    user: &AuthUser,
    raw_id: &str,
    action: &str,
) -> Result<Review, ApiError> {
    let id = parse_id(raw_id).ok_or_else(|| ApiError::not_found("Review not found"))?;
    let review = state
        .store
        .find_review(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    if !can_modify_review(user, &review) {
        tracing::warn!(
            "User {} tried to {} review {} owned by {}",
            user.user_id,
            action,
            review.id,
            review.user_id
        );
        return Err(ApiError::forbidden(format!(
            "You are not authorized to {} this review",
            action
        )));
    }
    Ok(review)
}

/// PUT /reviews/:id - replace rating and comment of one's own review
pub async fn review_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<Review> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let (rating, comment) = payload.validate()?;

    let review = owned_review(&state, &user, &id, "update").await?;
    let updated = state
        .store
        .update_review(review.id, ReviewChanges { rating, comment })
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    Ok(ApiResponse::success(updated))
}

/// DELETE /reviews/:id - remove one's own review
pub async fn review_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<DeletedReview> {
    let Path(id) = id?;
    let review = owned_review(&state, &user, &id, "delete").await?;
    if !state.store.delete_review(review.id).await? {
        return Err(ApiError::not_found("Review not found"));
    }

    Ok(ApiResponse::success(DeletedReview { id: review.id }))
}
