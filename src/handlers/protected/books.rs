// handlers/protected/books.rs - POST /books and POST /books/:id/reviews

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::api::validation::FieldErrors;
use crate::database::models::{Book, NewBook, NewReview, Review};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::handlers::public::books::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
}

/// Body of review create and update.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: Option<Value>,
    pub comment: Option<String>,
}

impl ReviewRequest {
    pub fn validate(&self) -> Result<(i32, String), ApiError> {
        let mut errors = FieldErrors::new();
        let rating = errors.rating("rating", self.rating.as_ref());
        let comment = errors.required("comment", self.comment.as_deref());
        errors.finish()?;
        Ok((rating, comment))
    }
}

/// POST /books - add a book to the catalogue
pub async fn book_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> ApiResult<Book> {
    let Json(payload) = payload?;

    let mut errors = FieldErrors::new();
    let title = errors.required("title", payload.title.as_deref());
    let author = errors.required("author", payload.author.as_deref());
    let genre = errors.required("genre", payload.genre.as_deref());
    let description = errors.required("description", payload.description.as_deref());
    let published = errors.date("published", payload.published.as_deref());
    errors.finish()?;

    let Some(published) = published else {
        return Err(ApiError::validation_error("Invalid field values", None));
    };

    let book = state
        .store
        .create_book(NewBook {
            title,
            author,
            genre,
            description,
            published,
        })
        .await?;
    tracing::info!("User {} added book {}", user.user_id, book.id);

    Ok(ApiResponse::created(book))
}

/// POST /books/:id/reviews - review a book, once per user
pub async fn review_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<Review> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let (rating, comment) = payload.validate()?;

    let book_id = parse_id(&id).ok_or_else(|| ApiError::not_found("Book not found"))?;
    if state.store.find_book(book_id).await?.is_none() {
        return Err(ApiError::not_found("Book not found"));
    }

    let review = state
        .store
        .create_review(NewReview {
            book_id,
            user_id: user.user_id,
            rating,
            comment,
        })
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => {
                tracing::warn!("User {} tried to review book {} twice", user.user_id, book_id);
                ApiError::conflict("You have already reviewed this book")
            }
            other => ApiError::from(other),
        })?;

    Ok(ApiResponse::created(review))
}
