// handlers/public/books.rs - GET /books and GET /books/:id

use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::pagination::{PageParams, PageRequest, Pagination};
use crate::database::models::{Book, BookDetail, BookQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BookFilterParams {
    pub author: Option<String>,
    pub genre: Option<String>,
}

impl BookFilterParams {
    fn into_query(self) -> BookQuery {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        BookQuery {
            author: non_blank(self.author),
            genre: non_blank(self.genre),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub pagination: Pagination,
}

/// GET /books?page=&limit=&author=&genre= - newest books first
///
/// An empty match set is a normal 200 with no books; asking for a page past
/// the last one is a 404.
pub async fn book_list(
    State(state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
    filter: Result<Query<BookFilterParams>, QueryRejection>,
) -> ApiResult<BookPage> {
    let Query(page) = page?;
    let Query(filter) = filter?;
    let request = PageRequest::from_params(&page, &state.config.api);
    let query = filter.into_query();

    let total = state.store.count_books(&query).await?;
    let pagination = Pagination::new(total, request);
    if pagination.is_out_of_range() {
        return Err(ApiError::not_found(format!(
            "Page {} is out of range ({} pages)",
            pagination.current_page, pagination.total_pages
        )));
    }

    let books = if total == 0 {
        Vec::new()
    } else {
        state
            .store
            .list_books(&query, request.offset(), request.limit as i64)
            .await?
    };

    Ok(ApiResponse::success(BookPage { books, pagination }))
}

/// GET /books/:id - one book with its reviews, oldest review first
pub async fn book_get(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<BookDetail> {
    let Path(id) = id?;
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("Book not found"))?;

    let book = state
        .store
        .find_book(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;
    let reviews = state.store.list_reviews_for_book(book.id).await?;

    Ok(ApiResponse::success(BookDetail { book, reviews }))
}

/// Path ids that are not UUIDs cannot name a row.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_ignored() {
        let query = BookFilterParams {
            author: Some("  ".to_string()),
            genre: Some("Fantasy".to_string()),
        }
        .into_query();
        assert_eq!(query.author, None);
        assert_eq!(query.genre.as_deref(), Some("Fantasy"));
    }

    #[test]
    fn non_uuid_ids_are_rejected() {
        assert!(parse_id("42").is_none());
        assert!(parse_id(&Uuid::new_v4().to_string()).is_some());
    }
}
