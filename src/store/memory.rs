use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{
    Book, BookQuery, NewBook, NewReview, NewUser, Review, ReviewChanges, User,
};
use crate::database::DatabaseError;

use super::Store;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    // Insertion order; listing walks it backwards for newest first.
    books: Vec<Book>,
    reviews: Vec<Review>,
}

/// In-memory store for local development and tests.
///
/// All tables sit behind one lock, so the uniqueness checks and the insert
/// that follows them happen under the same write guard.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_query(book: &Book, query: &BookQuery) -> bool {
    let author_ok = query
        .author
        .as_deref()
        .map_or(true, |author| contains_ignore_case(&book.author, author));
    let genre_ok = query
        .genre
        .as_deref()
        .map_or(true, |genre| contains_ignore_case(&book.genre, genre));
    author_ok && genre_ok
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::Conflict(format!(
                "user with email '{}' already exists",
                new_user.email
            )));
        }
        let user = new_user.into_user();
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_book(&self, new_book: NewBook) -> Result<Book, DatabaseError> {
        let book = new_book.into_book();
        self.tables.write().await.books.push(book.clone());
        Ok(book)
    }

    async fn count_books(&self, query: &BookQuery) -> Result<i64, DatabaseError> {
        let tables = self.tables.read().await;
        let count = tables.books.iter().filter(|b| matches_query(b, query)).count();
        Ok(count as i64)
    }

    async fn list_books(
        &self,
        query: &BookQuery,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Book>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut books: Vec<Book> = tables
            .books
            .iter()
            .rev()
            .filter(|b| matches_query(b, query))
            .cloned()
            .collect();
        // Stable sort keeps insertion order for identical timestamps.
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(books
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn find_book(&self, id: Uuid) -> Result<Option<Book>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.books.iter().find(|b| b.id == id).cloned())
    }

    async fn list_reviews_for_book(&self, book_id: Uuid) -> Result<Vec<Review>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .iter()
            .filter(|r| r.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn create_review(&self, new_review: NewReview) -> Result<Review, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.books.iter().any(|b| b.id == new_review.book_id) {
            return Err(DatabaseError::MissingBook(new_review.book_id));
        }
        if !tables.users.iter().any(|u| u.id == new_review.user_id) {
            return Err(DatabaseError::MissingUser(new_review.user_id));
        }
        let duplicate = tables
            .reviews
            .iter()
            .any(|r| r.book_id == new_review.book_id && r.user_id == new_review.user_id);
        if duplicate {
            return Err(DatabaseError::Conflict(
                "user has already reviewed this book".to_string(),
            ));
        }
        let review = new_review.into_review();
        tables.reviews.push(review.clone());
        Ok(review)
    }

    async fn find_review(&self, id: Uuid) -> Result<Option<Review>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn update_review(
        &self,
        id: Uuid,
        changes: ReviewChanges,
    ) -> Result<Option<Review>, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.reviews.iter_mut().find(|r| r.id == id) {
            Some(review) => {
                review.rating = changes.rating;
                review.comment = changes.comment;
                review.updated_at = Utc::now();
                Ok(Some(review.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.reviews.len();
        tables.reviews.retain(|r| r.id != id);
        Ok(tables.reviews.len() != before)
    }
}
