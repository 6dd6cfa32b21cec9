//! Persistence gateway shared by the handlers.
//!
//! Both implementations enforce the uniqueness rules themselves (user email,
//! one review per book and user) so callers never need a check-then-create.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::{
    Book, BookQuery, NewBook, NewReview, NewUser, Review, ReviewChanges, User,
};
use crate::database::{DatabaseError, DatabaseManager};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] when the email is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn create_book(&self, new_book: NewBook) -> Result<Book, DatabaseError>;

    async fn count_books(&self, query: &BookQuery) -> Result<i64, DatabaseError>;

    /// Newest first.
    async fn list_books(
        &self,
        query: &BookQuery,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Book>, DatabaseError>;

    async fn find_book(&self, id: Uuid) -> Result<Option<Book>, DatabaseError>;

    /// Oldest first.
    async fn list_reviews_for_book(&self, book_id: Uuid) -> Result<Vec<Review>, DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] when the user already reviewed
    /// the book, [`DatabaseError::MissingBook`] when the book is gone and
    /// [`DatabaseError::MissingUser`] when the author is.
    async fn create_review(&self, new_review: NewReview) -> Result<Review, DatabaseError>;

    async fn find_review(&self, id: Uuid) -> Result<Option<Review>, DatabaseError>;

    async fn update_review(
        &self,
        id: Uuid,
        changes: ReviewChanges,
    ) -> Result<Option<Review>, DatabaseError>;

    /// Returns `false` when nothing was deleted.
    async fn delete_review(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

/// Pick the backend for this configuration: PostgreSQL when a database URL
/// is set, otherwise the in-memory store.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn Store>, DatabaseError> {
    if config.database.url.is_none() {
        tracing::warn!(
            "DATABASE_URL not set; using the in-memory store, data will not survive a restart"
        );
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::ensure_schema(&pool).await?;
    Ok(Arc::new(PgStore::new(pool)))
}
