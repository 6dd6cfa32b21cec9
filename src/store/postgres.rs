use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    Book, BookQuery, NewBook, NewReview, NewUser, Review, ReviewChanges, User,
};
use crate::database::{DatabaseError, DatabaseManager, Repository};
use crate::filter::FilterData;

use super::Store;

// Named in sql/schema.sql.
const USER_FK: &str = "reviews_user_id_fkey";

/// PostgreSQL-backed store.
///
/// Reads go through [`Repository`] and the filter layer; writes are plain
/// statements so uniqueness can be settled with `ON CONFLICT`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn users(&self) -> Repository<User> {
        Repository::new("users", self.pool.clone())
    }

    fn books(&self) -> Repository<Book> {
        Repository::new("books", self.pool.clone())
    }

    fn reviews(&self) -> Repository<Review> {
        Repository::new("reviews", self.pool.clone())
    }
}

fn book_filter(query: &BookQuery) -> FilterData {
    let mut filter = FilterData::new();
    if let Some(author) = query.author.as_deref() {
        filter = filter.where_contains("author", author);
    }
    if let Some(genre) = query.genre.as_deref() {
        filter = filter.where_contains("genre", genre);
    }
    filter
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let user = new_user.into_user();
        let inserted = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password, name, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (email) DO NOTHING \
             RETURNING *",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(user.created_at)
        .fetch_optional(&self.pool)
        .await?;

        inserted.ok_or_else(|| {
            DatabaseError::Conflict(format!("user with email '{}' already exists", user.email))
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.users()
            .select_one(FilterData::new().where_eq("email", email))
            .await
    }

    async fn create_book(&self, new_book: NewBook) -> Result<Book, DatabaseError> {
        let book = new_book.into_book();
        let inserted = sqlx::query_as::<_, Book>(
            "INSERT INTO books (id, title, author, genre, description, published, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(&book.description)
        .bind(book.published)
        .bind(book.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn count_books(&self, query: &BookQuery) -> Result<i64, DatabaseError> {
        self.books().count(book_filter(query)).await
    }

    async fn list_books(
        &self,
        query: &BookQuery,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Book>, DatabaseError> {
        let filter = book_filter(query)
            .order("created_at desc, id asc")
            .limit(limit, Some(offset));
        self.books().select_any(filter).await
    }

    async fn find_book(&self, id: Uuid) -> Result<Option<Book>, DatabaseError> {
        self.books().select_one(FilterData::new().where_eq("id", id)).await
    }

    async fn list_reviews_for_book(&self, book_id: Uuid) -> Result<Vec<Review>, DatabaseError> {
        let filter = FilterData::new()
            .where_eq("book_id", book_id)
            .order("created_at asc, id asc");
        self.reviews().select_any(filter).await
    }

    async fn create_review(&self, new_review: NewReview) -> Result<Review, DatabaseError> {
        let review = new_review.into_review();
        let result = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (id, book_id, user_id, rating, comment, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (book_id, user_id) DO NOTHING \
             RETURNING *",
        )
        .bind(review.id)
        .bind(review.book_id)
        .bind(review.user_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.created_at)
        .bind(review.updated_at)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(inserted)) => Ok(inserted),
            Ok(None) => Err(DatabaseError::Conflict(
                "user has already reviewed this book".to_string(),
            )),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                match db_err.constraint() {
                    Some(USER_FK) => Err(DatabaseError::MissingUser(review.user_id)),
                    _ => Err(DatabaseError::MissingBook(review.book_id)),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_review(&self, id: Uuid) -> Result<Option<Review>, DatabaseError> {
        self.reviews().select_one(FilterData::new().where_eq("id", id)).await
    }

    async fn update_review(
        &self,
        id: Uuid,
        changes: ReviewChanges,
    ) -> Result<Option<Review>, DatabaseError> {
        let updated = sqlx::query_as::<_, Review>(
            "UPDATE reviews SET rating = $2, comment = $3, updated_at = $4 \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(changes.rating)
        .bind(&changes.comment)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
