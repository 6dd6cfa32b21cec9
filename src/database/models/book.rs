use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::review::Review;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub published: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub published: NaiveDate,
}

impl NewBook {
    pub fn into_book(self) -> Book {
        Book {
            id: Uuid::new_v4(),
            title: self.title,
            author: self.author,
            genre: self.genre,
            description: self.description,
            published: self.published,
            created_at: Utc::now(),
        }
    }
}

/// A book together with all of its reviews, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub reviews: Vec<Review>,
}

/// Optional list filters; both match case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    pub author: Option<String>,
    pub genre: Option<String>,
}
