pub mod book;
pub mod review;
pub mod user;

pub use book::{Book, BookDetail, BookQuery, NewBook};
pub use review::{NewReview, Review, ReviewChanges};
pub use user::{NewUser, User};
