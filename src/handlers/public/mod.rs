// handlers/public/mod.rs - Endpoints reachable without a token
pub mod auth;
pub mod books;

pub use auth::{login, register};
pub use books::{book_get, book_list};
