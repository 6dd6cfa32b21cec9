// handlers/protected/mod.rs - Endpoints behind jwt_auth_middleware
//
// Every handler here can rely on an AuthUser request extension.
pub mod auth;
pub mod books;
pub mod reviews;

pub use auth::whoami;
pub use books::{book_create, review_create};
pub use reviews::{review_delete, review_update};
