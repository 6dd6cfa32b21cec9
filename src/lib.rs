pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod routes;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use routes::app;
pub use state::AppState;
