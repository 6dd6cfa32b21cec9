use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{health, protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/register", post(public::register))
        .route("/login", post(public::login))
        .route("/books", get(public::book_list))
        .route("/books/:id", get(public::book_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/whoami", get(protected::whoami))
        .route("/books", post(protected::book_create))
        .route("/books/:id/reviews", post(protected::review_create))
        .route(
            "/reviews/:id",
            put(protected::review_update).delete(protected::review_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// With CORS disabled the layer allows no origins, so browsers keep the
/// same-origin policy.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
