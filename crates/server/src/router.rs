use super::{handlers, state::AppState};
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/api/vector-search", get(handlers::vector_search_handler))
        .route(
            "/api/vector-search-with-lexicon",
            get(handlers::lexicon_search_handler),
        )
        .route("/api/verse", get(handlers::verse_handler))
        .route("/api/lexicon/{strongs_id}", get(handlers::lexicon_handler))
        .route("/api/translations", get(handlers::translations_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
