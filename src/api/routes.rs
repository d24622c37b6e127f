use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers::*;
use super::state::AppState;

/// JSON bodies up to 50MB
const JSON_BODY_LIMIT: usize = 50 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let policy = state.upload_policy;
    let upload_limit = policy.max_file_size * policy.max_files + 1024 * 1024;

    let spots = Router::new()
        .route("/api/spots", get(list_spots).post(create_spot))
        .route(
            "/api/spots/:id",
            get(get_spot).put(update_spot).delete(delete_spot),
        )
        .route("/api/spots-minimal", get(list_spots_minimal))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_store));

    let frontend = ServeDir::new(state.static_dir.as_path())
        .fallback(ServeFile::new(state.static_dir.join("index.html")));

    Router::new()
        .merge(spots)
        .route(
            "/api/upload",
            post(upload_photos).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/parse-coordinates", post(parse_coordinates_handler))
        .route("/api/health", get(health))
        .route("/api/test", get(store_test))
        .route("/api", get(api_info))
        .nest_service("/uploads", ServeDir::new(state.uploads_dir.as_path()))
        .fallback_service(frontend)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
