use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use http::{header, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub const PROJECTION_PREFIX: &str = "/api/projections/modules";

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.config().server.cors_origin);

    Router::new()
        .route("/health", get(handlers::health))
        .nest(PROJECTION_PREFIX, projection_routes())
        .route(&format!("{}/", PROJECTION_PREFIX), get(handlers::list_analyses))
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::route_not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

fn projection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_analyses))
        .route("/analyze", post(handlers::analyze_modules))
        .route("/validate", post(handlers::validate_architecture))
        .route(
            "/{analysis_id}",
            get(handlers::get_analysis).delete(handlers::delete_analysis),
        )
        .route("/{analysis_id}/export", get(handlers::export_analysis))
}

/// `*` allows any origin; anything else must be a single exact origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(origin.trim()) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                warn!(origin, error = %e, "Invalid CORS origin, allowing any origin");
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
