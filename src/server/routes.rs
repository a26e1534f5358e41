use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use super::handlers::{chat, explain_upload, health, mind_map, root};
use super::SharedState;
use crate::config::ServerConfig;

/// Room for multipart boundaries and text fields on top of the file itself
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the application router with all routes and middleware
pub fn router(state: SharedState) -> Router {
    let body_limit = state
        .config
        .server
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);
    let cors = cors_layer(&state.config.server);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Virtual Professor
        .route("/chat", post(chat))
        .route("/gemini", post(explain_upload))
        // Concept visualizer
        .route("/mindmap", post(mind_map))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors),
        )
        .with_state(state)
}

/// CORS policy from configuration.
///
/// `*` allows any origin without credentials; an explicit origin list allows
/// credentials and mirrors requested headers.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
