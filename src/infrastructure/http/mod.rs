pub mod request_id;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::controllers::{health, tts::TtsController};
use crate::domain::tts::TtsService;
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, X_REQUEST_ID};

/// Build the application router
pub fn create_router(tts_service: Arc<TtsService>, max_upload_bytes: usize) -> Router {
    let tts_controller = Arc::new(TtsController::new(tts_service.clone()));

    let tts_routes = Router::new()
        .route("/api/tts", post(TtsController::synthesize))
        .route("/api/tts-csv", post(TtsController::synthesize_csv))
        .with_state(tts_controller)
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    // Browsers need the disposition header to offer the right download name
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static(X_REQUEST_ID),
        ]);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(tts_service)
        .merge(tts_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_service: Arc<TtsService>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(tts_service, config.max_upload_bytes);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
