//! # Media Asset Server
//!
//! A minimal image and video server: list, upload and delete files in two
//! directories on local disk, and serve them statically over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                    HTTP Server                     │
//! │  ┌──────────────┐ ┌──────────────┐ ┌───────────┐  │
//! │  │ /api/images  │ │ /images/*    │ │ /health   │  │
//! │  │ /api/videos  │ │ /videos/*    │ │           │  │
//! │  └──────────────┘ └──────────────┘ └───────────┘  │
//! ├───────────────────────────────────────────────────┤
//! │        Storage Service (one store per kind)        │
//! ├───────────────────────────────────────────────────┤
//! │          images/ directory   videos/ directory     │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server
//! cargo run --release
//!
//! # Upload an image
//! curl -X POST http://localhost:3000/api/images -F "image=@cat.png"
//!
//! # Get the image
//! curl http://localhost:3000/images/cat.png
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::AssetKind;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Run the media asset server with the given configuration.
///
/// Serves until Ctrl-C or SIGTERM, then drains in-flight requests.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let address = config.server.bind_address();

    let state = AppState::new(config).await?;
    let app = create_router(state.clone());

    let listener = TcpListener::bind(&address).await?;

    info!(
        address = %listener.local_addr()?,
        images = %state.store(AssetKind::Image).dir().display(),
        videos = %state.store(AssetKind::Video).dir().display(),
        cors_origin = %state.config.server.cors_origin,
        "Media asset server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    // Only the configured frontend may call the API cross-origin
    let cors = CorsLayer::new()
        .allow_origin(state.cors_origin.clone())
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE]);

    // Replaces axum's 2 MB default; overflow surfaces as a multipart error
    let body_limit = DefaultBodyLimit::max(state.max_upload_size());

    let mut router = Router::new().nest("/health", handlers::health_routes());

    for kind in AssetKind::ALL {
        router = router
            .nest(kind.api_prefix(), handlers::asset_routes(kind))
            .nest_service(kind.static_prefix(), handlers::static_files(&state, kind));
    }

    router
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve once Ctrl-C or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received termination signal, shutting down");
}
