//! Static file serving.
//!
//! ## Endpoints
//!
//! - `GET /images/{path}` - Raw bytes from the images directory
//! - `GET /videos/{path}` - Raw bytes from the videos directory
//!
//! `ServeDir` infers the content type from the extension and handles
//! `Last-Modified`, conditional requests, range requests and 404s. Responses
//! also carry `Cache-Control: public, max-age={from config}`.

use axum::http::{header, HeaderValue};
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    set_header::{SetResponseHeader, SetResponseHeaderLayer},
};

use crate::models::AssetKind;
use crate::state::AppState;

/// Static file service for one asset kind
pub fn static_files(
    state: &AppState,
    kind: AssetKind,
) -> SetResponseHeader<ServeDir, HeaderValue> {
    ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            state.cache_control.clone(),
        ))
        .service(ServeDir::new(state.store(kind).dir()))
}
