//! HTTP layer for famfeed.
//!
//! - **Endpoints**: setup, member selection, the daily feed and member admin
//! - **Extractors**: setup gate, current member and admin session
//! - **Sessions**: signed cookies carrying identity and flash messages
//! - **Rendering**: pages go through a pluggable [`Renderer`]
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod session;

use std::path::Path;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};

pub use endpoints::router;
pub use middleware::AppState;
pub use response::{JsonRenderer, Page, Renderer};

/// Build the complete application: pages, uploaded media and the upload limit.
pub fn app(state: AppState, uploads_dir: &Path, max_upload_bytes: usize) -> Router {
    router()
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(state)
}
