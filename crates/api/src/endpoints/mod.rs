//! HTTP endpoints.

mod auth;
mod feed;
mod members;
mod setup;

use axum::Router;

use crate::middleware::AppState;

pub use feed::PostResponse;
pub use members::MemberResponse;

/// Create the page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(setup::router())
        .merge(auth::router())
        .merge(feed::router())
        .nest("/members", members::router())
}
