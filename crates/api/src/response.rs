//! Page rendering and redirect helpers.

use axum::{
    Json,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use famfeed_common::{AppError, AppResult};
use serde::Serialize;

use crate::middleware::AppState;
use crate::session::{self, Flash, FlashLevel, SessionView};

/// Everything a view needs to draw one page.
#[derive(Debug, Serialize)]
pub struct Page {
    /// View name, e.g. `index` or `members`.
    pub view: &'static str,
    pub flashes: Vec<Flash>,
    pub session: SessionView,
    /// View specific context.
    pub data: serde_json::Value,
}

/// Turns a [`Page`] into a response.
///
/// Templates are an implementation of this trait; the default renders JSON.
pub trait Renderer: Send + Sync {
    fn render(&self, page: &Page) -> Response;
}

/// Renders pages as JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, page: &Page) -> Response {
        Json(page).into_response()
    }
}

/// Render `view` with `data`, consuming pending flashes.
pub fn render_page<T: Serialize>(
    state: &AppState,
    jar: SignedCookieJar,
    view: &'static str,
    data: T,
) -> AppResult<Response> {
    let data = serde_json::to_value(data).map_err(|e| AppError::Internal(e.to_string()))?;
    let (jar, flashes) = session::take_flashes(jar);
    let page = Page {
        view,
        flashes,
        session: SessionView::from_jar(&jar),
        data,
    };
    Ok((jar, state.renderer.render(&page)).into_response())
}

/// Redirect, persisting any cookie changes.
pub fn redirect(jar: SignedCookieJar, to: &str) -> Response {
    (jar, Redirect::to(to)).into_response()
}

/// Redirect with a success flash.
pub fn redirect_success(jar: SignedCookieJar, to: &str, message: impl Into<String>) -> Response {
    redirect(session::push_flash(jar, FlashLevel::Success, message), to)
}

/// Redirect with an error flash.
pub fn redirect_error(jar: SignedCookieJar, to: &str, message: impl Into<String>) -> Response {
    redirect(session::push_flash(jar, FlashLevel::Error, message), to)
}

/// Turn a failed operation into a response.
///
/// Missing records and server failures keep their status; everything else
/// becomes an error flash on `back_to`.
pub fn recover(jar: SignedCookieJar, err: AppError, back_to: &str) -> Response {
    match err {
        AppError::NotFound(_) => err.into_response(),
        e if e.is_server_error() => e.into_response(),
        e => {
            tracing::debug!(error = %e, back_to = back_to, "Request rejected");
            redirect_error(jar, back_to, e.user_message())
        }
    }
}
