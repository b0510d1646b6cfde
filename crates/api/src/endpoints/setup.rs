//! First-run setup endpoints.

use axum::{
    Form, Router,
    extract::State,
    response::Response,
    routing::get,
};
use axum_extra::extract::SignedCookieJar;
use famfeed_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{
    middleware::AppState,
    response::{recover, redirect, redirect_success, render_page},
};

/// Setup form.
#[derive(Debug, Deserialize)]
pub struct SetupForm {
    /// Comma separated member names.
    #[serde(default)]
    pub names: String,
}

#[derive(Serialize)]
struct SetupView {}

async fn setup_page(State(state): State<AppState>, jar: SignedCookieJar) -> AppResult<Response> {
    if state.setup_service.is_setup_done().await? {
        return Ok(redirect(jar, "/login"));
    }
    render_page(&state, jar, "setup", SetupView {})
}

async fn submit_setup(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SetupForm>,
) -> Response {
    match state.setup_service.is_setup_done().await {
        Ok(true) => return redirect(jar, "/login"),
        Ok(false) => {}
        Err(e) => return recover(jar, e, "/setup"),
    }

    match state.setup_service.complete(&form.names).await {
        Ok(members) => redirect_success(
            jar,
            "/login",
            format!(
                "Setup complete! Added {} family member{}.",
                members.len(),
                if members.len() == 1 { "" } else { "s" }
            ),
        ),
        Err(e) => recover(jar, e, "/setup"),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/setup", get(setup_page).post(submit_setup))
}
