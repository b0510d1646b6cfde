//! Member selection and admin PIN endpoints.

use axum::{
    Form, Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use axum_extra::extract::SignedCookieJar;
use famfeed_common::AppResult;
use serde::{Deserialize, Serialize};

use super::members::MemberResponse;
use crate::{
    extractors::SetupDone,
    middleware::AppState,
    response::{recover, redirect, redirect_error, redirect_success, render_page},
    session,
};

/// Admin login form.
#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    pub pin: String,
}

#[derive(Serialize)]
struct LoginView {
    members: Vec<MemberResponse>,
}

#[derive(Serialize)]
struct AdminLoginView {}

async fn login_page(
    _setup: SetupDone,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<Response> {
    let members = state.member_service.list().await?;
    render_page(
        &state,
        jar,
        "login",
        LoginView {
            members: members.into_iter().map(Into::into).collect(),
        },
    )
}

async fn select_member(
    _setup: SetupDone,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(name): Path<String>,
) -> Response {
    match state.member_service.find_by_name(&name).await {
        Ok(Some(member)) => {
            tracing::debug!(member_id = member.id, "Member selected");
            redirect(session::login_member(jar, &member.name), "/")
        }
        Ok(None) => redirect_error(jar, "/login", format!("\"{name}\" is not a family member.")),
        Err(e) => recover(jar, e, "/login"),
    }
}

async fn logout(jar: SignedCookieJar) -> Response {
    redirect(session::logout_member(jar), "/login")
}

async fn admin_login_page(State(state): State<AppState>, jar: SignedCookieJar) -> AppResult<Response> {
    render_page(&state, jar, "admin_login", AdminLoginView {})
}

async fn admin_login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<AdminLoginForm>,
) -> Response {
    if state.admin_pin_matches(&form.pin) {
        tracing::info!("Admin logged in");
        redirect_success(session::login_admin(jar), "/members", "Welcome, admin.")
    } else {
        tracing::warn!("Admin login failed");
        redirect_error(jar, "/admin_login", "Wrong PIN.")
    }
}

async fn admin_logout(jar: SignedCookieJar) -> Response {
    redirect(session::logout_admin(jar), "/")
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page))
        .route("/select_member/{name}", get(select_member))
        .route("/logout", get(logout))
        .route("/admin_login", get(admin_login_page).post(admin_login))
        .route("/admin_logout", get(admin_logout))
}
