//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{SignedCookieJar, cookie::Key};
use famfeed_db::entities::family_member;

use crate::middleware::AppState;
use crate::response::{redirect, redirect_error};
use crate::session;

async fn cookie_jar(parts: &mut Parts, state: &AppState) -> SignedCookieJar {
    match SignedCookieJar::<Key>::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(never) => match never {},
    }
}

/// Passes only once first-run setup is complete; otherwise redirects to `/setup`.
#[derive(Debug, Clone, Copy)]
pub struct SetupDone;

impl FromRequestParts<AppState> for SetupDone {
    type Rejection = Response;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        match state.setup_service.is_setup_done().await {
            Ok(true) => Ok(Self),
            Ok(false) => Err(Redirect::to("/setup").into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}

/// The family member selected in this session.
///
/// The name must still be on the roster; a stale name is cleared and the
/// visitor is sent back to `/login`.
#[derive(Debug, Clone)]
pub struct CurrentMember(pub family_member::Model);

impl FromRequestParts<AppState> for CurrentMember {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        let jar = cookie_jar(parts, state).await;

        let Some(name) = session::current_member(&jar) else {
            return Err(redirect(jar, "/login"));
        };

        match state.member_service.find_by_name(&name).await {
            Ok(Some(member)) => Ok(Self(member)),
            Ok(None) => {
                tracing::debug!(name = %name, "Session member no longer exists");
                Err(redirect(session::logout_member(jar), "/login"))
            }
            Err(e) => Err(e.into_response()),
        }
    }
}

/// Proof that the admin PIN was entered in this session.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        let jar = cookie_jar(parts, state).await;

        if session::is_admin(&jar) {
            Ok(Self)
        } else {
            Err(redirect_error(
                jar,
                "/admin_login",
                "Please enter the admin PIN first.",
            ))
        }
    }
}
