//! Member administration endpoints. All of them require the admin PIN.

use axum::{
    Form, Router,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};
use axum_extra::extract::SignedCookieJar;
use famfeed_common::AppResult;
use famfeed_db::entities::family_member;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AdminSession,
    middleware::AppState,
    response::{recover, redirect_success, render_page},
};

const MEMBERS_PAGE: &str = "/members";

/// Member response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: i32,
    pub name: String,
    pub created_at: String,
}

impl From<family_member::Model> for MemberResponse {
    fn from(m: family_member::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Add member form.
#[derive(Debug, Deserialize)]
pub struct AddMemberForm {
    #[serde(default)]
    pub name: String,
}

/// Rename member form.
#[derive(Debug, Deserialize)]
pub struct RenameMemberForm {
    #[serde(default)]
    pub new_name: String,
}

/// Roster entry on the admin page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MemberSummary {
    #[serde(flatten)]
    member: MemberResponse,
    post_count: u64,
}

#[derive(Serialize)]
struct MembersView {
    members: Vec<MemberSummary>,
}

async fn list_members(
    _admin: AdminSession,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<Response> {
    let mut members = Vec::new();
    for member in state.member_service.list().await? {
        let post_count = state.post_service.count_by_author(&member.name).await?;
        members.push(MemberSummary {
            member: member.into(),
            post_count,
        });
    }
    render_page(&state, jar, "members", MembersView { members })
}

async fn add_member(
    _admin: AdminSession,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<AddMemberForm>,
) -> Response {
    match state.member_service.add(&form.name).await {
        Ok(member) => redirect_success(
            jar,
            MEMBERS_PAGE,
            format!("Added {} to the family.", member.name),
        ),
        Err(e) => recover(jar, e, MEMBERS_PAGE),
    }
}

async fn rename_member(
    _admin: AdminSession,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
    Form(form): Form<RenameMemberForm>,
) -> Response {
    match state.member_service.rename(id, &form.new_name).await {
        Ok(member) => redirect_success(
            jar,
            MEMBERS_PAGE,
            format!("Renamed to {}.", member.name),
        ),
        Err(e) => recover(jar, e, MEMBERS_PAGE),
    }
}

async fn delete_member(
    _admin: AdminSession,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
) -> Response {
    match state.member_service.delete(id).await {
        Ok(member) => redirect_success(
            jar,
            MEMBERS_PAGE,
            format!("Removed {}. Their posts are kept.", member.name),
        ),
        Err(e) => recover(jar, e, MEMBERS_PAGE),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members))
        .route("/add", post(add_member))
        .route("/{id}/rename", post(rename_member))
        .route("/{id}/delete", post(delete_member))
}
