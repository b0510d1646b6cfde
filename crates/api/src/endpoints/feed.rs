//! Daily feed, uploads and calendar endpoints.

use axum::{
    Router,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::SignedCookieJar;
use chrono::NaiveDate;
use famfeed_common::{AppError, AppResult};
use famfeed_core::{CreatePostInput, PostService};
use famfeed_db::entities::post;
use serde::Serialize;

use crate::{
    extractors::{CurrentMember, SetupDone},
    middleware::AppState,
    response::{recover, redirect, redirect_success, render_page},
};

/// Post response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i32,
    pub author: String,
    pub content: Option<String>,
    pub media_type: Option<String>,
    pub media_url: Option<String>,
    pub created_at: String,
    pub date: NaiveDate,
    /// Whether the viewing member may delete this post.
    pub is_own: bool,
}

impl PostResponse {
    fn new(p: post::Model, posts: &PostService, viewer: &str) -> Self {
        Self {
            id: p.id,
            is_own: p.author == viewer,
            media_url: p.media_path.as_deref().map(|path| posts.media_url(path)),
            author: p.author,
            content: p.content,
            media_type: p.media_type,
            created_at: p.created_at.to_rfc3339(),
            date: p.date,
        }
    }
}

#[derive(Serialize)]
struct FeedView {
    date: NaiveDate,
    today: NaiveDate,
    posts: Vec<PostResponse>,
}

async fn render_feed(
    state: &AppState,
    jar: SignedCookieJar,
    viewer: &str,
    date: NaiveDate,
) -> AppResult<Response> {
    let posts = state.post_service.feed_for(date).await?;
    let view = FeedView {
        date,
        today: state.post_service.today(),
        posts: posts
            .into_iter()
            .map(|p| PostResponse::new(p, &state.post_service, viewer))
            .collect(),
    };
    render_page(state, jar, "index", view)
}

async fn index(
    _setup: SetupDone,
    CurrentMember(member): CurrentMember,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<Response> {
    let today = state.post_service.today();
    render_feed(&state, jar, &member.name, today).await
}

async fn date_feed(
    _setup: SetupDone,
    CurrentMember(member): CurrentMember,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(raw_date): Path<String>,
) -> AppResult<Response> {
    let Ok(date) = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d") else {
        return Ok(redirect(jar, "/"));
    };
    render_feed(&state, jar, &member.name, date).await
}

async fn calendar(
    _setup: SetupDone,
    CurrentMember(_member): CurrentMember,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<Response> {
    let view = state.post_service.calendar().await?;
    render_page(&state, jar, "calendar", view)
}

fn multipart_failure(jar: SignedCookieJar, err: &MultipartError) -> Response {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return (StatusCode::PAYLOAD_TOO_LARGE, "Upload too large").into_response();
    }
    recover(jar, AppError::BadRequest(err.body_text()), "/")
}

async fn create_post(
    CurrentMember(member): CurrentMember,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut multipart: Multipart,
) -> Response {
    let mut input = CreatePostInput::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_failure(jar, &e),
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "content" => match field.text().await {
                Ok(text) => input.content = Some(text),
                Err(e) => return multipart_failure(jar, &e),
            },
            "media" => {
                input.file_name = field.file_name().map(ToString::to_string);
                match field.bytes().await {
                    Ok(bytes) => input.data = bytes.to_vec(),
                    Err(e) => return multipart_failure(jar, &e),
                }
            }
            // The author always comes from the session.
            _ => {}
        }
    }

    match state.post_service.create_post(&member.name, input).await {
        Ok(_) => redirect_success(jar, "/", "Photo shared!"),
        Err(e) => recover(jar, e, "/"),
    }
}

async fn delete_post(
    CurrentMember(member): CurrentMember,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
) -> Response {
    let back_to = match state.post_service.get(id).await {
        Ok(post) => format!("/date/{}", post.date),
        Err(e) => return recover(jar, e, "/"),
    };

    match state.post_service.delete_post(&member.name, id).await {
        Ok(_) => redirect_success(jar, &back_to, "Post deleted."),
        Err(e) => recover(jar, e, &back_to),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/date/{date}", get(date_feed))
        .route("/calendar", get(calendar))
        .route("/post", post(create_post))
        .route("/delete/{id}", post(delete_post))
}
