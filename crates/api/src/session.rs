//! Cookie-backed session state and flash messages.
//!
//! Everything lives in signed cookies: the selected member name, the admin
//! flag and a queue of one-shot flash messages. Tampered cookies fail the
//! signature check and read as absent.

use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

/// Cookie holding the selected member name.
pub const MEMBER_COOKIE: &str = "famfeed_member";
/// Cookie present while the admin PIN has been entered.
pub const ADMIN_COOKIE: &str = "famfeed_admin";
/// Cookie holding pending flash messages as JSON.
pub const FLASH_COOKIE: &str = "famfeed_flash";

/// Pending flashes kept per session; older ones are dropped first.
pub const MAX_PENDING_FLASHES: usize = 5;
/// Longest flash message in bytes, so the queue fits in one cookie.
pub const MAX_FLASH_BYTES: usize = 200;

/// Derive the cookie signing key from the configured secret.
#[must_use]
pub fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Session summary exposed to views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub member: Option<String>,
    pub is_admin: bool,
}

impl SessionView {
    #[must_use]
    pub fn from_jar(jar: &SignedCookieJar) -> Self {
        Self {
            member: current_member(jar),
            is_admin: is_admin(jar),
        }
    }
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Name of the selected member, if any.
#[must_use]
pub fn current_member(jar: &SignedCookieJar) -> Option<String> {
    jar.get(MEMBER_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|name| !name.is_empty())
}

#[must_use]
pub fn login_member(jar: SignedCookieJar, name: &str) -> SignedCookieJar {
    jar.add(session_cookie(MEMBER_COOKIE, name.to_string()))
}

#[must_use]
pub fn logout_member(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(removal(MEMBER_COOKIE))
}

/// Whether the admin PIN has been entered in this session.
#[must_use]
pub fn is_admin(jar: &SignedCookieJar) -> bool {
    jar.get(ADMIN_COOKIE).is_some_and(|c| c.value() == "1")
}

#[must_use]
pub fn login_admin(jar: SignedCookieJar) -> SignedCookieJar {
    jar.add(session_cookie(ADMIN_COOKIE, "1".to_string()))
}

#[must_use]
pub fn logout_admin(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(removal(ADMIN_COOKIE))
}

fn pending_flashes(jar: &SignedCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}

fn truncate_message(mut message: String) -> String {
    const ELLIPSIS: char = '…';
    if message.len() > MAX_FLASH_BYTES {
        let limit = MAX_FLASH_BYTES - ELLIPSIS.len_utf8();
        let cut = message
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= limit)
            .last()
            .unwrap_or(0);
        message.truncate(cut);
        message.push(ELLIPSIS);
    }
    message
}

/// Queue a flash message for the next page.
#[must_use]
pub fn push_flash(
    jar: SignedCookieJar,
    level: FlashLevel,
    message: impl Into<String>,
) -> SignedCookieJar {
    let mut flashes = pending_flashes(&jar);
    flashes.push(Flash {
        level,
        message: truncate_message(message.into()),
    });
    if flashes.len() > MAX_PENDING_FLASHES {
        flashes.drain(..flashes.len() - MAX_PENDING_FLASHES);
    }

    match serde_json::to_string(&flashes) {
        Ok(value) => jar.add(session_cookie(FLASH_COOKIE, value)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode flash messages");
            jar
        }
    }
}

/// Remove and return all pending flash messages.
#[must_use]
pub fn take_flashes(jar: SignedCookieJar) -> (SignedCookieJar, Vec<Flash>) {
    let flashes = pending_flashes(&jar);
    if flashes.is_empty() {
        return (jar, flashes);
    }
    (jar.remove(removal(FLASH_COOKIE)), flashes)
}
