//! Shared application state.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use famfeed_core::{MemberService, PostService, SetupService};
use sha2::{Digest, Sha256};

use crate::response::{JsonRenderer, Renderer};
use crate::session;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub setup_service: SetupService,
    pub member_service: MemberService,
    pub post_service: PostService,
    pub renderer: Arc<dyn Renderer>,
    cookie_key: Key,
    admin_pin: Arc<str>,
}

impl AppState {
    /// Build the state with the default JSON renderer.
    #[must_use]
    pub fn new(
        setup_service: SetupService,
        member_service: MemberService,
        post_service: PostService,
        secret: &str,
        admin_pin: &str,
    ) -> Self {
        Self {
            setup_service,
            member_service,
            post_service,
            renderer: Arc::new(JsonRenderer),
            cookie_key: session::cookie_key(secret),
            admin_pin: Arc::from(admin_pin),
        }
    }

    /// Swap the page renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Compare a submitted PIN with the configured one.
    ///
    /// Both sides are hashed first so the comparison time does not depend on
    /// how many leading characters match.
    #[must_use]
    pub fn admin_pin_matches(&self, submitted: &str) -> bool {
        let expected = Sha256::digest(self.admin_pin.as_bytes());
        let actual = Sha256::digest(submitted.as_bytes());
        expected
            .iter()
            .zip(actual.iter())
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
