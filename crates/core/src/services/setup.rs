//! First-run setup.

use famfeed_common::{AppError, AppResult};
use famfeed_db::{entities::family_member, repositories::SettingsRepository};
use tracing::info;

use super::member::normalize_member_name;

/// Split the comma separated setup field into member names.
///
/// Entries are trimmed, blanks dropped and repeats collapsed so the first
/// occurrence wins.
#[must_use]
pub fn parse_member_names(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Service deciding whether the instance is configured, and configuring it.
#[derive(Clone)]
pub struct SetupService {
    settings_repo: SettingsRepository,
}

impl SetupService {
    /// Create a new setup service.
    #[must_use]
    pub const fn new(settings_repo: SettingsRepository) -> Self {
        Self { settings_repo }
    }

    /// Whether setup has been completed.
    pub async fn is_setup_done(&self) -> AppResult<bool> {
        self.settings_repo.is_setup_done().await
    }

    /// Create the initial roster from the raw form field and mark setup done.
    pub async fn complete(&self, raw_names: &str) -> AppResult<Vec<family_member::Model>> {
        if self.settings_repo.is_setup_done().await? {
            return Err(AppError::Conflict(
                "Setup has already been completed.".to_string(),
            ));
        }

        let names = parse_member_names(raw_names)
            .iter()
            .map(|name| normalize_member_name(name))
            .collect::<AppResult<Vec<_>>>()?;

        if names.is_empty() {
            return Err(AppError::Validation(
                "Please enter at least one family member name.".to_string(),
            ));
        }

        let members = self.settings_repo.complete_setup(&names).await?;

        info!(members = members.len(), "Setup completed");
        Ok(members)
    }
}
