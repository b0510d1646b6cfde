//! Settings repository.

use std::sync::Arc;

use crate::entities::{Settings, family_member, settings, settings::SETTINGS_ID};
use crate::map_db_err;
use famfeed_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};

fn already_done() -> AppError {
    AppError::Conflict("Setup has already been completed.".to_string())
}

/// Repository for the singleton settings row.
#[derive(Clone)]
pub struct SettingsRepository {
    db: Arc<DatabaseConnection>,
}

impl SettingsRepository {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the settings row.
    pub async fn find(&self) -> AppResult<Option<settings::Model>> {
        Settings::find_by_id(SETTINGS_ID)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether first-run setup has completed. A missing row means it has not.
    pub async fn is_setup_done(&self) -> AppResult<bool> {
        Ok(self.find().await?.is_some_and(|s| s.is_setup_done))
    }

    /// Insert the initial roster and mark setup as done, atomically.
    ///
    /// The flag is checked and flipped inside the transaction, so of two
    /// concurrent first runs only one commits its roster.
    pub async fn complete_setup(&self, names: &[String]) -> AppResult<Vec<family_member::Model>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = Settings::find_by_id(SETTINGS_ID)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if existing.as_ref().is_some_and(|s| s.is_setup_done) {
            return Err(already_done());
        }

        let now = chrono::Utc::now();
        let mut members = Vec::with_capacity(names.len());
        for name in names {
            let member = family_member::ActiveModel {
                name: Set(name.clone()),
                created_at: Set(now.into()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
            members.push(member);
        }

        if existing.is_some() {
            let flipped = Settings::update_many()
                .col_expr(settings::Column::IsSetupDone, Expr::value(true))
                .filter(settings::Column::Id.eq(SETTINGS_ID))
                .filter(settings::Column::IsSetupDone.eq(false))
                .exec(&txn)
                .await
                .map_err(map_db_err)?
                .rows_affected;
            if flipped == 0 {
                return Err(already_done());
            }
        } else {
            settings::ActiveModel {
                id: Set(SETTINGS_ID),
                is_setup_done: Set(true),
            }
            .insert(&txn)
            .await
            .map_err(|e| match map_db_err(e) {
                AppError::Conflict(_) => already_done(),
                other => other,
            })?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(members)
    }
}
