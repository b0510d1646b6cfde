//! Family member repository.

use std::sync::Arc;

use crate::entities::{FamilyMember, Post, family_member, post};
use crate::map_db_err;
use famfeed_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

/// Family member repository for database operations.
#[derive(Clone)]
pub struct FamilyMemberRepository {
    db: Arc<DatabaseConnection>,
}

impl FamilyMemberRepository {
    /// Create a new family member repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a member by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<family_member::Model>> {
        FamilyMember::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a member by ID, returning `NotFound` if missing.
    pub async fn get_by_id(&self, id: i32) -> AppResult<family_member::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {id} not found")))
    }

    /// Find a member by exact name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<family_member::Model>> {
        FamilyMember::find()
            .filter(family_member::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All members ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<family_member::Model>> {
        FamilyMember::find()
            .order_by_asc(family_member::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a member. A taken name yields `AppError::Conflict`.
    pub async fn create(&self, name: &str) -> AppResult<family_member::Model> {
        family_member::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)
    }

    /// Rename a member and rewrite the author of every post they wrote.
    ///
    /// Both writes happen in one transaction; if either fails nothing changes.
    /// Returns the updated member and the number of posts rewritten.
    pub async fn rename(
        &self,
        id: i32,
        new_name: &str,
    ) -> AppResult<(family_member::Model, u64)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let member = FamilyMember::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Member {id} not found")))?;
        let old_name = member.name.clone();

        let mut active: family_member::ActiveModel = member.into();
        active.name = Set(new_name.to_string());
        let updated = active.update(&txn).await.map_err(map_db_err)?;

        let rewritten = Post::update_many()
            .col_expr(post::Column::Author, Expr::value(new_name))
            .filter(post::Column::Author.eq(old_name.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .rows_affected;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((updated, rewritten))
    }

    /// Delete a member. Posts keep their author text. Returns whether a row was removed.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let res = FamilyMember::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_member(id: i32, name: &str) -> family_member::Model {
        family_member::Model {
            id,
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_name_returns_member() {
        let member = create_test_member(1, "Grandma");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[member.clone()]])
                .into_connection(),
        );

        let repo = FamilyMemberRepository::new(db);
        let found = repo.find_by_name("Grandma").await.unwrap();

        assert_eq!(found, Some(member));
    }

    #[tokio::test]
    async fn test_find_all_returns_roster() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[
                    create_test_member(2, "Dad"),
                    create_test_member(1, "Mom"),
                ]])
                .into_connection(),
        );

        let repo = FamilyMemberRepository::new(db);
        let members = repo.find_all().await.unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Dad");
    }

    #[tokio::test]
    async fn test_rename_missing_member_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([Vec::<family_member::Model>::new()])
                .into_connection(),
        );

        let repo = FamilyMemberRepository::new(db);
        let result = repo.rename(5, "Nana").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_returns_true_when_removed() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FamilyMemberRepository::new(db);
        assert!(repo.delete(1).await.unwrap());
    }
}
