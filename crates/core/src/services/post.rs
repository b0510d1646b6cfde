//! Post feed, uploads and calendar.

use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;
use famfeed_common::{AppError, AppResult, IdGenerator, MediaStorage, image_extension};
use famfeed_db::{entities::post, repositories::PostRepository};
use sea_orm::Set;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct CreatePostInput {
    /// Caption; blank text is stored as no caption.
    pub content: Option<String>,
    /// Original name of the uploaded file, used only for its extension.
    pub file_name: Option<String>,
    /// Uploaded bytes.
    pub data: Vec<u8>,
}

/// Days with posts in the calendar window.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub today: NaiveDate,
    pub dates: Vec<NaiveDate>,
}

/// Service for the dated post feed.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    storage: MediaStorage,
    id_gen: IdGenerator,
    tz: Tz,
    calendar_days: u64,
}

impl PostService {
    /// Create a new post service.
    ///
    /// `tz` decides which calendar day "today" is; `calendar_days` is how far
    /// back the calendar looks.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        storage: MediaStorage,
        tz: Tz,
        calendar_days: u64,
    ) -> Self {
        Self {
            post_repo,
            storage,
            id_gen: IdGenerator::new(),
            tz,
            calendar_days,
        }
    }

    /// Current calendar day in the configured time zone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// Public URL of a stored media file.
    #[must_use]
    pub fn media_url(&self, media_path: &str) -> String {
        self.storage.public_url(media_path)
    }

    /// Get a post by ID.
    pub async fn get(&self, id: i32) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// Posts of one day, newest first.
    pub async fn feed_for(&self, date: NaiveDate) -> AppResult<Vec<post::Model>> {
        self.post_repo.find_by_date(date).await
    }

    /// Number of posts attributed to `author`.
    pub async fn count_by_author(&self, author: &str) -> AppResult<u64> {
        self.post_repo.count_by_author(author).await
    }

    /// Create a post for today authored by `author`.
    pub async fn create_post(
        &self,
        author: &str,
        input: CreatePostInput,
    ) -> AppResult<post::Model> {
        if author.trim().is_empty() {
            return Err(AppError::Unauthorized);
        }

        let file_name = input
            .file_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::Validation("Please choose a photo to upload.".to_string()))?;

        let extension = image_extension(file_name).ok_or_else(|| {
            AppError::Validation("Only PNG, JPG and GIF images can be uploaded.".to_string())
        })?;

        if input.data.is_empty() {
            return Err(AppError::Validation(
                "The uploaded file is empty.".to_string(),
            ));
        }

        let content = input
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let media_path = self.id_gen.media_file_name(&extension);
        self.storage.save(&media_path, &input.data).await?;

        let model = post::ActiveModel {
            author: Set(author.to_string()),
            content: Set(content),
            media_type: Set(Some(post::MEDIA_TYPE_IMAGE.to_string())),
            media_path: Set(Some(media_path.clone())),
            created_at: Set(Utc::now().into()),
            date: Set(self.today()),
            ..Default::default()
        };

        let created = match self.post_repo.create(model).await {
            Ok(created) => created,
            Err(e) => {
                // No row references the file, so it must not outlive the failure.
                if let Err(cleanup) = self.storage.delete(&media_path).await {
                    warn!(media_path = %media_path, error = %cleanup, "Failed to remove orphaned upload");
                }
                return Err(e);
            }
        };

        info!(
            post_id = created.id,
            author = %created.author,
            date = %created.date,
            "Post created"
        );
        Ok(created)
    }

    /// Delete a post on behalf of `requester`, who must be its author.
    ///
    /// Returns the deleted post so callers can redirect to its day.
    pub async fn delete_post(&self, requester: &str, id: i32) -> AppResult<post::Model> {
        let post = self.post_repo.get_by_id(id).await?;

        if post.author != requester {
            return Err(AppError::Forbidden(
                "You can only delete your own posts.".to_string(),
            ));
        }

        if !self.post_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Post {id} not found")));
        }

        if let Some(media_path) = post.media_path.as_deref()
            && let Err(e) = self.storage.delete(media_path).await
        {
            debug!(post_id = id, media_path = %media_path, error = %e, "Ignoring media removal failure");
        }

        info!(post_id = id, author = %post.author, date = %post.date, "Post deleted");
        Ok(post)
    }

    /// Days with at least one post between `today - calendar_days` and today.
    pub async fn calendar(&self) -> AppResult<CalendarView> {
        let today = self.today();
        let from = today
            .checked_sub_days(Days::new(self.calendar_days))
            .unwrap_or(NaiveDate::MIN);
        let dates = self.post_repo.find_dates_between(from, today).await?;
        Ok(CalendarView { today, dates })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use famfeed_common::LocalStorage;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_post(id: i32, author: &str, media_path: Option<&str>) -> post::Model {
        post::Model {
            id,
            author: author.to_string(),
            content: None,
            media_type: media_path.map(|_| post::MEDIA_TYPE_IMAGE.to_string()),
            media_path: media_path.map(str::to_string),
            created_at: Utc::now().into(),
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        }
    }

    fn service(db: MockDatabase, dir: &std::path::Path) -> PostService {
        let storage: MediaStorage = Arc::new(LocalStorage::new(
            dir.to_path_buf(),
            "/uploads".to_string(),
        ));
        PostService::new(
            PostRepository::new(Arc::new(db.into_connection())),
            storage,
            Tz::UTC,
            30,
        )
    }

    #[tokio::test]
    async fn test_create_post_rejects_disallowed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(MockDatabase::new(DatabaseBackend::Sqlite), dir.path());

        let result = service
            .create_post(
                "Mom",
                CreatePostInput {
                    content: Some("hi".to_string()),
                    file_name: Some("virus.exe".to_string()),
                    data: vec![1, 2, 3],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_create_post_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(MockDatabase::new(DatabaseBackend::Sqlite), dir.path());

        let result = service
            .create_post(
                "Mom",
                CreatePostInput {
                    content: Some("no photo".to_string()),
                    file_name: Some("  ".to_string()),
                    data: vec![],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_post_removes_file_when_insert_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_errors([sea_orm::DbErr::Custom("disk full".to_string())]);
        let service = service(db, dir.path());

        let result = service
            .create_post(
                "Mom",
                CreatePostInput {
                    content: None,
                    file_name: Some("cake.PNG".to_string()),
                    data: vec![0x89, 0x50],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_delete_post_by_non_author_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([[create_test_post(1, "Mom", Some("a.png"))]]);
        let service = service(db, dir.path());

        let result = service.delete_post("Dad", 1).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_post_ignores_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([[create_test_post(1, "Mom", Some("gone.png"))]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);
        let service = service(db, dir.path());

        let deleted = service.delete_post("Mom", 1).await.unwrap();

        assert_eq!(deleted.id, 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_post_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<post::Model>::new()]);
        let service = service(db, dir.path());

        let result = service.delete_post("Mom", 42).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_today_is_utc_date_for_utc_zone() {
        let dir = tempfile::tempdir().unwrap();
        let utc = service(MockDatabase::new(DatabaseBackend::Sqlite), dir.path());
        let now = Utc::now();

        assert_eq!(utc.today(), now.date_naive());
    }
}
