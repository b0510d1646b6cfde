//! Service tests against a real migrated SQLite database.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{Days, Utc};
use chrono_tz::Tz;
use famfeed_common::{AppError, LocalStorage, MediaStorage};
use famfeed_core::{CreatePostInput, MemberService, PostService, SetupService};
use famfeed_db::entities::post;
use famfeed_db::repositories::{FamilyMemberRepository, PostRepository, SettingsRepository};
use famfeed_db::test_utils::TestDatabase;
use sea_orm::Set;

struct Services {
    db: TestDatabase,
    setup: SetupService,
    members: MemberService,
    posts: PostService,
}

async fn services() -> Services {
    let db = TestDatabase::new().await.unwrap();
    let conn = db.connection();
    let storage: MediaStorage = Arc::new(LocalStorage::new(
        db.uploads_dir(),
        "/uploads".to_string(),
    ));

    Services {
        setup: SetupService::new(SettingsRepository::new(Arc::clone(&conn))),
        members: MemberService::new(FamilyMemberRepository::new(Arc::clone(&conn))),
        posts: PostService::new(PostRepository::new(conn), storage, Tz::UTC, 30),
        db,
    }
}

fn photo(name: &str) -> CreatePostInput {
    CreatePostInput {
        content: Some(format!("caption for {name}")),
        file_name: Some(name.to_string()),
        data: vec![0x89, b'P', b'N', b'G'],
    }
}

fn uploaded_files(db: &TestDatabase) -> usize {
    std::fs::read_dir(db.uploads_dir())
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_setup_parses_names_and_flips_flag() {
    let s = services().await;
    assert!(!s.setup.is_setup_done().await.unwrap());

    let members = s.setup.complete(" Mom, Dad,, Mom ,Kid ").await.unwrap();

    let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Mom", "Dad", "Kid"]);
    assert!(s.setup.is_setup_done().await.unwrap());

    let again = s.setup.complete("Grandpa").await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
    assert_eq!(s.members.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_posting_adds_to_todays_feed_newest_first() {
    let s = services().await;
    let today = s.posts.today();

    let first = s.posts.create_post("Mom", photo("one.jpg")).await.unwrap();
    let second = s.posts.create_post("Dad", photo("two.GIF")).await.unwrap();

    let feed = s.posts.feed_for(today).await.unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].id, second.id);
    assert_eq!(feed[1].id, first.id);
    assert_eq!(first.author, "Mom");
    assert_eq!(first.media_type.as_deref(), Some(post::MEDIA_TYPE_IMAGE));
    assert!(second.media_path.as_deref().unwrap().ends_with(".gif"));
    assert_eq!(uploaded_files(&s.db), 2);
}

#[tokio::test]
async fn test_blank_caption_is_stored_as_none() {
    let s = services().await;

    let created = s
        .posts
        .create_post(
            "Mom",
            CreatePostInput {
                content: Some("   ".to_string()),
                ..photo("cake.png")
            },
        )
        .await
        .unwrap();

    assert_eq!(created.content, None);
}

#[tokio::test]
async fn test_rejected_upload_leaves_feed_and_store_untouched() {
    let s = services().await;

    let result = s.posts.create_post("Mom", photo("setup.exe")).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(s.posts.feed_for(s.posts.today()).await.unwrap().is_empty());
    assert_eq!(uploaded_files(&s.db), 0);
}

#[tokio::test]
async fn test_only_the_author_can_delete() {
    let s = services().await;
    let created = s.posts.create_post("Mom", photo("beach.png")).await.unwrap();

    let denied = s.posts.delete_post("Dad", created.id).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
    assert_eq!(s.posts.feed_for(created.date).await.unwrap().len(), 1);
    assert_eq!(uploaded_files(&s.db), 1);

    let deleted = s.posts.delete_post("Mom", created.id).await.unwrap();
    assert_eq!(deleted.date, created.date);
    assert!(s.posts.feed_for(created.date).await.unwrap().is_empty());
    assert_eq!(uploaded_files(&s.db), 0);

    let missing = s.posts.delete_post("Mom", created.id).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_succeeds_when_file_already_gone() {
    let s = services().await;
    let created = s.posts.create_post("Mom", photo("gone.png")).await.unwrap();
    std::fs::remove_file(s.db.uploads_dir().join(created.media_path.as_deref().unwrap())).unwrap();

    s.posts.delete_post("Mom", created.id).await.unwrap();

    assert!(s.posts.get(created.id).await.is_err());
}

#[tokio::test]
async fn test_rename_cascades_to_posts_and_delete_keeps_them() {
    let s = services().await;
    s.setup.complete("Mom, Dad").await.unwrap();
    s.posts.create_post("Mom", photo("a.png")).await.unwrap();
    s.posts.create_post("Dad", photo("b.png")).await.unwrap();

    let mom = s.members.find_by_name("Mom").await.unwrap().unwrap();
    let renamed = s.members.rename(mom.id, "  Mother ").await.unwrap();
    assert_eq!(renamed.name, "Mother");

    let feed = s.posts.feed_for(s.posts.today()).await.unwrap();
    let authors: Vec<_> = feed.iter().map(|p| p.author.as_str()).collect();
    assert!(authors.contains(&"Mother"));
    assert!(authors.contains(&"Dad"));
    assert!(!authors.contains(&"Mom"));

    let dad = s.members.find_by_name("Dad").await.unwrap().unwrap();
    let clash = s.members.rename(dad.id, "Mother").await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));

    s.members.delete(dad.id).await.unwrap();
    assert!(s.members.find_by_name("Dad").await.unwrap().is_none());
    assert_eq!(s.posts.feed_for(s.posts.today()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_add_member_trims_and_rejects_duplicates() {
    let s = services().await;

    let added = s.members.add("  Aunt May ").await.unwrap();
    assert_eq!(added.name, "Aunt May");

    let dup = s.members.add("Aunt May").await;
    assert!(matches!(dup, Err(AppError::Conflict(msg)) if msg.contains("already")));

    let blank = s.members.add("   ").await;
    assert!(matches!(blank, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_calendar_lists_distinct_days_in_window() {
    let s = services().await;
    let today = s.posts.today();
    let repo = PostRepository::new(s.db.connection());

    for days_ago in [0_u64, 0, 3, 30, 31] {
        let date = today.checked_sub_days(Days::new(days_ago)).unwrap();
        repo.create(post::ActiveModel {
            author: Set("Mom".to_string()),
            content: Set(None),
            media_type: Set(None),
            media_path: Set(None),
            created_at: Set(Utc::now().into()),
            date: Set(date),
            ..Default::default()
        })
        .await
        .unwrap();
    }

    let calendar = s.posts.calendar().await.unwrap();

    assert_eq!(calendar.today, today);
    assert_eq!(
        calendar.dates,
        vec![
            today.checked_sub_days(Days::new(30)).unwrap(),
            today.checked_sub_days(Days::new(3)).unwrap(),
            today,
        ]
    );
}
