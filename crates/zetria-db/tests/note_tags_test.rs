//! Integration tests for note writes and their derived tags.
//!
//! Covers:
//! - tag set after an update equals the `#tokens` of the new content
//! - duplicate tag names across notes collapse to one tag row
//! - case-sensitive tag names
//! - note listing order and ownership scoping

use zetria_db::test_fixtures::TestDatabase;
use zetria_db::{Error, NoteRepository, SaveNoteRequest, TagRepository};

fn save(title: &str, content: &str) -> SaveNoteRequest {
    SaveNoteRequest {
        title: title.to_string(),
        content: content.to_string(),
    }
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_insert_derives_sorted_tags() {
    let test_db = TestDatabase::new().await;

    let note = test_db.note("Tags", "learning #sql and #rust, again #rust").await;
    assert_eq!(note.tags, vec!["rust", "sql"]);

    let fetched = test_db.db.notes.fetch(test_db.user.id, note.id).await.unwrap();
    assert_eq!(fetched.tags, vec!["rust", "sql"]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_update_fully_replaces_tag_set() {
    let test_db = TestDatabase::new().await;
    let note = test_db.note("Replace", "#alpha #beta").await;

    test_db
        .db
        .notes
        .update(test_db.user.id, note.id, save("Replace", "now only #gamma and #beta"))
        .await
        .unwrap();

    let tags = test_db.db.tags.get_for_note(note.id).await.unwrap();
    assert_eq!(tags, vec!["beta", "gamma"]);

    test_db
        .db
        .notes
        .update(test_db.user.id, note.id, save("Replace", "no tags at all"))
        .await
        .unwrap();
    assert!(test_db.db.tags.get_for_note(note.id).await.unwrap().is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_duplicate_tag_names_share_one_row() {
    let test_db = TestDatabase::new().await;
    let tag = format!("shared{}", uuid::Uuid::new_v4().simple());

    test_db.note("One", &format!("#{}", tag)).await;
    test_db.note("Two", &format!("#{} again", tag)).await;

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tag WHERE name = $1")
        .bind(&tag)
        .fetch_one(&test_db.db.pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let usage = test_db.db.tags.list_for_user(test_db.user.id).await.unwrap();
    let shared = usage.iter().find(|t| t.name == tag).expect("tag listed");
    assert_eq!(shared.usage_count, 2);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_tags_are_case_sensitive() {
    let test_db = TestDatabase::new().await;
    let suffix = uuid::Uuid::new_v4().simple().to_string();

    let note = test_db
        .note("Case", &format!("#Case{0} #case{0}", suffix))
        .await;
    assert_eq!(note.tags.len(), 2);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_list_orders_by_updated_at_desc() {
    let test_db = TestDatabase::new().await;
    let first = test_db.note("First", "a").await;
    let second = test_db.note("Second", "b").await;

    test_db
        .db
        .notes
        .update(test_db.user.id, first.id, save("First", "edited"))
        .await
        .unwrap();

    let notes = test_db.db.notes.list(test_db.user.id).await.unwrap();
    let ids: Vec<_> = notes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_other_users_note_is_not_found() {
    let test_db = TestDatabase::new().await;
    let stranger = test_db.other_user().await;
    let note = test_db.note("Private", "mine").await;

    let fetched = test_db.db.notes.fetch(stranger.id, note.id).await;
    assert!(matches!(fetched, Err(Error::NotFound(_))));

    let updated = test_db
        .db
        .notes
        .update(stranger.id, note.id, save("Hijack", "x"))
        .await;
    assert!(matches!(updated, Err(Error::NotFound(_))));

    let deleted = test_db.db.notes.delete(stranger.id, note.id).await;
    assert!(matches!(deleted, Err(Error::NotFound(_))));
    assert!(test_db.db.notes.exists(test_db.user.id, note.id).await.unwrap());

    zetria_db::test_fixtures::cleanup_user(&test_db.db, stranger.id).await;
    test_db.cleanup().await;
}
