use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use uuid::Uuid;

use inkwell_core::domain::{PostFilter, User, UserChanges};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, PostRepository, UserRepository};

use crate::database::entity::{category, post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn post_model(author_id: Uuid, title: &str, published: bool) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        title: title.to_owned(),
        slug: format!("{}-1700000000000", title.to_lowercase()),
        content: "Content".to_owned(),
        excerpt: None,
        featured_image: None,
        category_id: None,
        author_id,
        published,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn user_model(username: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$stub".to_owned(),
        full_name: None,
        bio: None,
        profile_picture: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = post_model(Uuid::new_v4(), "Test", true);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post = repo.find_by_id(post_id).await.unwrap().unwrap();
    assert_eq!(post.title, "Test");
    assert_eq!(post.id, post_id);
    assert!(post.published);
}

#[tokio::test]
async fn test_delete_reports_whether_a_row_went_away() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let id = Uuid::new_v4();

    assert!(repo.delete(id).await.unwrap());
    assert!(!repo.delete(id).await.unwrap());
}

#[tokio::test]
async fn test_insert_user_returns_stored_row() {
    let model = user_model("alice");
    let stored = model.clone();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![stored]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user: User = model.clone().into();

    let saved = repo.insert(user).await.unwrap();
    assert_eq!(saved.id, model.id);
    assert_eq!(saved.username, "alice");
}

#[tokio::test]
async fn test_query_failure_is_reported() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Custom("connection reset".to_owned())])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let result = repo.find_by_email("alice@example.com").await;
    assert!(matches!(result, Err(RepoError::Query(_))));
}

#[tokio::test]
async fn test_update_missing_user_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let result = repo
        .update(Uuid::new_v4(), UserChanges::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_user_applies_changes() {
    let model = user_model("alice");
    let mut updated = model.clone();
    updated.bio = Some("Writes about Rust".to_owned());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model.clone()], vec![updated]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let user = repo
        .update(
            model.id,
            UserChanges {
                bio: Some("Writes about Rust".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.bio.as_deref(), Some("Writes about Rust"));
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn test_list_with_unknown_category_still_returns_posts() {
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<category::Model>::new()])
        .append_query_results(vec![vec![
            post_model(author_id, "Second", true),
            post_model(author_id, "First", true),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo
        .list(&PostFilter {
            category_slug: Some("missing".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "Second");
}
