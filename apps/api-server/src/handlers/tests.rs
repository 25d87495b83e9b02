//! HTTP-level tests against the in-memory storage.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use inkwell_core::authorization::{CommentDeletePolicy, Policies, UserDeletionPolicy};
use inkwell_core::ports::TokenService;
use inkwell_infra::{
    Argon2PasswordService, InMemoryDatabase, JwtConfig, JwtTokenService, LocalImageStore,
};

use super::configure_routes;
use crate::middleware::error::configure_extractors;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

const BOUNDARY: &str = "inkwell-test-boundary";

struct TestContext {
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    _uploads: tempfile::TempDir,
}

fn context(policies: Policies) -> TestContext {
    let uploads = tempfile::tempdir().unwrap();
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
        issuer: "inkwell-test".to_string(),
    }));

    let state = AppState::assemble(
        InMemoryDatabase::new().repositories(),
        Arc::new(Argon2PasswordService::with_params(1024, 1, 1).unwrap()),
        tokens.clone(),
        Arc::new(LocalImageStore::new(uploads.path())),
        policies,
    );

    TestContext {
        state: web::Data::new(state),
        tokens: web::Data::new(tokens),
        _uploads: uploads,
    }
}

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data($ctx.state.clone())
                .app_data($ctx.tokens.clone())
                .configure(configure_extractors)
                .configure(configure_routes),
        )
        .await
    };
}

/// Send a request and decode the JSON body.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let res = test::call_service(&$app, $req.to_request()).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }};
}

/// Register a user and return `(id, token)`.
macro_rules! register {
    ($app:expr, $name:expr) => {{
        let (status, body) = call!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({
                    "username": $name,
                    "email": format!("{}@x.com", $name),
                    "password": "password123",
                }))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }};
}

/// Create a post through the multipart endpoint and return its JSON.
macro_rules! create_post {
    ($app:expr, $token:expr, $fields:expr) => {{
        let (content_type, payload) = multipart($fields, None);
        let (status, body) = call!(
            $app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(&$token))
                .insert_header((header::CONTENT_TYPE, content_type))
                .set_payload(payload)
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }};
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

struct FilePart<'a> {
    field: &'a str,
    file_name: &'a str,
    content_type: &'a str,
    data: Vec<u8>,
}

/// Hand-built `multipart/form-data` body.
fn multipart(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect()
}

#[actix_web::test]
async fn test_health() {
    let ctx = context(Policies::default());
    let app = app!(ctx);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let ctx = context(Policies::default());
    let app = app!(ctx);

    let (user_id, _) = register!(app, "alice");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "alice@x.com", "password": "password123"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id.to_string());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap().to_string();
    let (status, me) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");
}

#[actix_web::test]
async fn test_bad_credentials() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    register!(app, "alice");

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "alice@x.com", "password": "wrong-password"}))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "nobody@x.com", "password": "password123"}))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "alice@x.com"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_duplicate_registration_is_rejected() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    register!(app, "alice");

    for body in [
        json!({"username": "alice", "email": "other@x.com", "password": "password123"}),
        json!({"username": "alice2", "email": "alice@x.com", "password": "password123"}),
    ] {
        let (status, err) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(body)
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["detail"].as_str().unwrap().contains("already in use"));
    }

    // The rejected attempts created nothing.
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "other@x.com", "password": "password123"}))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_missing_token_is_401_with_request_id() {
    let ctx = context(Policies::default());
    let app = app!(ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("X-Request-ID", "trace-me"))
    );

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
    assert_eq!(body["requestId"], "trace-me");
}

#[actix_web::test]
async fn test_alice_posts_likes_and_comments() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (alice_id, token) = register!(app, "alice");

    let post = create_post!(
        app,
        token,
        &[("title", "Hello World"), ("content", "First post")]
    );
    let slug = post["slug"].as_str().unwrap();
    assert!(slug.starts_with("hello-world-"));
    assert_eq!(post["author"]["username"], "alice");
    assert_eq!(post["authorId"], alice_id.to_string());
    assert_eq!(post["published"], true);
    assert_eq!(post["likesCount"], 0);

    let post_id = post["id"].as_str().unwrap().to_string();
    let like_uri = format!("/api/posts/{post_id}/like");

    let (_, liked) = call!(
        app,
        test::TestRequest::post()
            .uri(&like_uri)
            .insert_header(bearer(&token))
    );
    assert_eq!(liked["liked"], true);

    let (_, fetched) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(fetched["likesCount"], 1);
    assert_eq!(fetched["userLiked"], true);

    let (_, anonymous) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/slug/{slug}"))
    );
    assert_eq!(anonymous["id"], post_id);
    assert_eq!(anonymous["userLiked"], false);

    let (_, unliked) = call!(
        app,
        test::TestRequest::post()
            .uri(&like_uri)
            .insert_header(bearer(&token))
    );
    assert_eq!(unliked["liked"], false);

    let (_, fetched) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{post_id}"))
    );
    assert_eq!(fetched["likesCount"], 0);

    let comments_uri = format!("/api/posts/{post_id}/comments");
    for text in ["first!", "second"] {
        let (status, comment) = call!(
            app,
            test::TestRequest::post()
                .uri(&comments_uri)
                .insert_header(bearer(&token))
                .set_json(json!({"content": text}))
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(comment["author"]["username"], "alice");
    }

    let (_, comments) = call!(app, test::TestRequest::get().uri(&comments_uri));
    let contents: Vec<&str> = comments
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["first!", "second"]);
}

#[actix_web::test]
async fn test_same_title_gives_distinct_slugs() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (_, token) = register!(app, "alice");

    let first = create_post!(app, token, &[("title", "Hello World"), ("content", "a")]);
    let second = create_post!(app, token, &[("title", "Hello World"), ("content", "b")]);

    assert_ne!(first["slug"], second["slug"]);
}

#[actix_web::test]
async fn test_non_owner_cannot_modify_post() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (_, alice) = register!(app, "alice");
    let (_, bob) = register!(app, "bob");

    let post = create_post!(app, alice, &[("title", "Mine"), ("content", "hands off")]);
    let post_uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let (content_type, payload) = multipart(&[("title", "Hacked")], None);
    let (status, _) = call!(
        app,
        test::TestRequest::patch()
            .uri(&post_uri)
            .insert_header(bearer(&bob))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&post_uri)
            .insert_header(bearer(&bob))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, unchanged) = call!(app, test::TestRequest::get().uri(&post_uri));
    assert_eq!(unchanged["title"], "Mine");

    let (content_type, payload) = multipart(&[("title", "Still mine")], None);
    let (status, updated) = call!(
        app,
        test::TestRequest::patch()
            .uri(&post_uri)
            .insert_header(bearer(&alice))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Still mine");
    assert_eq!(updated["slug"], post["slug"]);

    let (status, deleted) = call!(
        app,
        test::TestRequest::delete()
            .uri(&post_uri)
            .insert_header(bearer(&alice))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], true);

    let (status, _) = call!(app, test::TestRequest::get().uri(&post_uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_user_can_only_edit_own_profile() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (alice_id, alice) = register!(app, "alice");
    let (_, bob) = register!(app, "bob");

    let user_uri = format!("/api/users/{alice_id}");
    let (content_type, payload) = multipart(&[("bio", "pwned")], None);
    let (status, _) = call!(
        app,
        test::TestRequest::patch()
            .uri(&user_uri)
            .insert_header(bearer(&bob))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (content_type, payload) = multipart(&[("fullName", "Alice A."), ("bio", "Writer")], None);
    let (status, user) = call!(
        app,
        test::TestRequest::patch()
            .uri(&user_uri)
            .insert_header(bearer(&alice))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["fullName"], "Alice A.");
    assert_eq!(user["bio"], "Writer");

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&user_uri)
            .insert_header(bearer(&bob))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_published_filter_hides_drafts() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (_, token) = register!(app, "alice");

    create_post!(app, token, &[("title", "Live"), ("content", "x")]);
    create_post!(
        app,
        token,
        &[("title", "Draft"), ("content", "x"), ("published", "false")]
    );

    let (_, published) = call!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(titles(&published), ["Live"]);

    let (_, drafts) = call!(
        app,
        test::TestRequest::get().uri("/api/posts?published=false")
    );
    assert_eq!(titles(&drafts), ["Draft"]);

    let (_, page) = call!(
        app,
        test::TestRequest::get().uri("/api/posts?limit=abc&offset=5")
    );
    assert!(titles(&page).is_empty());
}

#[actix_web::test]
async fn test_categories_and_filtering() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (_, token) = register!(app, "alice");

    let (status, rust) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(&token))
            .set_json(json!({"name": "Rust", "slug": "rust"}))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(&token))
            .set_json(json!({"name": "Rust again", "slug": "rust"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let by_slug = create_post!(
        app,
        token,
        &[("title", "Ownership"), ("content", "x"), ("category", "rust")]
    );
    assert_eq!(by_slug["category"]["slug"], "rust");

    let rust_id = rust["id"].as_str().unwrap();
    let by_id = create_post!(
        app,
        token,
        &[("title", "Borrowing"), ("content", "x"), ("category", rust_id)]
    );
    assert_eq!(by_id["categoryId"], rust_id);

    create_post!(app, token, &[("title", "Uncategorized"), ("content", "x")]);

    let (_, filtered) = call!(app, test::TestRequest::get().uri("/api/posts?category=rust"));
    assert_eq!(titles(&filtered), ["Borrowing", "Ownership"]);

    let (_, unknown) = call!(
        app,
        test::TestRequest::get().uri("/api/posts?category=cooking")
    );
    assert_eq!(titles(&unknown).len(), 3);

    let (content_type, payload) = multipart(
        &[("title", "Lost"), ("content", "x"), ("category", "cooking")],
        None,
    );
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, categories) = call!(app, test::TestRequest::get().uri("/api/categories"));
    assert_eq!(categories.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_retained_content_shows_null_author() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (alice_id, token) = register!(app, "alice");
    let post = create_post!(app, token, &[("title", "Orphan"), ("content", "x")]);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/users/{alice_id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, kept) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{}", post["id"].as_str().unwrap()))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(kept["author"].is_null());
}

#[actix_web::test]
async fn test_cascade_policy_removes_content() {
    let ctx = context(Policies {
        user_deletion: UserDeletionPolicy::Cascade,
        ..Default::default()
    });
    let app = app!(ctx);
    let (alice_id, alice) = register!(app, "alice");
    let (_, bob) = register!(app, "bob");

    let alice_post = create_post!(app, alice, &[("title", "Alice's"), ("content", "x")]);
    let bob_post = create_post!(app, bob, &[("title", "Bob's"), ("content", "x")]);
    let bob_post_id = bob_post["id"].as_str().unwrap().to_string();

    let (_, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{bob_post_id}/like"))
            .insert_header(bearer(&alice))
    );
    let (_, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{bob_post_id}/comments"))
            .insert_header(bearer(&alice))
            .set_json(json!({"content": "from alice"}))
    );

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/users/{alice_id}"))
            .insert_header(bearer(&alice))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call!(
        app,
        test::TestRequest::get().uri(&format!(
            "/api/posts/{}",
            alice_post["id"].as_str().unwrap()
        ))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, bobs) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{bob_post_id}"))
    );
    assert_eq!(bobs["likesCount"], 0);

    let (_, comments) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{bob_post_id}/comments"))
    );
    assert!(comments.as_array().unwrap().is_empty());

    let (status, _) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/users/{alice_id}"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comment_delete_policies() {
    for (policy, expected, remaining) in [
        (CommentDeletePolicy::AnyAuthenticated, StatusCode::OK, 0),
        (CommentDeletePolicy::AuthorOnly, StatusCode::FORBIDDEN, 1),
    ] {
        let ctx = context(Policies {
            comment_delete: policy,
            ..Default::default()
        });
        let app = app!(ctx);
        let (_, alice) = register!(app, "alice");
        let (_, bob) = register!(app, "bob");

        let post = create_post!(app, alice, &[("title", "Topic"), ("content", "x")]);
        let comments_uri = format!("/api/posts/{}/comments", post["id"].as_str().unwrap());
        let (_, comment) = call!(
            app,
            test::TestRequest::post()
                .uri(&comments_uri)
                .insert_header(bearer(&alice))
                .set_json(json!({"content": "mine"}))
        );

        let (status, body) = call!(
            app,
            test::TestRequest::delete()
                .uri(&format!("/api/comments/{}", comment["id"].as_str().unwrap()))
                .insert_header(bearer(&bob))
        );
        assert_eq!(status, expected, "{policy:?}");
        if expected == StatusCode::OK {
            assert_eq!(body["success"], true);
        }

        let (_, left) = call!(app, test::TestRequest::get().uri(&comments_uri));
        assert_eq!(left.as_array().unwrap().len(), remaining, "{policy:?}");
    }
}

#[actix_web::test]
async fn test_deleting_missing_comment_reports_no_success() {
    for policy in [
        CommentDeletePolicy::AnyAuthenticated,
        CommentDeletePolicy::AuthorOnly,
    ] {
        let ctx = context(Policies {
            comment_delete: policy,
            ..Default::default()
        });
        let app = app!(ctx);
        let (_, token) = register!(app, "alice");

        let (status, body) = call!(
            app,
            test::TestRequest::delete()
                .uri(&format!("/api/comments/{}", Uuid::new_v4()))
                .insert_header(bearer(&token))
        );

        assert_eq!(status, StatusCode::OK, "{policy:?}");
        assert_eq!(body["success"], false);
    }
}

#[actix_web::test]
async fn test_blank_fields_clear_excerpt_and_category() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (_, token) = register!(app, "alice");

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(&token))
            .set_json(json!({"name": "Tech", "slug": "tech"}))
    );
    assert_eq!(status, StatusCode::CREATED);

    let post = create_post!(
        app,
        token,
        &[
            ("title", "Filed"),
            ("content", "x"),
            ("excerpt", "ex"),
            ("category", "tech"),
        ]
    );
    assert_eq!(post["excerpt"], "ex");
    assert_eq!(post["category"]["slug"], "tech");
    let post_uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

    // Fields left out of the form stay as they are.
    let (content_type, payload) = multipart(&[("title", "Still filed")], None);
    let (status, kept) = call!(
        app,
        test::TestRequest::patch()
            .uri(&post_uri)
            .insert_header(bearer(&token))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kept["excerpt"], "ex");
    assert_eq!(kept["category"]["slug"], "tech");

    let (content_type, payload) = multipart(&[("category", ""), ("excerpt", "")], None);
    let (status, cleared) = call!(
        app,
        test::TestRequest::patch()
            .uri(&post_uri)
            .insert_header(bearer(&token))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["excerpt"].is_null());
    assert!(cleared["category"].is_null());
    assert!(cleared["categoryId"].is_null());
    assert_eq!(cleared["title"], "Still filed");
}

#[actix_web::test]
async fn test_comment_and_like_need_an_existing_post() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (_, token) = register!(app, "alice");
    let missing = Uuid::new_v4();

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{missing}/comments"))
            .insert_header(bearer(&token))
            .set_json(json!({"content": "hello?"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{missing}/like"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_featured_image_upload() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (_, token) = register!(app, "alice");

    let (content_type, payload) = multipart(
        &[("title", "Pictures"), ("content", "x")],
        Some(FilePart {
            field: "featuredImage",
            file_name: "cat.png",
            content_type: "image/png",
            data: vec![0x89, b'P', b'N', b'G'],
        }),
    );
    let (status, post) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );
    assert_eq!(status, StatusCode::CREATED, "{post}");

    let url = post["featuredImage"].as_str().unwrap();
    assert!(url.starts_with("/uploads/featuredImage-"));

    let res = test::call_service(&app, test::TestRequest::get().uri(url).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(test::read_body(res).await.len(), 4);
}

#[actix_web::test]
async fn test_non_image_upload_is_rejected() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (_, token) = register!(app, "alice");

    let (content_type, payload) = multipart(
        &[("title", "Sneaky"), ("content", "x")],
        Some(FilePart {
            field: "featuredImage",
            file_name: "run.sh",
            content_type: "text/x-shellscript",
            data: b"#!/bin/sh".to_vec(),
        }),
    );
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Only image files are allowed");

    let (_, posts) = call!(app, test::TestRequest::get().uri("/api/posts"));
    assert!(titles(&posts).is_empty());
}

#[actix_web::test]
async fn test_oversized_upload_is_rejected() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (user_id, token) = register!(app, "alice");

    let (content_type, payload) = multipart(
        &[],
        Some(FilePart {
            field: "profilePicture",
            file_name: "huge.png",
            content_type: "image/png",
            data: vec![0; inkwell_core::ports::MAX_IMAGE_BYTES + 1],
        }),
    );
    let (status, _) = call!(
        app,
        test::TestRequest::patch()
            .uri(&format!("/api/users/{user_id}"))
            .insert_header(bearer(&token))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_user_posts_listing() {
    let ctx = context(Policies::default());
    let app = app!(ctx);
    let (alice_id, alice) = register!(app, "alice");
    let (_, bob) = register!(app, "bob");

    create_post!(app, alice, &[("title", "One"), ("content", "x")]);
    create_post!(app, alice, &[("title", "Two"), ("content", "x")]);
    create_post!(app, bob, &[("title", "Other"), ("content", "x")]);

    let (status, posts) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/users/{alice_id}/posts"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&posts), ["Two", "One"]);
}

#[actix_web::test]
async fn test_malformed_json_is_400() {
    let ctx = context(Policies::default());
    let app = app!(ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Bad Request");
}
