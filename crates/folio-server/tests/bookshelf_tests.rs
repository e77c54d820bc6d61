//! Bookshelf integration tests
//!
//! Listing is open; detail, create, edit and delete each need a named
//! permission granted through group membership.

use folio_common::types::{GroupName, Role};
use serde_json::json;

mod common;
use common::{error_message, TestApp};

fn shelf_book(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "author_name": "Octavia E. Butler",
        "publication_year": 1993
    })
}

#[tokio::test]
async fn test_anonymous_can_list_but_not_view() {
    let app = TestApp::new().await;
    let editor = app
        .user("editor", Role::Member, false, &[GroupName::Editors])
        .await;
    let (status, created) = app
        .post("/api/v1/shelf/books", Some(&editor), shelf_book("Parable of the Sower"))
        .await;
    assert_eq!(status, 201);
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = app.get("/api/v1/shelf/books", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["title"], "Parable of the Sower");
    assert_eq!(body["data"][0]["author"], "Octavia E. Butler");

    let (status, _) = app.get(&format!("/api/v1/shelf/books/{id}"), None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_member_without_groups_is_forbidden() {
    let app = TestApp::new().await;
    let member = app.member("plain").await;

    let (status, body) = app
        .post("/api/v1/shelf/books", Some(&member), shelf_book("Kindred"))
        .await;
    assert_eq!(status, 403);
    assert_eq!(error_message(&body), "You do not have permission to create books.");

    // the permission check runs before the lookup, so a missing id is still 403
    let (status, body) = app.get("/api/v1/shelf/books/999", Some(&member)).await;
    assert_eq!(status, 403);
    assert_eq!(error_message(&body), "You do not have permission to view book details.");
}

#[tokio::test]
async fn test_group_permissions_follow_membership() {
    let app = TestApp::new().await;
    let viewer = app
        .user("viewer", Role::Member, false, &[GroupName::Viewers])
        .await;
    let editor = app
        .user("editor", Role::Member, false, &[GroupName::Editors])
        .await;
    let admin = app
        .user("shelfadmin", Role::Member, false, &[GroupName::Admins])
        .await;

    let (status, created) = app
        .post("/api/v1/shelf/books", Some(&editor), shelf_book("Dawn"))
        .await;
    assert_eq!(status, 201);
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/shelf/books/{id}");

    let (status, body) = app.get(&uri, Some(&viewer)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["publication_year"], 1993);

    let (status, body) = app.put(&uri, Some(&viewer), shelf_book("Dawn (revised)")).await;
    assert_eq!(status, 403);
    assert_eq!(error_message(&body), "You do not have permission to edit books.");

    let (status, body) = app.put(&uri, Some(&editor), shelf_book("Dawn (revised)")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "Dawn (revised)");

    let (status, body) = app.delete(&uri, Some(&editor)).await;
    assert_eq!(status, 403);
    assert_eq!(error_message(&body), "You do not have permission to delete books.");

    let (status, body) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, 204);
    assert!(body.is_null());

    let (status, _) = app.get(&uri, Some(&admin)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_superuser_bypasses_group_permissions() {
    let app = TestApp::new().await;
    let root = app.superuser("root").await;

    let (status, _) = app
        .post("/api/v1/shelf/books", Some(&root), shelf_book("Wild Seed"))
        .await;
    assert_eq!(status, 201);
}

#[tokio::test]
async fn test_invalid_shelf_book_is_rejected() {
    let app = TestApp::new().await;
    let editor = app
        .user("editor", Role::Member, false, &[GroupName::Editors])
        .await;

    let (status, body) = app
        .post(
            "/api/v1/shelf/books",
            Some(&editor),
            json!({ "title": "", "author_name": "Someone" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["title"].is_array());
    assert!(body["error"]["details"]["publication_year"].is_array());
}

#[tokio::test]
async fn test_catalog_routes_cannot_reach_shelf_entries() {
    let app = TestApp::new().await;
    let editor = app
        .user("editor", Role::Member, false, &[GroupName::Editors])
        .await;
    let member = app.member("plain").await;

    let (status, created) = app
        .post("/api/v1/shelf/books", Some(&editor), shelf_book("Dawn"))
        .await;
    assert_eq!(status, 201);
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, _) = app.get(&format!("/api/v1/books/{id}"), None).await;
    assert_eq!(status, 404);

    let (status, body) = app.get("/api/v1/books", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!([]));

    let (status, _) = app.delete(&format!("/api/v1/books/delete/{id}"), Some(&member)).await;
    assert_eq!(status, 404);

    let (status, body) = app.get("/api/v1/authors", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!([]));

    let (status, body) = app.get(&format!("/api/v1/shelf/books/{id}"), Some(&editor)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "Dawn");
    assert_eq!(body["data"]["author"], "Octavia E. Butler");
}
