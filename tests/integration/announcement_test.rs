//! Integration tests for announcement management and the public feed.

mod helpers;

use http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use cherry_entity::user::UserRole;
use helpers::TestApp;

async fn create(app: &TestApp, token: &str, body: Value) -> Value {
    let response = app
        .request("POST", &app.api("/announcements"), Some(body), Some(token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["data"]["announcement"].clone()
}

#[tokio::test]
async fn test_management_requires_admin() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("ada@example.com", UserRole::User).await;

    let create = app
        .request(
            "POST",
            &app.api("/announcements"),
            Some(json!({ "title": "Hi", "content": "Body" })),
            Some(&token),
        )
        .await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);

    let list = app.request("GET", &app.api("/announcements"), None, None).await;
    assert_eq!(list.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_announcement() {
    let app = TestApp::new().await;
    let (admin, token) = app.signed_in("root@example.com", UserRole::Admin).await;

    let draft = create(
        &app,
        &token,
        json!({ "title": "  Maintenance  ", "content": "Downtime tonight" }),
    )
    .await;
    assert_eq!(draft["title"], "Maintenance");
    assert_eq!(draft["status"], "draft");
    assert_eq!(draft["priority"], 0);
    assert_eq!(draft["isSticky"], false);
    assert!(draft["publishDate"].is_null());
    assert_eq!(draft["createdBy"]["id"], admin.id.to_string());
    assert_eq!(draft["createdBy"]["name"], "root");
    assert_eq!(draft["updatedBy"]["id"], admin.id.to_string());

    let published = create(
        &app,
        &token,
        json!({ "title": "Release", "content": "v2 is out", "status": "published" }),
    )
    .await;
    assert_eq!(published["status"], "published");
    assert!(published["publishDate"].is_string());
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;

    for body in [
        json!({ "content": "No title" }),
        json!({ "title": "x".repeat(101), "content": "Too long" }),
        json!({ "title": "Empty", "content": "   " }),
        json!({ "title": "Loud", "content": "Body", "priority": 11 }),
        json!({ "title": "Odd", "content": "Body", "status": "hidden" }),
        json!({
            "title": "Backwards",
            "content": "Body",
            "publishDate": "2024-01-10T00:00:00Z",
            "expireDate": "2024-01-05T00:00:00Z",
        }),
    ] {
        let response = app
            .request("POST", &app.api("/announcements"), Some(body.clone()), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[tokio::test]
async fn test_published_feed_filters_and_orders() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;

    create(
        &app,
        &token,
        json!({
            "title": "Old", "content": "c", "status": "published",
            "publishDate": "2024-01-01T00:00:00Z",
        }),
    )
    .await;
    create(
        &app,
        &token,
        json!({
            "title": "Newer", "content": "c", "status": "published",
            "publishDate": "2024-03-01T00:00:00Z",
        }),
    )
    .await;
    create(
        &app,
        &token,
        json!({
            "title": "Important", "content": "c", "status": "published", "priority": 5,
            "publishDate": "2024-01-01T00:00:00Z",
        }),
    )
    .await;
    create(
        &app,
        &token,
        json!({
            "title": "Pinned", "content": "c", "status": "published", "isSticky": true,
            "publishDate": "2023-06-01T00:00:00Z",
        }),
    )
    .await;
    create(
        &app,
        &token,
        json!({
            "title": "Expired", "content": "c", "status": "published",
            "publishDate": "2024-01-01T00:00:00Z", "expireDate": "2024-02-01T00:00:00Z",
        }),
    )
    .await;
    create(
        &app,
        &token,
        json!({
            "title": "Scheduled", "content": "c", "status": "published",
            "publishDate": "2999-01-01T00:00:00Z",
        }),
    )
    .await;
    create(&app, &token, json!({ "title": "Draft", "content": "c" })).await;
    create(
        &app,
        &token,
        json!({ "title": "Archived", "content": "c", "status": "archived" }),
    )
    .await;

    let feed = app
        .request("GET", &app.api("/announcements/published"), None, None)
        .await;
    assert_eq!(feed.status, StatusCode::OK);
    assert_eq!(feed.body["results"], 4);
    assert_eq!(feed.body["pagination"]["total"], 4);

    let items = feed.body["data"]["announcements"].as_array().unwrap();
    let titles: Vec<&str> = items.iter().map(|a| a["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Pinned", "Important", "Newer", "Old"]);
    assert!(items[0].get("createdBy").is_none());
    assert!(items[0].get("updatedBy").is_none());

    let paged = app
        .request(
            "GET",
            &app.api("/announcements/published?page=2&limit=3"),
            None,
            None,
        )
        .await;
    assert_eq!(paged.body["results"], 1);
    assert_eq!(paged.body["pagination"]["pages"], 2);
    assert_eq!(paged.body["data"]["announcements"][0]["title"], "Old");
}

#[tokio::test]
async fn test_admin_list_filters() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;
    create(&app, &token, json!({ "title": "Alpha", "content": "first" })).await;
    create(
        &app,
        &token,
        json!({ "title": "Beta", "content": "second", "status": "published" }),
    )
    .await;

    let drafts = app
        .request("GET", &app.api("/announcements?status=draft"), None, Some(&token))
        .await;
    assert_eq!(drafts.status, StatusCode::OK);
    assert_eq!(drafts.body["pagination"]["total"], 1);
    assert_eq!(drafts.body["data"]["announcements"][0]["title"], "Alpha");
    assert!(drafts.body["data"]["announcements"][0]["createdBy"].is_object());

    let searched = app
        .request("GET", &app.api("/announcements?search=SECOND"), None, Some(&token))
        .await;
    assert_eq!(searched.body["pagination"]["total"], 1);

    let sorted = app
        .request(
            "GET",
            &app.api("/announcements?sortBy=title&order=asc"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(sorted.body["data"]["announcements"][0]["title"], "Alpha");

    let bad = app
        .request("GET", &app.api("/announcements?status=hidden"), None, Some(&token))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_announcement() {
    let app = TestApp::new().await;
    let (_, root_token) = app.signed_in("root@example.com", UserRole::Admin).await;
    let (editor, editor_token) = app.signed_in("editor@example.com", UserRole::Admin).await;

    let created = create(
        &app,
        &root_token,
        json!({
            "title": "Notice", "content": "c",
            "publishDate": "2024-01-01T00:00:00Z", "expireDate": "2024-06-01T00:00:00Z",
        }),
    )
    .await;
    let path = app.api(&format!("/announcements/{}", created["id"].as_str().unwrap()));

    let cleared = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "expireDate": null, "priority": 3 })),
            Some(&editor_token),
        )
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    let announcement = &cleared.body["data"]["announcement"];
    assert!(announcement["expireDate"].is_null());
    assert_eq!(announcement["publishDate"], created["publishDate"]);
    assert_eq!(announcement["priority"], 3);
    assert_eq!(announcement["updatedBy"]["id"], editor.id.to_string());
    assert_eq!(announcement["createdBy"]["id"], created["createdBy"]["id"]);

    let invalid = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "expireDate": "2023-01-01T00:00:00Z" })),
            Some(&root_token),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let missing = app
        .request(
            "PATCH",
            &app.api(&format!("/announcements/{}", Uuid::new_v4())),
            Some(json!({ "title": "Ghost" })),
            Some(&root_token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.message(), "No announcement found with that ID");
}

#[tokio::test]
async fn test_patch_status() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;
    let created = create(&app, &token, json!({ "title": "Soon", "content": "c" })).await;
    let path = app.api(&format!(
        "/announcements/{}/status",
        created["id"].as_str().unwrap()
    ));

    let published = app
        .request("PATCH", &path, Some(json!({ "status": "published" })), Some(&token))
        .await;
    assert_eq!(published.status, StatusCode::OK);
    assert_eq!(published.body["data"]["announcement"]["status"], "published");
    assert!(published.body["data"]["announcement"]["publishDate"].is_string());

    let invalid = app
        .request("PATCH", &path, Some(json!({ "status": "hidden" })), Some(&token))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    // The status is rejected before the announcement is looked up.
    let invalid_missing = app
        .request(
            "PATCH",
            &app.api(&format!("/announcements/{}/status", Uuid::new_v4())),
            Some(json!({ "status": "hidden" })),
            Some(&token),
        )
        .await;
    assert_eq!(invalid_missing.status, StatusCode::BAD_REQUEST);

    let valid_missing = app
        .request(
            "PATCH",
            &app.api(&format!("/announcements/{}/status", Uuid::new_v4())),
            Some(json!({ "status": "archived" })),
            Some(&token),
        )
        .await;
    assert_eq!(valid_missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_and_delete_announcement() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;
    let created = create(&app, &token, json!({ "title": "Bye", "content": "c" })).await;
    let path = app.api(&format!("/announcements/{}", created["id"].as_str().unwrap()));

    let found = app.request("GET", &path, None, Some(&token)).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["data"]["announcement"]["title"], "Bye");

    let deleted = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.request("GET", &path, None, Some(&token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let again = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}
