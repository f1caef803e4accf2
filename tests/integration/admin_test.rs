//! Integration tests for admin user management and the access gate.

mod helpers;

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use cherry_entity::user::UserRole;
use helpers::TestApp;

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("ada@example.com", UserRole::User).await;

    let anonymous = app.request("GET", &app.api("/admin/users"), None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forbidden = app
        .request("GET", &app.api("/admin/users"), None, Some(&token))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["status"], "error");
}

#[tokio::test]
async fn test_list_users_paginates() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;
    for i in 0..4 {
        app.create_user(&format!("user{i}@example.com"), UserRole::User)
            .await;
    }

    let response = app
        .request(
            "GET",
            &app.api("/admin/users?page=2&limit=2&sortBy=email&order=asc"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["results"], 2);
    assert_eq!(response.body["pagination"]["total"], 5);
    assert_eq!(response.body["pagination"]["pages"], 3);
    assert_eq!(response.body["pagination"]["page"], 2);
    assert_eq!(response.body["pagination"]["limit"], 2);

    let users = response.body["data"]["users"].as_array().unwrap();
    assert_eq!(users[0]["email"], "user1@example.com");
    assert_eq!(users[1]["email"], "user2@example.com");
}

#[tokio::test]
async fn test_list_users_filters() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;
    app.create_user("ada@example.com", UserRole::User).await;
    app.create_user("bob@example.com", UserRole::User).await;

    let by_role = app
        .request("GET", &app.api("/admin/users?role=user"), None, Some(&token))
        .await;
    assert_eq!(by_role.body["pagination"]["total"], 2);

    let by_search = app
        .request("GET", &app.api("/admin/users?search=ADA"), None, Some(&token))
        .await;
    assert_eq!(by_search.body["pagination"]["total"], 1);
    assert_eq!(by_search.body["data"]["users"][0]["email"], "ada@example.com");

    let literal = app
        .request("GET", &app.api("/admin/users?search=.*"), None, Some(&token))
        .await;
    assert_eq!(literal.status, StatusCode::OK);
    assert_eq!(literal.body["pagination"]["total"], 0);

    let clamped = app
        .request("GET", &app.api("/admin/users?limit=500"), None, Some(&token))
        .await;
    assert_eq!(clamped.body["pagination"]["limit"], 100);
}

#[tokio::test]
async fn test_list_users_rejects_bad_parameters() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;

    for query in [
        "page=abc",
        "page=0",
        "limit=-5",
        "role=owner",
        "sortBy=passwordHash",
        "order=sideways",
        "startDate=yesterday",
    ] {
        let response = app
            .request(
                "GET",
                &app.api(&format!("/admin/users?{query}")),
                None,
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "query: {query}");
    }
}

#[tokio::test]
async fn test_get_user() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;
    let ada = app.create_user("ada@example.com", UserRole::User).await;

    let found = app
        .request("GET", &app.api(&format!("/admin/users/{}", ada.id)), None, Some(&token))
        .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["data"]["user"]["email"], "ada@example.com");

    let missing = app
        .request(
            "GET",
            &app.api(&format!("/admin/users/{}", Uuid::new_v4())),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.message(), "No user found with that ID");

    let malformed = app
        .request("GET", &app.api("/admin/users/not-a-uuid"), None, Some(&token))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_user() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;
    let ada = app.create_user("ada@example.com", UserRole::User).await;
    app.create_user("bob@example.com", UserRole::User).await;
    let path = app.api(&format!("/admin/users/{}", ada.id));

    let promoted = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "role": "admin", "name": "Ada L." })),
            Some(&token),
        )
        .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.body["data"]["user"]["role"], "admin");
    assert_eq!(promoted.body["data"]["user"]["name"], "Ada L.");

    let password = app
        .request("PATCH", &path, Some(json!({ "password": "x" })), Some(&token))
        .await;
    assert_eq!(password.status, StatusCode::BAD_REQUEST);

    let bad_role = app
        .request("PATCH", &path, Some(json!({ "role": "owner" })), Some(&token))
        .await;
    assert_eq!(bad_role.status, StatusCode::BAD_REQUEST);

    let duplicate = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "email": "bob@example.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.message(), "Email already registered");

    let missing = app
        .request(
            "PATCH",
            &app.api(&format!("/admin/users/{}", Uuid::new_v4())),
            Some(json!({ "name": "Ghost" })),
            Some(&token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_last_admin_cannot_be_demoted_or_deleted() {
    let app = TestApp::new().await;
    let (root, token) = app.signed_in("root@example.com", UserRole::Admin).await;
    let path = app.api(&format!("/admin/users/{}", root.id));

    let demote = app
        .request("PATCH", &path, Some(json!({ "role": "user" })), Some(&token))
        .await;
    assert_eq!(demote.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        demote.message(),
        "The system must retain at least one administrator"
    );

    let delete = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(delete.status, StatusCode::BAD_REQUEST);

    let still_admin = app.stores.users.find_by_id(root.id).await.unwrap().unwrap();
    assert_eq!(still_admin.role, UserRole::Admin);
}

#[tokio::test]
async fn test_concurrent_demotions_keep_one_admin() {
    let app = TestApp::new().await;
    let (first, token) = app.signed_in("first@example.com", UserRole::Admin).await;
    let second = app.create_user("second@example.com", UserRole::Admin).await;

    let demote = |id: Uuid| {
        let path = app.api(&format!("/admin/users/{id}"));
        let token = token.clone();
        let app = &app;
        async move {
            app.request("PATCH", &path, Some(json!({ "role": "user" })), Some(&token))
                .await
        }
    };
    let (a, b) = tokio::join!(demote(first.id), demote(second.id));

    let succeeded = [a.status, b.status]
        .iter()
        .filter(|s| **s == StatusCode::OK)
        .count();
    assert!(succeeded <= 1);
    assert_eq!(
        app.stores.users.count_by_role(UserRole::Admin).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;
    let ada = app.create_user("ada@example.com", UserRole::User).await;
    let path = app.api(&format!("/admin/users/{}", ada.id));

    let deleted = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.raw.is_empty());

    let again = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_demotion_takes_effect_immediately() {
    let app = TestApp::new().await;
    let (ada, ada_token) = app.signed_in("ada@example.com", UserRole::Admin).await;
    let (_, root_token) = app.signed_in("root@example.com", UserRole::Admin).await;

    let before = app
        .request("GET", &app.api("/admin/users"), None, Some(&ada_token))
        .await;
    assert_eq!(before.status, StatusCode::OK);

    let demote = app
        .request(
            "PATCH",
            &app.api(&format!("/admin/users/{}", ada.id)),
            Some(json!({ "role": "user" })),
            Some(&root_token),
        )
        .await;
    assert_eq!(demote.status, StatusCode::OK);

    let after = app
        .request("GET", &app.api("/admin/users"), None, Some(&ada_token))
        .await;
    assert_eq!(after.status, StatusCode::FORBIDDEN);
}
