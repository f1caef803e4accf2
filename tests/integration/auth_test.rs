//! Integration tests for sign-up, sign-in, password recovery, and the
//! signed-in self-service routes.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;

use cherry_auth::reset::hash_reset_token;
use cherry_entity::user::UserRole;
use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_root_and_health() {
    let app = TestApp::new().await;

    let root = app.request("GET", "/", None, None).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["message"], "Welcome to Cherry Studio API");

    let health = app.request("GET", &app.api("/health"), None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["database"], true);
    assert_eq!(health.body["data"]["storage"], true);
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/v1/nothing-here", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], "error");
    assert_eq!(response.message(), "Can't find /api/v1/nothing-here on this server");
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            &app.api("/auth/register"),
            Some(json!({
                "name": "  Ada  ",
                "email": " Ada@Example.COM ",
                "password": PASSWORD,
                "role": "admin",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "success");
    assert!(response.body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let user = &response.body["data"]["user"];
    assert_eq!(user["name"], "Ada");
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let stored = app
        .stores
        .users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, PASSWORD);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let app = TestApp::new().await;
    app.create_user("ada@example.com", UserRole::User).await;

    let response = app
        .request(
            "POST",
            &app.api("/auth/register"),
            Some(json!({ "name": "Ada", "email": "ADA@example.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Email already registered");
}

#[tokio::test]
async fn test_register_validates_input() {
    let app = TestApp::new().await;

    for body in [
        json!({ "name": "", "email": "a@example.com", "password": PASSWORD }),
        json!({ "name": "Ada", "email": "not-an-email", "password": PASSWORD }),
        json!({ "name": "Ada", "email": "a@example.com", "password": "123" }),
    ] {
        let response = app
            .request("POST", &app.api("/auth/register"), Some(body), None)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["status"], "error");
    }
}

#[tokio::test]
async fn test_malformed_json_is_a_client_error() {
    let app = TestApp::new().await;
    let req = http::Request::builder()
        .method("POST")
        .uri(app.api("/auth/login"))
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), req)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new().await;
    app.create_user("ada@example.com", UserRole::User).await;

    let ok = app
        .request(
            "POST",
            &app.api("/auth/login"),
            Some(json!({ "email": "ADA@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert!(ok.body["token"].is_string());
    assert_eq!(ok.body["data"]["user"]["email"], "ada@example.com");

    let wrong = app
        .request(
            "POST",
            &app.api("/auth/login"),
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.message(), "Incorrect email or password");
    assert!(wrong.body.get("token").is_none());

    let unknown = app
        .request(
            "POST",
            &app.api("/auth/login"),
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.message(), wrong.message());

    let missing = app
        .request(
            "POST",
            &app.api("/auth/login"),
            Some(json!({ "email": "ada@example.com" })),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let app = TestApp::new().await;
    let (user, token) = app.signed_in("ada@example.com", UserRole::User).await;

    let me = app.request("GET", &app.api("/auth/me"), None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["user"]["id"], user.id.to_string());

    let anonymous = app.request("GET", &app.api("/auth/me"), None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        anonymous.message(),
        "You are not logged in. Please log in to get access."
    );

    let forged = app
        .request("GET", &app.api("/auth/me"), None, Some("not.a.jwt"))
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let app = TestApp::new().await;
    let (user, token) = app.signed_in("ada@example.com", UserRole::User).await;
    app.stores.users.delete(user.id).await.unwrap();

    let me = app.request("GET", &app.api("/auth/me"), None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        me.message(),
        "The user belonging to this token no longer exists"
    );
}

#[tokio::test]
async fn test_password_reset_round_trip() {
    let app = TestApp::new().await;
    app.create_user("ada@example.com", UserRole::User).await;

    let forgot = app
        .request(
            "POST",
            &app.api("/auth/forgot-password"),
            Some(json!({ "email": "ada@example.com" })),
            None,
        )
        .await;
    assert_eq!(forgot.status, StatusCode::OK);
    assert_eq!(forgot.message(), "Password reset link sent to your email");

    let raw = app.reset_token_for("ada@example.com").await;
    let path = app.api(&format!("/auth/reset-password/{raw}"));

    let reset = app
        .request("POST", &path, Some(json!({ "password": "brand-new-pass" })), None)
        .await;
    assert_eq!(reset.status, StatusCode::OK);
    assert_eq!(reset.message(), "Password reset successful");
    assert!(reset.body["token"].is_string());

    app.login("ada@example.com", "brand-new-pass").await;

    let replay = app
        .request("POST", &path, Some(json!({ "password": "another-pass" })), None)
        .await;
    assert_eq!(replay.status, StatusCode::BAD_REQUEST);
    assert_eq!(replay.message(), "Token is invalid");
}

#[tokio::test]
async fn test_expired_reset_token() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com", UserRole::User).await;

    let raw = "expired-reset-token";
    let hash = hash_reset_token(raw);
    app.stores
        .users
        .set_reset_token(user.id, Some((&hash, Utc::now() - Duration::minutes(1))))
        .await
        .unwrap();

    let response = app
        .request(
            "POST",
            &app.api(&format!("/auth/reset-password/{raw}")),
            Some(json!({ "password": "brand-new-pass" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Token has expired");
}

#[tokio::test]
async fn test_forgot_password_errors() {
    let app = TestApp::new().await;
    app.create_user("ada@example.com", UserRole::User).await;

    let missing = app
        .request("POST", &app.api("/auth/forgot-password"), Some(json!({})), None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .request(
            "POST",
            &app.api("/auth/forgot-password"),
            Some(json!({ "email": "nobody@example.com" })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    app.mailer.set_failing(true);
    let failed = app
        .request(
            "POST",
            &app.api("/auth/forgot-password"),
            Some(json!({ "email": "ada@example.com" })),
            None,
        )
        .await;
    assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failed.message(), "Error sending the email. Try again later.");

    let stored = app
        .stores
        .users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.password_reset_token.is_none());
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new().await;
    app.create_user("bob@example.com", UserRole::User).await;
    let (_, token) = app.signed_in("ada@example.com", UserRole::User).await;

    let updated = app
        .request(
            "PATCH",
            &app.api("/auth/update-profile"),
            Some(json!({ "name": "Ada Lovelace" })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["user"]["name"], "Ada Lovelace");

    let with_password = app
        .request(
            "PATCH",
            &app.api("/auth/update-profile"),
            Some(json!({ "password": "sneaky" })),
            Some(&token),
        )
        .await;
    assert_eq!(with_password.status, StatusCode::BAD_REQUEST);

    let taken = app
        .request(
            "PATCH",
            &app.api("/auth/update-profile"),
            Some(json!({ "email": "bob@example.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(taken.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_password() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("ada@example.com", UserRole::User).await;

    let wrong = app
        .request(
            "PATCH",
            &app.api("/auth/update-password"),
            Some(json!({ "currentPassword": "wrong-pass", "newPassword": "brand-new-pass" })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.message(), "Your current password is wrong");

    let missing = app
        .request(
            "PATCH",
            &app.api("/auth/update-password"),
            Some(json!({ "currentPassword": PASSWORD })),
            Some(&token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let ok = app
        .request(
            "PATCH",
            &app.api("/auth/update-password"),
            Some(json!({ "currentPassword": PASSWORD, "newPassword": "brand-new-pass" })),
            Some(&token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.message(), "Password updated successfully");
    assert!(ok.body["token"].is_string());

    app.login("ada@example.com", "brand-new-pass").await;
}

#[tokio::test]
async fn test_upload_avatar() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("ada@example.com", UserRole::User).await;
    let png = b"\x89PNG\r\n\x1a\nfake-image-bytes";

    let response = app
        .upload(
            &app.api("/auth/upload-avatar"),
            "avatar",
            "me.png",
            "image/png",
            png,
            &token,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let avatar = response.body["data"]["user"]["avatar"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(avatar.starts_with("/uploads/avatars/"));
    assert!(avatar.ends_with(".png"));

    let served = app.request("GET", &avatar, None, None).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.raw, png.to_vec());
}

#[tokio::test]
async fn test_upload_avatar_rejections() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("ada@example.com", UserRole::User).await;
    let path = app.api("/auth/upload-avatar");

    let not_image = app
        .upload(&path, "avatar", "notes.txt", "text/plain", b"hello", &token)
        .await;
    assert_eq!(not_image.status, StatusCode::BAD_REQUEST);
    assert_eq!(not_image.message(), "Please upload an image file");

    let wrong_field = app
        .upload(&path, "picture", "me.png", "image/png", b"png", &token)
        .await;
    assert_eq!(wrong_field.status, StatusCode::BAD_REQUEST);

    let too_big = vec![0u8; app.config.storage.max_avatar_bytes as usize + 1];
    let oversized = app
        .upload(&path, "avatar", "big.png", "image/png", &too_big, &token)
        .await;
    assert_eq!(oversized.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deactivate() {
    let app = TestApp::new().await;
    let (user, token) = app.signed_in("ada@example.com", UserRole::User).await;

    let wrong = app
        .request(
            "DELETE",
            &app.api("/auth/deactivate"),
            Some(json!({ "password": "wrong-pass" })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let ok = app
        .request(
            "DELETE",
            &app.api("/auth/deactivate"),
            Some(json!({ "password": PASSWORD })),
            Some(&token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert!(app.stores.users.find_by_id(user.id).await.unwrap().is_none());

    let me = app.request("GET", &app.api("/auth/me"), None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_last_admin_cannot_deactivate() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in("root@example.com", UserRole::Admin).await;

    let response = app
        .request(
            "DELETE",
            &app.api("/auth/deactivate"),
            Some(json!({ "password": PASSWORD })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
