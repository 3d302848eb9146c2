//! Integration tests for signup, signin, and token-guarded endpoints.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn signup_issues_token_and_cookie() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/signup",
            Some(json!({ "email": "a@b.com", "password": "longenough1" })),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);

    let claims = app
        .token_issuer()
        .verify_access(&response.access_token())
        .expect("access token must verify");
    assert_eq!(claims.email.as_deref(), Some("a@b.com"));

    let set_cookie = response
        .refresh_set_cookie()
        .expect("signup must set the refresh cookie");
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/auth/refresh"));
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = TestApp::new();
    app.signup("a@b.com", "longenough1").await;

    let response = app
        .request(
            "POST",
            "/auth/signup",
            Some(json!({ "email": "A@B.com", "password": "longenough1" })),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
async fn signup_validates_request_shape() {
    let app = TestApp::new();

    let bad_email = app
        .request(
            "POST",
            "/auth/signup",
            Some(json!({ "email": "not-an-email", "password": "longenough1" })),
            None,
            None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["error"], "VALIDATION_ERROR");

    let short_password = app
        .request(
            "POST",
            "/auth/signup",
            Some(json!({ "email": "a@b.com", "password": "short" })),
            None,
            None,
        )
        .await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signin_opens_a_second_session() {
    let app = TestApp::new();
    let (signup_token, _) = app.signup("a@b.com", "longenough1").await;

    let response = app
        .request(
            "POST",
            "/auth/signin",
            Some(json!({ "email": "a@b.com", "password": "longenough1" })),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);

    let issuer = app.token_issuer();
    let first = issuer.verify_access(&signup_token).unwrap();
    let second = issuer.verify_access(&response.access_token()).unwrap();
    assert_eq!(first.user_id(), second.user_id());
    assert_ne!(first.session_id(), second.session_id());
}

#[tokio::test]
async fn credential_failures_are_uniform() {
    let app = TestApp::new();
    app.signup("a@b.com", "longenough1").await;

    let wrong_password = app
        .request(
            "POST",
            "/auth/signin",
            Some(json!({ "email": "a@b.com", "password": "wrongpassword" })),
            None,
            None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/auth/signin",
            Some(json!({ "email": "nobody@b.com", "password": "longenough1" })),
            None,
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    // Same body either way: responses must not reveal which emails exist.
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::new();
    let (token, _) = app.signup("a@b.com", "longenough1").await;

    let authorized = app.request("GET", "/auth/me", None, Some(&token), None).await;
    assert_eq!(authorized.status, StatusCode::OK);
    assert_eq!(authorized.body["email"], "a@b.com");

    let claims = app.token_issuer().verify_access(&token).unwrap();
    assert_eq!(authorized.body["id"], claims.user_id().to_string());

    let anonymous = app.request("GET", "/auth/me", None, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forged = app
        .request("GET", "/auth/me", None, Some("garbage-token"), None)
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn healthz_answers() {
    let app = TestApp::new();

    let response = app.request("GET", "/healthz", None, None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    let app = TestApp::new();

    let response = app.request("GET", "/nope", None, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}
