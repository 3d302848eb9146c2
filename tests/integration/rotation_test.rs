//! Integration tests for the refresh rotation and signout flows.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn refresh_without_cookie_is_rejected_and_cleared() {
    let app = TestApp::new();

    let response = app.request("POST", "/auth/refresh", None, None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.clears_refresh_cookie());
}

#[tokio::test]
async fn refresh_rotates_the_cookie_once() {
    let app = TestApp::new();
    let (_, r0) = app.signup("a@b.com", "longenough1").await;

    // First presentation rotates.
    let rotated = app
        .request("POST", "/auth/refresh", None, None, Some(&r0))
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    let r1 = rotated
        .refresh_cookie_pair()
        .expect("rotation must set a fresh cookie");
    assert_ne!(r0, r1);

    let issuer = app.token_issuer();
    let claims = issuer.verify_access(&rotated.access_token()).unwrap();

    // Replaying the consumed cookie fails and clears it.
    let replayed = app
        .request("POST", "/auth/refresh", None, None, Some(&r0))
        .await;
    assert_eq!(replayed.status, StatusCode::UNAUTHORIZED);
    assert!(replayed.clears_refresh_cookie());

    // The fresh cookie is unaffected by the replay attempt.
    let again = app
        .request("POST", "/auth/refresh", None, None, Some(&r1))
        .await;
    assert_eq!(again.status, StatusCode::OK);
    let next_claims = issuer.verify_access(&again.access_token()).unwrap();
    assert_eq!(claims.user_id(), next_claims.user_id());
    assert_ne!(claims.session_id(), next_claims.session_id());
}

#[tokio::test]
async fn chained_rotation_keeps_old_cookies_dead() {
    let app = TestApp::new();
    let (_, r0) = app.signup("a@b.com", "longenough1").await;

    let first = app
        .request("POST", "/auth/refresh", None, None, Some(&r0))
        .await;
    let r1 = first.refresh_cookie_pair().unwrap();
    let second = app
        .request("POST", "/auth/refresh", None, None, Some(&r1))
        .await;
    assert_eq!(second.status, StatusCode::OK);

    let stale = app
        .request("POST", "/auth/refresh", None, None, Some(&r0))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signout_revokes_the_session() {
    let app = TestApp::new();
    let (_, cookie) = app.signup("a@b.com", "longenough1").await;

    let signout = app
        .request("POST", "/auth/signout", None, None, Some(&cookie))
        .await;
    assert_eq!(signout.status, StatusCode::NO_CONTENT);
    assert!(signout.clears_refresh_cookie());

    // The revoked secret no longer refreshes.
    let refresh = app
        .request("POST", "/auth/refresh", None, None, Some(&cookie))
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signout_without_cookie_is_a_no_op() {
    let app = TestApp::new();

    let response = app.request("POST", "/auth/signout", None, None, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn access_token_survives_its_sessions_revocation() {
    let app = TestApp::new();
    let (token, cookie) = app.signup("a@b.com", "longenough1").await;

    app.request("POST", "/auth/signout", None, None, Some(&cookie))
        .await;

    // Stateless verification: the short-lived token outlives the session.
    let me = app.request("GET", "/auth/me", None, Some(&token), None).await;
    assert_eq!(me.status, StatusCode::OK);
}
