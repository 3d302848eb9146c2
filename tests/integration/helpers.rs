//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gatekey_api::state::AppState;
use gatekey_auth::session::SessionManager;
use gatekey_auth::token::TokenIssuer;
use gatekey_core::config::AppConfig;
use gatekey_core::config::auth::AuthConfig;
use gatekey_database::MemoryStore;

/// Signing secret shared with [`TestApp::token_issuer`].
const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Test application context over the in-memory store.
pub struct TestApp {
    /// The axum router for making test requests.
    pub router: Router,
    /// The configuration the app was built with.
    pub config: AppConfig,
}

/// A collected response: status, headers, and parsed JSON body.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application backed by a fresh memory store.
    pub fn new() -> Self {
        let config = AppConfig {
            server: Default::default(),
            database: Default::default(),
            auth: AuthConfig {
                jwt_secret: TEST_JWT_SECRET.to_string(),
                ..AuthConfig::default()
            },
            cookie: Default::default(),
            logging: Default::default(),
        };

        let store = Arc::new(MemoryStore::new());
        let token_issuer = Arc::new(TokenIssuer::new(&config.auth));
        let session_manager = Arc::new(SessionManager::new(
            store.clone(),
            store,
            Arc::clone(&token_issuer),
            &config.auth,
        ));

        let state = AppState::new(Arc::new(config.clone()), session_manager, token_issuer);

        Self {
            router: gatekey_api::build_router(state),
            config,
        }
    }

    /// An issuer sharing the app's signing secret, for decoding tokens in
    /// assertions.
    pub fn token_issuer(&self) -> TokenIssuer {
        TokenIssuer::new(&self.config.auth)
    }

    /// Make a request against the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        bearer: Option<&str>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie.to_string());
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sign up a user and return (access token, refresh cookie pair).
    pub async fn signup(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/auth/signup",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        let token = response.access_token();
        let cookie = response
            .refresh_cookie_pair()
            .expect("signup must set the refresh cookie");
        (token, cookie)
    }
}

impl TestResponse {
    /// The `accessToken` field of the body.
    pub fn access_token(&self) -> String {
        self.body
            .get("accessToken")
            .and_then(Value::as_str)
            .expect("response body must carry accessToken")
            .to_string()
    }

    /// The full `Set-Cookie` header for the refresh cookie, if present.
    pub fn refresh_set_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("gk_refresh="))
            .map(String::from)
    }

    /// The `name=value` pair of the refresh cookie, ready to send back.
    pub fn refresh_cookie_pair(&self) -> Option<String> {
        let set_cookie = self.refresh_set_cookie()?;
        let pair = set_cookie.split(';').next()?.trim().to_string();
        // An empty value is a removal, not a usable cookie.
        (pair != "gk_refresh=").then_some(pair)
    }

    /// Whether the response instructs the browser to drop the cookie.
    pub fn clears_refresh_cookie(&self) -> bool {
        self.refresh_set_cookie()
            .is_some_and(|v| v.starts_with("gk_refresh=;") || v.contains("Max-Age=0"))
    }
}
