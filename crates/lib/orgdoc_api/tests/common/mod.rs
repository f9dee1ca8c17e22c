//! Shared test harness: ephemeral PostgreSQL, app state, request helpers.
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use sqlx::PgPool;
use tower::ServiceExt;

use orgdoc_api::{AppState, config::ApiConfig};
use orgdoc_core::db::DbManager;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_RESET_SECRET: &str = "test-reset-secret";

/// Start an ephemeral PostgreSQL instance and run migrations.
///
/// Returns `None` (after printing a notice) when PostgreSQL binaries
/// are not installed, so the suite skips instead of failing.
pub async fn start_db() -> Option<(DbManager, PgPool)> {
    let Ok(mut db) = DbManager::ephemeral().await else {
        eprintln!("skipping: pg_config not found on PATH");
        return None;
    };
    db.setup().await.expect("db setup");
    db.start().await.expect("db start");

    let pool = PgPool::connect(&db.connection_url())
        .await
        .expect("connect to ephemeral PG");
    orgdoc_api::migrate(&pool).await.expect("migrate");

    Some((db, pool))
}

/// Application state wired with the test secrets.
pub fn test_state(pool: PgPool, database_url: &str) -> AppState {
    AppState::new(
        pool,
        ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            database_url: database_url.into(),
            jwt_secret: TEST_JWT_SECRET.into(),
            reset_secret: TEST_RESET_SECRET.into(),
            access_token_ttl_secs: orgdoc_core::auth::tokens::ACCESS_TOKEN_TTL_SECS,
            refresh_token_ttl_secs: orgdoc_core::auth::tokens::REFRESH_TOKEN_TTL_SECS,
        },
    )
}

/// Fire a request at the router.
///
/// `token` goes out as `Authorization: Bearer <token>`, `cookie` as a
/// raw `Cookie` header.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).expect("serialize body")))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };
    app.clone().oneshot(request).await.expect("request")
}

/// Read a response body as JSON (`Null` when empty).
pub async fn read_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).expect("parse JSON")
}

/// Log in and return the access token and the refresh cookie pair
/// (`orgdoc_refresh=<value>`).
pub async fn login(app: &Router, username: &str, password: &str) -> (String, String) {
    let resp = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK, "login as {username}");

    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("cookie str")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string();

    let body = read_json(resp).await;
    let access = body["accessToken"]
        .as_str()
        .expect("accessToken")
        .to_string();
    (access, cookie)
}
