// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use hikelog::config::Config;
use hikelog::db::HikeDb;
use hikelog::routes::create_router;
use hikelog::services::ImageStore;
use hikelog::AppState;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Test app backed by a throwaway database and image directory.
///
/// The `TempDir` must be kept alive for the duration of the test.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let mut config = Config::test_default();
    config.database_path = dir.path().join("hikes.db");
    config.image_dir = dir.path().join("images");

    let db = HikeDb::new(&config.database_path);
    db.init_schema().await.expect("Failed to create schema");
    let image_store = ImageStore::new(&config.image_dir);

    let state = Arc::new(AppState {
        config,
        db,
        image_store,
    });

    (create_router(state.clone()), state, dir)
}

/// Fresh database with the schema applied.
#[allow(dead_code)]
pub async fn test_db() -> (HikeDb, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = HikeDb::new(dir.path().join("hikes.db"));
    db.init_schema().await.expect("Failed to create schema");
    (db, dir)
}

/// Build a urlencoded POST, optionally with a session cookie.
#[allow(dead_code)]
pub fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a GET, optionally with a session cookie.
#[allow(dead_code)]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Redirect target of a response.
#[allow(dead_code)]
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("No Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Decode a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Sign up a user through the HTTP routes.
#[allow(dead_code)]
pub async fn signup(app: &Router, username: &str, password: &str) {
    let body = format!("username={username}&password={password}&confirmation={password}");
    let response = app
        .clone()
        .oneshot(form_post("/signup", &body, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "signup of {username} failed");
}

/// Log in and return the `Cookie` header value for the session.
#[allow(dead_code)]
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}");
    let response = app
        .clone()
        .oneshot(form_post("/login", &body, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login of {username} failed");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("No session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Sign up and log in, returning the session cookie.
#[allow(dead_code)]
pub async fn signup_and_login(app: &Router, username: &str) -> String {
    signup(app, username, "secret1").await;
    login(app, username, "secret1").await
}

/// A valid urlencoded hike form.
#[allow(dead_code)]
pub fn hike_body(hike_date: &str, area_name: &str) -> String {
    format!(
        "hike_date={hike_date}&area_name={}&trailhead=Deer+Hollow&trails_cs=Wildcat+Loop%2C+Bay+Area+Ridge&distance_km=7.46",
        area_name.replace(' ', "+")
    )
}
