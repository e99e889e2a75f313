// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response header middleware.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Headers that lock pages down: JSON views and same-origin photos only.
static SECURITY_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (
        header::CONTENT_SECURITY_POLICY,
        "default-src 'none'; img-src 'self'; frame-ancestors 'none'",
    ),
    // The user page reads the Referer path, so keep it on same-origin hops
    (header::REFERRER_POLICY, "same-origin"),
];

/// Every view depends on the session, so nothing may be cached.
static NO_CACHE_HEADERS: [(HeaderName, &str); 3] = [
    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (header::EXPIRES, "0"),
    (header::PRAGMA, "no-cache"),
];

fn insert_all(headers: &mut HeaderMap, table: &[(HeaderName, &'static str)]) {
    for (name, value) in table {
        headers.insert(name.clone(), HeaderValue::from_static(*value));
    }
}

/// Add security headers to all responses.
pub async fn add_security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    insert_all(response.headers_mut(), &SECURITY_HEADERS);
    response
}

/// Add cache-busting headers to all responses.
pub async fn add_no_cache_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    insert_all(response.headers_mut(), &NO_CACHE_HEADERS);
    response
}
