// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hike form, edit, delete and photo route tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use hikelog::AppState;
use std::sync::Arc;
use tower::ServiceExt;

mod common;
use common::{body_json, form_post, get, hike_body, location};

const BOUNDARY: &str = "hikelogboundary";
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

fn multipart_post(uri: &str, fields: &[(&str, &str)], image: Option<(&str, &[u8])>, cookie: &str) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

const HIKE_FIELDS: [(&str, &str); 6] = [
    ("hike_date", "2024-05-01"),
    ("area_name", "Rancho"),
    ("trailhead", "Deer Hollow"),
    ("trails_cs", "Wildcat Loop"),
    ("distance_km", "7.46"),
    ("image_alt", "View from the ridge"),
];

/// Post a hike and return its id.
async fn post_hike(app: &Router, state: &Arc<AppState>, cookie: &str, username: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(form_post("/new-hike", &hike_body("2024-05-01", "Rancho San Antonio"), Some(cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let user = state.db.get_user_by_username(username).await.unwrap();
    state.db.get_most_recent_hike(user.id).await.unwrap().id
}

#[tokio::test]
async fn test_new_hike_form_schema() {
    let (app, _state, _dir) = common::create_test_app().await;
    let cookie = common::signup_and_login(&app, "frannie").await;

    let response = app.oneshot(get("/new-hike", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let fields = json["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 9);
    assert_eq!(fields[0]["name"], "hike_date");
    assert_eq!(fields[0]["required"], true);
    assert_eq!(fields[8]["required"], false);
    assert!(json["hike_id"].is_null());
}

#[tokio::test]
async fn test_new_hike_is_stored() {
    let (app, state, _dir) = common::create_test_app().await;
    let cookie = common::signup_and_login(&app, "frannie").await;

    let response = app
        .clone()
        .oneshot(form_post("/new-hike", &hike_body("2024-05-01", "Rancho San Antonio"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let area_id = state.db.get_area_id("Rancho San Antonio").await.unwrap();
    assert_eq!(
        state.db.get_trails(area_id).await,
        vec!["Bay Area Ridge", "Wildcat Loop"]
    );

    let response = app.oneshot(get("/users/frannie", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let hikes = json["hikes"].as_array().unwrap();
    assert_eq!(hikes.len(), 1);
    assert_eq!(hikes[0]["distance_km"], 7.5);
    assert_eq!(hikes[0]["area_id"], area_id);
    assert_eq!(hikes[0]["trails_list"][1], "Bay Area Ridge");
    assert_eq!(json["is_owner"], false);
}

#[tokio::test]
async fn test_new_hike_validation() {
    let (app, state, _dir) = common::create_test_app().await;
    let cookie = common::signup_and_login(&app, "frannie").await;
    let base = "hike_date=2024-05-01&area_name=Rancho&trailhead=Deer+Hollow&trails_cs=Wildcat";

    let cases = [
        (format!("{base}&distance_km="), "fill in all required"),
        (format!("{base}&distance_km=7km"), "must be a number"),
        (format!("{base}&distance_km=-1"), "must be a number"),
        (format!("{base}&distance_km=100"), "between 0 and 99.9"),
        (
            format!("{base}&distance_km=5&other_info=see+www.example.com"),
            "only accepted in the map link",
        ),
        (
            format!("{base}&distance_km=5&map_link=not+a+link"),
            "valid URL",
        ),
    ];

    for (body, expected) in cases {
        let response = app
            .clone()
            .oneshot(form_post("/new-hike", &body, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{body}");
        let json = body_json(response).await;
        assert!(json["message"].as_str().unwrap().contains(expected), "{body}: {json}");
    }

    // Nothing was stored
    assert!(state.db.get_area_id("Rancho").await.is_none());
}

#[tokio::test]
async fn test_multipart_upload_and_serve_image() {
    let (app, state, _dir) = common::create_test_app().await;
    let cookie = common::signup_and_login(&app, "frannie").await;

    let response = app
        .clone()
        .oneshot(multipart_post(
            "/new-hike",
            &HIKE_FIELDS,
            Some(("summit.jpg", JPEG)),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let user = state.db.get_user_by_username("frannie").await.unwrap();
    let hike = state.db.get_most_recent_hike(user.id).await.unwrap();
    assert_eq!(hike.image_url.as_deref(), Some("frannie_summit"));
    assert_eq!(hike.image_alt.as_deref(), Some("View from the ridge"));

    let response = app
        .clone()
        .oneshot(get("/users/frannie", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["profile_image"], "frannie_summit");

    let response = app
        .clone()
        .oneshot(get("/images/frannie_summit", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], JPEG);

    let response = app.oneshot(get("/images/frannie_nothing", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_multipart_without_file() {
    let (app, state, _dir) = common::create_test_app().await;
    let cookie = common::signup_and_login(&app, "frannie").await;

    let response = app
        .oneshot(multipart_post("/new-hike", &HIKE_FIELDS, Some(("", &[][..])), &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let user = state.db.get_user_by_username("frannie").await.unwrap();
    let hike = state.db.get_most_recent_hike(user.id).await.unwrap();
    assert_eq!(hike.image_url, None);
}

#[tokio::test]
async fn test_edit_hike_form() {
    let (app, state, _dir) = common::create_test_app().await;
    let owner = common::signup_and_login(&app, "frannie").await;
    let other = common::signup_and_login(&app, "suzette").await;
    let hike_id = post_hike(&app, &state, &owner, "frannie").await;

    let uri = format!("/edit-hike/{hike_id}");
    let response = app.clone().oneshot(get(&uri, Some(&owner))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["hike_id"], hike_id);
    assert_eq!(json["values"]["distance_km"], "7.5");
    assert_eq!(json["values"]["area_name"], "Rancho San Antonio");

    let response = app.clone().oneshot(get(&uri, Some(&other))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(get("/edit-hike/9999", Some(&owner))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_edit_hike_save_and_cancel() {
    let (app, state, _dir) = common::create_test_app().await;
    let owner = common::signup_and_login(&app, "frannie").await;
    let other = common::signup_and_login(&app, "suzette").await;

    // Start with a photo so we can check it survives an edit without one
    let response = app
        .clone()
        .oneshot(multipart_post("/new-hike", &HIKE_FIELDS, Some(("summit.jpg", JPEG)), &owner))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let user = state.db.get_user_by_username("frannie").await.unwrap();
    let hike_id = state.db.get_most_recent_hike(user.id).await.unwrap().id;
    let uri = format!("/edit-hike/{hike_id}");

    let response = app
        .clone()
        .oneshot(form_post(&uri, "action=cancel", Some(&owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users/frannie?cancel");

    let edited = format!("{}&action=save", hike_body("2024-06-02", "Windy Hill"));
    let response = app
        .clone()
        .oneshot(form_post(&uri, &edited, Some(&other)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(form_post(&uri, &edited, Some(&owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users/frannie");

    let hike = state.db.get_hike(user.id, hike_id).await.unwrap();
    assert_eq!(hike.hike_date, "2024-06-02");
    assert_eq!(hike.area_name, "Windy Hill");
    assert_eq!(hike.area_id, state.db.get_area_id("Windy Hill").await.unwrap());
    assert_eq!(hike.image_url.as_deref(), Some("frannie_summit"));

    let invalid = format!("{}&distance_km=200", hike_body("2024-06-02", "Windy Hill"));
    let response = app
        .oneshot(form_post(&uri, &invalid, Some(&owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_page_actions() {
    let (app, state, _dir) = common::create_test_app().await;
    let owner = common::signup_and_login(&app, "frannie").await;
    let other = common::signup_and_login(&app, "suzette").await;
    let hike_id = post_hike(&app, &state, &owner, "frannie").await;

    let response = app
        .clone()
        .oneshot(form_post("/users/frannie", &format!("edit_hike=edit_{hike_id}"), Some(&owner)))
        .await
        .unwrap();
    assert_eq!(location(&response), format!("/edit-hike/{hike_id}"));

    let delete = format!("edit_hike=del_{hike_id}");
    let response = app
        .clone()
        .oneshot(form_post("/users/frannie", &delete, Some(&other)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(form_post("/users/frannie", "edit_hike=nonsense", Some(&owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(form_post("/users/frannie", &delete, Some(&owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users/frannie?deleted");

    let user = state.db.get_user_by_username("frannie").await.unwrap();
    assert!(state.db.get_hike(user.id, hike_id).await.is_none());

    let response = app
        .oneshot(get("/users/frannie?deleted", Some(&owner)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["context_message"], "Hike deleted.");
    assert_eq!(json["is_owner"], true);
}

#[tokio::test]
async fn test_user_page_context_from_referrer() {
    let (app, _state, _dir) = common::create_test_app().await;
    let cookie = common::signup_and_login(&app, "frannie").await;

    let request = Request::builder()
        .uri("/users/frannie")
        .header(header::COOKIE, &cookie)
        .header(header::REFERER, "http://localhost:5173/login")
        .body(Body::empty())
        .unwrap();
    let json = body_json(app.clone().oneshot(request).await.unwrap()).await;
    assert_eq!(json["context_message"], "Logged in as FRANNIE.");

    // Anonymous visitors get no notice
    let request = Request::builder()
        .uri("/users/frannie")
        .header(header::REFERER, "http://localhost:5173/login")
        .body(Body::empty())
        .unwrap();
    let json = body_json(app.oneshot(request).await.unwrap()).await;
    assert!(json["context_message"].is_null());
}

#[tokio::test]
async fn test_unknown_user_page() {
    let (app, _state, _dir) = common::create_test_app().await;
    let response = app.oneshot(get("/users/nobody", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "User not found.");
}
