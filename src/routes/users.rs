// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User pages, user search, following and the feed.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, Uri},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{require_auth, session_user, AuthUser};
use crate::models::{FeedHike, FollowAction, Hike};
use crate::services::SimilarUser;
use crate::AppState;

/// Longest accepted search query, in characters.
const MAX_QUERY_CHARS: usize = 14;

/// Routes for user pages. The guard is needed for the POST half of the
/// user page, so the state is taken here.
pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let guard = || middleware::from_fn_with_state(state.clone(), require_auth);

    Router::new()
        .route("/", get(index))
        .route("/users", get(user_search))
        .route(
            "/users/{username}",
            get(user_page).merge(post(user_page_action).route_layer(guard())),
        )
        .route("/follow/{username}", post(follow).route_layer(guard()))
        .route("/unfollow/{username}", post(unfollow).route_layer(guard()))
        .route("/feed", get(feed).route_layer(guard()))
}

pub fn user_path(username: &str) -> String {
    format!("/users/{}", urlencoding::encode(username))
}

// ─── Index ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct IndexView {
    pub logged_in: bool,
}

/// Logged-in users land on their own page.
async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    match session_user(&jar, &state.config.session_signing_key) {
        Some(user) => Redirect::to(&user_path(&user.username)).into_response(),
        None => Json(IndexView { logged_in: false }).into_response(),
    }
}

// ─── User Page ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserPageView {
    pub username: String,
    /// Image of the user's most recent hike
    pub profile_image: Option<String>,
    pub hikes: Vec<Hike>,
    /// Viewer owns this page and may edit or delete hikes
    pub is_owner: bool,
    pub is_following: bool,
    /// One-line notice about what the viewer just did
    pub context_message: Option<String>,
}

/// A user's most recent hikes.
async fn user_page(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<UserPageView>> {
    let user = state
        .db
        .get_user_by_username(&username)
        .await
        .ok_or_else(|| AppError::Rejected("User not found.".to_string()))?;

    let hikes = state.db.get_hikes(user.id).await;
    let viewer = session_user(&jar, &state.config.session_signing_key);
    let is_owner = viewer.as_ref().is_some_and(|v| v.user_id == user.id);

    let is_following = match &viewer {
        Some(v) if !is_owner => state.db.is_following(v.user_id, user.id).await,
        _ => false,
    };

    let context_message = viewer.as_ref().and_then(|v| {
        let referrer = headers
            .get(header::REFERER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("");
        context_message(referrer, uri.query().unwrap_or(""), &v.username)
    });

    let profile_image = Some(state.db.get_hike_img_src(user.id).await).filter(|s| !s.is_empty());

    Ok(Json(UserPageView {
        username: user.username,
        profile_image,
        hikes,
        is_owner,
        is_following,
        context_message,
    }))
}

#[derive(Deserialize)]
struct HikeActionForm {
    /// `del_<id>` or `edit_<id>`
    edit_hike: String,
}

/// Edit or delete buttons on the owner's page.
async fn user_page_action(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
    Form(form): Form<HikeActionForm>,
) -> Result<Redirect> {
    if !user.username.eq_ignore_ascii_case(&username) {
        return Err(AppError::Unauthorized);
    }

    let (action, hike_id) = form
        .edit_hike
        .split_once('_')
        .ok_or_else(|| AppError::BadRequest("Malformed hike action".to_string()))?;
    let hike_id: i64 = hike_id
        .parse()
        .map_err(|_| AppError::BadRequest("Malformed hike id".to_string()))?;

    match action {
        "del" => {
            let deleted = state.db.delete_hike(hike_id, user.user_id).await?;
            tracing::info!(user_id = user.user_id, hike_id, deleted, "Hike delete requested");
            Ok(Redirect::to(&format!("{}?deleted", user_path(&user.username))))
        }
        "edit" => Ok(Redirect::to(&format!("/edit-hike/{hike_id}"))),
        other => Err(AppError::BadRequest(format!("Unknown hike action: {other}"))),
    }
}

/// Notice shown on the user page after login, posting, editing or
/// deleting, based on where the visitor came from.
///
/// `query` is the user page's own query string.
pub fn context_message(referrer: &str, query: &str, username: &str) -> Option<String> {
    if query.contains("my-hikes") {
        return None;
    }
    if query.contains("del") {
        return Some("Hike deleted.".to_string());
    }
    if query.contains("cancel") {
        return Some("Edits discarded.".to_string());
    }

    let segments: Vec<&str> = referrer.split('/').collect();
    if segments.contains(&"login") {
        Some(format!("Logged in as {}.", username.to_uppercase()))
    } else if segments.contains(&"new-hike") {
        Some("New hike added.".to_string())
    } else if segments.contains(&"edit-hike") {
        Some("Hike saved.".to_string())
    } else {
        None
    }
}

// ─── Search ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchParams {
    user_search: Option<String>,
}

#[derive(Serialize, Default)]
pub struct SearchView {
    pub query: Option<String>,
    pub results: Vec<SimilarUser>,
    pub no_match: bool,
}

/// Search users by name. An exact match goes straight to that user's page.
async fn user_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let Some(raw) = params.user_search else {
        return Ok(Json(SearchView::default()).into_response());
    };

    let query = raw.to_lowercase();
    let length = query.chars().count();
    if length == 0 || length > MAX_QUERY_CHARS {
        return Err(AppError::Rejected(
            "Search must be between 1 and 14 characters.".to_string(),
        ));
    }

    if let Some(user) = state.db.get_user_by_username(&query).await {
        return Ok(Redirect::to(&user_path(&user.username)).into_response());
    }

    let results = state.db.get_similar_usernames(&query).await;
    tracing::debug!(query = %query, matches = results.len(), "User search");

    Ok(Json(SearchView {
        no_match: results.is_empty(),
        query: Some(query),
        results,
    })
    .into_response())
}

// ─── Follow ──────────────────────────────────────────────────

async fn follow(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<Redirect> {
    change_follow(&state, &user, &username, FollowAction::Follow).await
}

async fn unfollow(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<Redirect> {
    change_follow(&state, &user, &username, FollowAction::Unfollow).await
}

async fn change_follow(
    state: &AppState,
    user: &AuthUser,
    followee: &str,
    action: FollowAction,
) -> Result<Redirect> {
    let followee = followee.to_lowercase();
    if followee == user.username {
        return Err(AppError::BadRequest("You cannot follow yourself.".to_string()));
    }

    state
        .db
        .follow(&user.username, &followee, action)
        .await
        .map_err(|e| match e {
            crate::db::StoreError::NotFound => {
                AppError::NotFound(format!("User {followee} not found"))
            }
            other => other.into(),
        })?;

    tracing::info!(follower = %user.username, followee = %followee, ?action, "Follow updated");
    Ok(Redirect::to(&user_path(&followee)))
}

// ─── Feed ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FeedView {
    pub hikes: Vec<FeedHike>,
}

/// Recent hikes from everyone the user follows.
async fn feed(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<FeedView> {
    let hikes = state
        .db
        .get_feed(&user.username, state.config.feed_limit)
        .await;
    Json(FeedView { hikes })
}
