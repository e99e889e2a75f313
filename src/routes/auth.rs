// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login and logout routes.

use axum::{
    extract::State,
    response::Redirect,
    routing::get,
    Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

use crate::db::StoreError;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_session_token, session_cookie, session_removal_cookie};
use crate::models::{AccountError, LoginForm, SignupForm};
use crate::services::password::{hash_password, verify_password};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

/// Fields an account form expects.
#[derive(Serialize)]
pub struct AccountFormView {
    pub form: &'static str,
    pub fields: &'static [&'static str],
}

async fn signup_form() -> Json<AccountFormView> {
    Json(AccountFormView {
        form: "signup",
        fields: &["username", "password", "confirmation"],
    })
}

/// Create an account, then send the user to the login page.
async fn signup(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect> {
    let form = form.normalized();
    form.check()?;

    if state.db.get_user_by_username(&form.username).await.is_some() {
        return Err(AccountError::UsernameTaken.into());
    }

    let iterations = state.config.password_iterations;
    let password = form.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, iterations))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))?;

    match state.db.add_user(&form.username, &password_hash).await {
        Ok(()) => {}
        // Lost a race with a concurrent signup for the same name
        Err(StoreError::Sqlite(rusqlite::Error::SqliteFailure(e, _)))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(AccountError::UsernameTaken.into());
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(username = %form.username, "New user signed up");
    Ok(Redirect::to("/login"))
}

/// Visiting the login page ends any current session.
async fn login_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<AccountFormView>) {
    let jar = jar.remove(session_removal_cookie(state.config.secure_cookies()));
    (
        jar,
        Json(AccountFormView {
            form: "login",
            fields: &["username", "password"],
        }),
    )
}

/// Check credentials and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect)> {
    let form = form.normalized();
    form.check()?;

    let user = state
        .db
        .get_user_by_username(&form.username)
        .await
        .ok_or(AccountError::UserNotFound)?;

    let stored = user.password_hash.clone();
    let password = form.password;
    let verified = tokio::task::spawn_blocking(move || verify_password(&stored, &password))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if !verified {
        tracing::info!(username = %user.username, "Rejected login with wrong password");
        return Err(AccountError::IncorrectPassword.into());
    }

    let token = create_session_token(user.id, &user.username, &state.config.session_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Session token creation failed: {}", e)))?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    let jar = jar.add(session_cookie(token, state.config.secure_cookies()));
    Ok((jar, Redirect::to("/")))
}

/// Clear the session and go home.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(session_removal_cookie(state.config.secure_cookies()));
    (jar, Redirect::to("/"))
}
