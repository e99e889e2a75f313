// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! New-hike and edit-hike forms, and stored photos.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::header,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Form, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::StoreError;
use crate::error::{AppError, Result};
use crate::middleware::auth::{require_auth, AuthUser};
use crate::models::hike::{FormField, HIKE_FORM_FIELDS};
use crate::models::{HikeForm, NewHike};
use crate::routes::users::user_path;
use crate::services::images::{content_type, MAX_IMAGE_BYTES};
use crate::services::validation::validated_hike;
use crate::AppState;

/// Room for the photo plus the text fields.
const MAX_SUBMISSION_BYTES: usize = MAX_IMAGE_BYTES + 64 * 1024;

/// Form part carrying the photo upload.
const IMAGE_PART: &str = "image";

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let forms = Router::new()
        .route("/new-hike", get(new_hike_form).post(new_hike))
        .route("/edit-hike/{hike_id}", get(edit_hike_form).post(edit_hike))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES));

    Router::new()
        .merge(forms)
        .route("/images/{image_id}", get(image))
}

// ─── Submission ──────────────────────────────────────────────

/// An uploaded photo.
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Bytes,
}

/// A submitted hike form, either urlencoded or multipart.
pub struct HikeSubmission {
    pub form: HikeForm,
    /// Submit button value; `cancel` abandons an edit
    pub action: Option<String>,
    pub image: Option<UploadedImage>,
}

impl HikeSubmission {
    fn new() -> Self {
        Self {
            form: HikeForm::default(),
            action: None,
            image: None,
        }
    }

    fn set(&mut self, name: &str, value: String) {
        if name == "action" {
            self.action = Some(value);
        } else {
            self.form.set(name, value);
        }
    }

    fn is_cancel(&self) -> bool {
        self.action.as_deref() == Some("cancel")
    }
}

impl<S> FromRequest<S> for HikeSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        let mut submission = HikeSubmission::new();

        if !is_multipart {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            for (name, value) in pairs {
                submission.set(&name, value);
            }
            return Ok(submission);
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == IMAGE_PART {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty part when no file was chosen
                if !filename.is_empty() && !bytes.is_empty() {
                    submission.image = Some(UploadedImage { filename, bytes });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                submission.set(&name, value);
            }
        }

        Ok(submission)
    }
}

// ─── Views ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HikeFormView {
    pub fields: &'static [FormField],
    /// Current values, empty for a new hike
    pub values: HikeForm,
    /// Set when editing
    pub hike_id: Option<i64>,
}

async fn new_hike_form() -> Json<HikeFormView> {
    Json(HikeFormView {
        fields: &HIKE_FORM_FIELDS,
        values: HikeForm::default(),
        hike_id: None,
    })
}

async fn edit_hike_form(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(hike_id): Path<i64>,
) -> Result<Json<HikeFormView>> {
    let hike = state
        .db
        .get_hike(user.user_id, hike_id)
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(HikeFormView {
        fields: &HIKE_FORM_FIELDS,
        values: hike.to_form(),
        hike_id: Some(hike.id),
    }))
}

// ─── Saving ──────────────────────────────────────────────────

/// Validate a submission. Photo identifiers only come from uploads, so any
/// `image_url` text sent with the form is ignored.
fn checked_hike(submission: &HikeSubmission) -> Result<NewHike> {
    let mut form = submission.form.clone();
    form.image_url.clear();
    Ok(validated_hike(&form)?)
}

/// Store the area and its trails, returning the area id.
async fn save_area(state: &AppState, hike: &NewHike) -> Result<i64> {
    state.db.add_area(&hike.area_name).await?;
    let area_id = state
        .db
        .get_area_id(&hike.area_name)
        .await
        .ok_or_else(|| AppError::Database(format!("area {} missing after insert", hike.area_name)))?;
    state.db.add_trails(area_id, &hike.trails_cs).await?;
    Ok(area_id)
}

async fn store_image(state: &AppState, user: &AuthUser, image: &UploadedImage) -> Result<String> {
    Ok(state
        .image_store
        .store(&user.username, &image.filename, &image.bytes)
        .await?)
}

/// Log a new hike.
async fn new_hike(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    submission: HikeSubmission,
) -> Result<Redirect> {
    let mut hike = checked_hike(&submission)?;
    if let Some(image) = &submission.image {
        hike.image_url = Some(store_image(&state, &user, image).await?);
    }

    let area_id = save_area(&state, &hike).await?;
    let hike_id = state.db.add_hike(user.user_id, area_id, &hike).await?;

    tracing::info!(user_id = user.user_id, hike_id, area = %hike.area_name, "New hike logged");
    Ok(Redirect::to("/"))
}

/// Save edits to a hike, or discard them on cancel.
async fn edit_hike(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(hike_id): Path<i64>,
    submission: HikeSubmission,
) -> Result<Redirect> {
    let page = user_path(&user.username);
    if submission.is_cancel() {
        return Ok(Redirect::to(&format!("{page}?cancel")));
    }

    let existing = state
        .db
        .get_hike(user.user_id, hike_id)
        .await
        .ok_or(AppError::Unauthorized)?;

    let mut hike = checked_hike(&submission)?;
    hike.image_url = match &submission.image {
        Some(image) => Some(store_image(&state, &user, image).await?),
        None => existing.image_url,
    };

    let area_id = save_area(&state, &hike).await?;
    match state.db.update_hike(hike_id, user.user_id, area_id, &hike).await {
        Ok(()) => {}
        // Deleted between the ownership check and the update
        Err(StoreError::NotFound) => return Err(AppError::Unauthorized),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = user.user_id, hike_id, "Hike updated");
    Ok(Redirect::to(&page))
}

// ─── Photos ──────────────────────────────────────────────────

async fn image(
    State(state): State<Arc<AppState>>,
    Path(image_id): Path<String>,
) -> Result<Response> {
    let bytes = state.image_store.load(&image_id).await?;
    Ok(([(header::CONTENT_TYPE, content_type(&bytes))], bytes).into_response())
}
