// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hike form validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::hike::{form_field, HikeForm, NewHike};

/// Largest distance a hike may record.
pub const MAX_DISTANCE_KM: f64 = 99.9;

/// The only field allowed (and required, when filled) to hold a URL.
const MAP_LINK_FIELD: &str = "map_link";

/// Scheme URLs, `www.` hosts, or bare `name.tld` domains.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://\S+|www\.\S+|\b[a-z0-9-]+(\.[a-z0-9-]+)*\.[a-z]{2,}\b)")
        .expect("URL pattern is valid")
});

/// Why a hike form was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingValues,

    #[error("Distance must be a number.")]
    InvalidNumber,

    #[error("Distance must be between 0 and 99.9 km.")]
    OutOfRange,

    #[error("Links are only accepted in the map link field.")]
    UnacceptedUrl,

    #[error("Map link must be a valid URL.")]
    InvalidUrl,
}

impl FormError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            FormError::MissingValues => "missing_values",
            FormError::InvalidNumber => "invalid_number",
            FormError::OutOfRange => "out_of_range",
            FormError::UnacceptedUrl => "unaccepted_url",
            FormError::InvalidUrl => "invalid_url",
        }
    }
}

impl From<FormError> for crate::error::AppError {
    fn from(err: FormError) -> Self {
        crate::error::AppError::Rejected(err.to_string())
    }
}

/// Check a hike form. Rules run in order and the first failure is returned.
pub fn validate_hike_form(form: &HikeForm) -> Option<FormError> {
    let fields = form.fields();

    let missing_required = fields.iter().any(|(name, value)| {
        value.is_empty() && form_field(name).is_some_and(|field| field.required)
    });
    if missing_required {
        return Some(FormError::MissingValues);
    }

    let distance = match parse_distance(&form.distance_km) {
        Ok(distance) => distance,
        Err(err) => return Some(err),
    };
    if !(0.0..=MAX_DISTANCE_KM).contains(&distance) {
        return Some(FormError::OutOfRange);
    }

    for (name, value) in fields {
        if name != MAP_LINK_FIELD && contains_url(value) {
            return Some(FormError::UnacceptedUrl);
        }
    }
    if !form.map_link.is_empty() && !contains_url(&form.map_link) {
        return Some(FormError::InvalidUrl);
    }

    None
}

/// Validate a form and convert it into an insertable hike.
pub fn validated_hike(form: &HikeForm) -> Result<NewHike, FormError> {
    if let Some(err) = validate_hike_form(form) {
        return Err(err);
    }
    Ok(NewHike {
        hike_date: form.hike_date.clone(),
        area_name: form.area_name.clone(),
        trailhead: form.trailhead.clone(),
        trails_cs: form.trails_cs.clone(),
        distance_km: parse_distance(&form.distance_km)?,
        image_url: non_empty(&form.image_url),
        image_alt: non_empty(&form.image_alt),
        map_link: non_empty(&form.map_link),
        other_info: non_empty(&form.other_info),
    })
}

/// Digits and decimal points only, and it must parse.
fn parse_distance(raw: &str) -> Result<f64, FormError> {
    if !raw.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(FormError::InvalidNumber);
    }
    raw.parse().map_err(|_| FormError::InvalidNumber)
}

/// Whether `text` contains something that looks like a URL.
pub fn contains_url(text: &str) -> bool {
    URL_PATTERN.is_match(text)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
