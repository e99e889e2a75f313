// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod images;
pub mod password;
pub mod search;
pub mod validation;

pub use images::ImageStore;
pub use search::{find_similar, SimilarUser};
pub use validation::{validate_hike_form, FormError};
