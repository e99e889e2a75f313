// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Hikelog: a small multi-user hiking journal
//!
//! This crate provides the backend for logging hikes, following other
//! hikers, and searching for users by name.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::HikeDb;
use services::ImageStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: HikeDb,
    pub image_store: ImageStore,
}
