// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod account;
pub mod hike;
pub mod user;

pub use account::{AccountError, LoginForm, SignupForm};
pub use hike::{FeedHike, Hike, HikeForm, NewHike};
pub use user::{FollowAction, User, UserSummary};
