//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User row from the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    /// Always stored lowercase
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Id and name only, for attributing hikes to their poster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

/// Direction of a follow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowAction {
    Follow,
    Unfollow,
}
