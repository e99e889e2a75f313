// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite access with typed operations.
//!
//! Every operation opens its own connection, runs its statement(s) and
//! closes the connection again. Provides:
//! - Users (signup, lookup, search)
//! - Areas and trails (insert-or-ignore catalogs)
//! - Hikes (ownership-scoped reads and writes)
//! - Follows and the feed
//!
//! Read operations log store failures and return an empty result; write
//! operations hand the error back to the caller.

use std::path::{Path, PathBuf};

use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

use crate::db::schema::{CREATE_TABLES, HIKE_COLUMNS};
use crate::db::StoreError;
use crate::models::hike::split_trails;
use crate::models::{FeedHike, FollowAction, Hike, NewHike, User, UserSummary};
use crate::services::search::{find_similar, SimilarUser};

/// Number of hikes shown on a user's page.
pub const USER_PAGE_HIKES: u32 = 10;

type Result<T> = std::result::Result<T, StoreError>;

/// SQLite database handle. Holds only the file path.
#[derive(Debug, Clone)]
pub struct HikeDb {
    path: PathBuf,
}

impl HikeDb {
    /// Create a handle for the database file at `path`.
    ///
    /// Nothing is opened until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` on a fresh connection on the blocking pool.
    async fn with_conn<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<T> {
            let conn = Connection::open(&path)?;
            let value = op(&conn)?;
            conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
            Ok(value)
        })
        .await?
    }

    /// Create all tables if they do not exist.
    pub async fn init_schema(&self) -> Result<()> {
        self.with_conn(|conn| Ok(conn.execute_batch(CREATE_TABLES)?))
            .await?;
        tracing::info!(path = %self.path.display(), "Database schema ready");
        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a user. Fails on blank values or a taken username.
    pub async fn add_user(&self, username: &str, password_hash: &str) -> Result<()> {
        if username.trim().is_empty() || password_hash.trim().is_empty() {
            return Err(StoreError::MissingValue);
        }
        let username = username.to_string();
        let password_hash = password_hash.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
                params![username, password_hash],
            )?;
            Ok(())
        })
        .await
    }

    /// Get a user by username (case-insensitive).
    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        let username = username.to_string();
        let result = self
            .with_conn(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, username, password_hash FROM users WHERE username = ?1",
                        params![username],
                        |row| {
                            Ok(User {
                                id: row.get("id")?,
                                username: row.get("username")?,
                                password_hash: row.get("password_hash")?,
                            })
                        },
                    )
                    .optional()?)
            })
            .await;
        logged_or_default("get_user_by_username", result)
    }

    /// Get a user's id and name by id.
    pub async fn get_username_from_user_id(&self, user_id: i64) -> Option<UserSummary> {
        let result = self
            .with_conn(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, username FROM users WHERE id = ?1",
                        params![user_id],
                        |row| {
                            Ok(UserSummary {
                                id: row.get("id")?,
                                username: row.get("username")?,
                            })
                        },
                    )
                    .optional()?)
            })
            .await;
        logged_or_default("get_username_from_user_id", result)
    }

    /// All usernames, in signup order.
    pub async fn get_all_usernames(&self) -> Vec<String> {
        let result = self
            .with_conn(|conn| {
                let mut stmt = conn.prepare("SELECT username FROM users ORDER BY id")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                Ok(names)
            })
            .await;
        logged_or_default("get_all_usernames", result)
    }

    /// Usernames resembling `query`, best match first.
    pub async fn get_similar_usernames(&self, query: &str) -> Vec<SimilarUser> {
        let usernames = self.get_all_usernames().await;
        find_similar(&usernames, query)
    }

    // ─── Area & Trail Operations ─────────────────────────────────

    /// Insert an area; an existing name is left as is.
    pub async fn add_area(&self, area_name: &str) -> Result<()> {
        if area_name.trim().is_empty() {
            return Err(StoreError::MissingValue);
        }
        let area_name = area_name.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO areas (area_name) VALUES (?1)",
                params![area_name],
            )?;
            Ok(())
        })
        .await
    }

    /// Look up an area's id by name.
    pub async fn get_area_id(&self, area_name: &str) -> Option<i64> {
        let area_name = area_name.to_string();
        let result = self
            .with_conn(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id FROM areas WHERE area_name = ?1",
                        params![area_name],
                        |row| row.get(0),
                    )
                    .optional()?)
            })
            .await;
        logged_or_default("get_area_id", result)
    }

    /// Insert each trail of a comma-separated list under `area_id`.
    pub async fn add_trails(&self, area_id: i64, trails_cs: &str) -> Result<()> {
        let trail_names = split_trails(trails_cs);
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare("INSERT OR IGNORE INTO trails (area_id, trail_name) VALUES (?1, ?2)")?;
            for trail_name in trail_names.iter().filter(|t| !t.trim().is_empty()) {
                stmt.execute(params![area_id, trail_name])?;
            }
            Ok(())
        })
        .await
    }

    /// Trail names recorded for an area, alphabetically.
    pub async fn get_trails(&self, area_id: i64) -> Vec<String> {
        let result = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT trail_name FROM trails WHERE area_id = ?1 ORDER BY trail_name",
                )?;
                let names = stmt
                    .query_map(params![area_id], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                Ok(names)
            })
            .await;
        logged_or_default("get_trails", result)
    }

    // ─── Hike Operations ─────────────────────────────────────────

    /// Insert a hike for `user_id`. Returns the new hike id.
    pub async fn add_hike(&self, user_id: i64, area_id: i64, hike: &NewHike) -> Result<i64> {
        let hike = hike.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO hikes (hike_date, user_id, area_id, area_name, trailhead, \
                 trails_cs, distance_km, image_url, image_alt, map_link, other_info) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    hike.hike_date,
                    user_id,
                    area_id,
                    hike.area_name,
                    hike.trailhead,
                    hike.trails_cs,
                    hike.distance_km,
                    hike.image_url,
                    hike.image_alt,
                    hike.map_link,
                    hike.other_info,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Overwrite a hike owned by `user_id`.
    ///
    /// Returns `NotFound` when no hike with that id belongs to the user.
    pub async fn update_hike(
        &self,
        hike_id: i64,
        user_id: i64,
        area_id: i64,
        hike: &NewHike,
    ) -> Result<()> {
        let hike = hike.clone();
        let updated = self
            .with_conn(move |conn| {
                Ok(conn.execute(
                    "UPDATE hikes SET hike_date = ?1, area_id = ?2, area_name = ?3, \
                     trailhead = ?4, trails_cs = ?5, distance_km = ?6, image_url = ?7, \
                     image_alt = ?8, map_link = ?9, other_info = ?10 \
                     WHERE id = ?11 AND user_id = ?12",
                    params![
                        hike.hike_date,
                        area_id,
                        hike.area_name,
                        hike.trailhead,
                        hike.trails_cs,
                        hike.distance_km,
                        hike.image_url,
                        hike.image_alt,
                        hike.map_link,
                        hike.other_info,
                        hike_id,
                        user_id,
                    ],
                )?)
            })
            .await?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Delete a hike owned by `user_id`. Returns whether a row was removed.
    pub async fn delete_hike(&self, hike_id: i64, user_id: i64) -> Result<bool> {
        let deleted = self
            .with_conn(move |conn| {
                Ok(conn.execute(
                    "DELETE FROM hikes WHERE id = ?1 AND user_id = ?2",
                    params![hike_id, user_id],
                )?)
            })
            .await?;
        Ok(deleted > 0)
    }

    /// A user's most recent hikes, newest first.
    pub async fn get_hikes(&self, user_id: i64) -> Vec<Hike> {
        let sql = format!(
            "SELECT {HIKE_COLUMNS} FROM hikes WHERE user_id = ?1 \
             ORDER BY hike_date DESC, id DESC LIMIT ?2"
        );
        let result = self
            .with_conn(move |conn| format_hikes(conn, &sql, params![user_id, USER_PAGE_HIKES]))
            .await;
        logged_or_default("get_hikes", result)
    }

    /// A single hike, only if it belongs to `user_id`.
    pub async fn get_hike(&self, user_id: i64, hike_id: i64) -> Option<Hike> {
        let sql = format!("SELECT {HIKE_COLUMNS} FROM hikes WHERE id = ?1 AND user_id = ?2");
        let result = self
            .with_conn(move |conn| format_hikes(conn, &sql, params![hike_id, user_id]))
            .await;
        logged_or_default("get_hike", result).into_iter().next()
    }

    /// The user's newest hike.
    pub async fn get_most_recent_hike(&self, user_id: i64) -> Option<Hike> {
        let sql = format!(
            "SELECT {HIKE_COLUMNS} FROM hikes WHERE user_id = ?1 \
             ORDER BY hike_date DESC, id DESC LIMIT 1"
        );
        let result = self
            .with_conn(move |conn| format_hikes(conn, &sql, params![user_id]))
            .await;
        logged_or_default("get_most_recent_hike", result)
            .into_iter()
            .next()
    }

    /// Image of the user's newest hike, or an empty string.
    pub async fn get_hike_img_src(&self, user_id: i64) -> String {
        self.get_most_recent_hike(user_id)
            .await
            .and_then(|hike| hike.image_url)
            .unwrap_or_default()
    }

    // ─── Follow Operations ───────────────────────────────────────

    /// Follow or unfollow `followee` on behalf of `follower`.
    ///
    /// Both directions are idempotent. Unknown usernames give `NotFound`.
    pub async fn follow(
        &self,
        follower: &str,
        followee: &str,
        action: FollowAction,
    ) -> Result<()> {
        let follower = follower.to_string();
        let followee = followee.to_string();
        self.with_conn(move |conn| {
            let follower_id = user_id_for(conn, &follower)?.ok_or(StoreError::NotFound)?;
            let followee_id = user_id_for(conn, &followee)?.ok_or(StoreError::NotFound)?;
            let sql = match action {
                FollowAction::Follow => {
                    "INSERT OR IGNORE INTO follows (follower_id, followee_id) VALUES (?1, ?2)"
                }
                FollowAction::Unfollow => {
                    "DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2"
                }
            };
            conn.execute(sql, params![follower_id, followee_id])?;
            Ok(())
        })
        .await?;
        tracing::debug!(?action, "Follow relationship updated");
        Ok(())
    }

    /// Ids of the users `username` follows.
    pub async fn get_followees(&self, username: &str) -> Vec<i64> {
        let username = username.to_string();
        let result = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT f.followee_id FROM follows f \
                     JOIN users u ON u.id = f.follower_id \
                     WHERE u.username = ?1 ORDER BY f.followee_id",
                )?;
                let ids = stmt
                    .query_map(params![username], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<i64>>>()?;
                Ok(ids)
            })
            .await;
        logged_or_default("get_followees", result)
    }

    /// Whether `follower_id` follows `followee_id`.
    pub async fn is_following(&self, follower_id: i64, followee_id: i64) -> bool {
        let result = self
            .with_conn(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT 1 FROM follows WHERE follower_id = ?1 AND followee_id = ?2",
                        params![follower_id, followee_id],
                        |_| Ok(()),
                    )
                    .optional()?
                    .is_some())
            })
            .await;
        logged_or_default("is_following", result)
    }

    /// Newest hikes posted by the users `username` follows.
    pub async fn get_feed(&self, username: &str, limit: u32) -> Vec<FeedHike> {
        let username = username.to_string();
        let columns = HIKE_COLUMNS
            .split(", ")
            .map(|c| format!("h.{c} AS {c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {columns}, poster.username AS poster FROM hikes h \
             JOIN follows f ON f.followee_id = h.user_id \
             JOIN users follower ON follower.id = f.follower_id \
             JOIN users poster ON poster.id = h.user_id \
             WHERE follower.username = ?1 \
             ORDER BY h.hike_date DESC, h.id DESC LIMIT ?2"
        );
        let result = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let feed = stmt
                    .query_map(params![username, limit], |row| {
                        Ok(FeedHike {
                            hike: format_hike(row)?,
                            username: row.get("poster")?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(feed)
            })
            .await;
        logged_or_default("get_feed", result)
    }
}

fn user_id_for(conn: &Connection, username: &str) -> Result<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT id FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .optional()?)
}

/// Run a hike query and format every row.
fn format_hikes<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Hike>> {
    let mut stmt = conn.prepare(sql)?;
    let hikes = stmt
        .query_map(params, format_hike)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(hikes)
}

/// Map a row to a [`Hike`] by column name, adding derived fields.
pub(crate) fn format_hike(row: &Row<'_>) -> rusqlite::Result<Hike> {
    let trails_cs: String = row.get("trails_cs")?;
    let distance_km: f64 = row.get("distance_km")?;
    Ok(Hike {
        id: row.get("id")?,
        hike_date: row.get("hike_date")?,
        user_id: integer_column(row, "user_id")?,
        area_id: integer_column(row, "area_id")?,
        area_name: row.get("area_name")?,
        trailhead: row.get("trailhead")?,
        trails_list: split_trails(&trails_cs),
        trails_cs,
        distance_km: round_tenths(distance_km),
        image_url: row.get("image_url")?,
        image_alt: row.get("image_alt")?,
        map_link: row.get("map_link")?,
        other_info: row.get("other_info")?,
    })
}

/// Read an integer column that may have been stored as text.
fn integer_column(row: &Row<'_>, name: &str) -> rusqlite::Result<i64> {
    let index = row.as_ref().column_index(name)?;
    match row.get_ref(index)? {
        ValueRef::Integer(value) => Ok(value),
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| rusqlite::Error::InvalidColumnType(index, name.to_string(), Type::Text)),
        other => Err(rusqlite::Error::InvalidColumnType(
            index,
            name.to_string(),
            other.data_type(),
        )),
    }
}

/// Round to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Log a failed read and fall back to an empty result.
fn logged_or_default<T: Default>(operation: &'static str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, operation, "Store read failed");
        T::default()
    })
}
