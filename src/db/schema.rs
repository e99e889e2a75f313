//! Table definitions.

/// Creates every table if it does not exist yet. Safe to run on each start.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS areas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    area_name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS trails (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    area_id INTEGER NOT NULL REFERENCES areas (id),
    trail_name TEXT NOT NULL,
    UNIQUE (area_id, trail_name)
);

CREATE TABLE IF NOT EXISTS hikes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hike_date TEXT NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users (id),
    area_id INTEGER NOT NULL REFERENCES areas (id),
    area_name TEXT NOT NULL,
    trailhead TEXT NOT NULL,
    trails_cs TEXT NOT NULL,
    distance_km REAL NOT NULL,
    image_url TEXT,
    image_alt TEXT,
    map_link TEXT,
    other_info TEXT
);

CREATE INDEX IF NOT EXISTS idx_hikes_user_date ON hikes (user_id, hike_date);

CREATE TABLE IF NOT EXISTS follows (
    follower_id INTEGER NOT NULL REFERENCES users (id),
    followee_id INTEGER NOT NULL REFERENCES users (id),
    UNIQUE (follower_id, followee_id)
);
";

/// Hike columns in the order the row formatter expects to find them by name.
pub const HIKE_COLUMNS: &str = "id, hike_date, user_id, area_id, area_name, trailhead, \
     trails_cs, distance_km, image_url, image_alt, map_link, other_info";
