// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hike photo storage.
//!
//! Photos are stored as flat files named by an identifier derived from the
//! uploader's username and the uploaded file's name. The identifier is what
//! gets saved as a hike's `image_url`.

use std::path::{Path, PathBuf};

/// Largest accepted photo upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Filesystem-backed image store.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifier for an upload: `<username>_<file stem>`.
    ///
    /// The extension is dropped and anything but ASCII letters, digits, `-`
    /// and `_` becomes `-`.
    pub fn image_id(username: &str, filename: &str) -> String {
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let raw = format!("{username}_{stem}");
        raw.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect()
    }

    /// Store an uploaded photo and return its identifier.
    ///
    /// Re-uploading a file with the same name replaces the previous photo.
    pub async fn store(
        &self,
        username: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge(bytes.len()));
        }
        let id = Self::image_id(username, filename);
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&id), bytes).await?;
        tracing::info!(image_id = %id, size = bytes.len(), "Stored hike photo");
        Ok(id)
    }

    /// Read a stored photo.
    pub async fn load(&self, id: &str) -> Result<Vec<u8>, ImageError> {
        if !is_valid_id(id) {
            return Err(ImageError::InvalidId);
        }
        match tokio::fs::read(self.root.join(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ImageError::NotFound),
            Err(e) => Err(ImageError::Io(e)),
        }
    }
}

/// Identifiers never contain path separators or dots.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Guess a content type from the file's leading bytes.
pub fn content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

/// Errors from image storage.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Uploaded image is empty")]
    Empty,

    #[error("Uploaded image is too large ({0} bytes)")]
    TooLarge(usize),

    #[error("Invalid image id")]
    InvalidId,

    #[error("Image not found")]
    NotFound,

    #[error("Image storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ImageError> for crate::error::AppError {
    fn from(err: ImageError) -> Self {
        use crate::error::AppError;
        match err {
            ImageError::Empty | ImageError::TooLarge(_) | ImageError::InvalidId => {
                AppError::BadRequest(err.to_string())
            }
            ImageError::NotFound => AppError::NotFound(err.to_string()),
            ImageError::Io(e) => AppError::Internal(e.into()),
        }
    }
}
