//! Photo upload policy, storage naming and cleanup

mod process;

pub use process::{encode_jpeg, optimize_photo, process_upload, OPTIMIZED_PREFIX, THUMB_PREFIX};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Public URL prefix under which the uploads directory is served
pub const URL_PREFIX: &str = "/uploads/";

/// Substrings accepted in both the file extension and the MIME subtype
const ALLOWED_TYPES: &[&str] = &["jpeg", "jpg", "png", "gif", "webp", "heic", "heif"];

/// Errors rejecting or failing an upload request
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No files uploaded")]
    NoFiles,

    #[error("File too large: {0}")]
    FileTooLarge(String),

    #[error("Too many files")]
    TooManyFiles,

    #[error("Only image files are allowed (JPEG, PNG, GIF, WEBP, HEIC, HEIF)")]
    InvalidType(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Size and count limits plus the accepted file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Maximum size of a single file in bytes
    pub max_file_size: usize,
    /// Maximum number of files per request
    pub max_files: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            max_files: 5,
        }
    }
}

impl UploadPolicy {
    /// Accepts a file when both its extension and its MIME type name an image format
    pub fn accepts(&self, file_name: &str, content_type: Option<&str>) -> bool {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let extension_ok = extension
            .as_deref()
            .is_some_and(|ext| ALLOWED_TYPES.iter().any(|t| ext.contains(t)));

        let mime_ok = content_type
            .and_then(|ct| ct.parse::<mime::Mime>().ok())
            .is_some_and(|mime| {
                let subtype = mime.subtype().as_str().to_ascii_lowercase();
                mime.type_() == mime::IMAGE && ALLOWED_TYPES.iter().any(|t| subtype.contains(t))
            });

        extension_ok && mime_ok
    }
}

/// Unique on-disk name for an upload, keeping the client's extension
pub fn stored_file_name(original_name: &str, now_millis: i64) -> String {
    let suffix = Uuid::new_v4().as_u128() % 1_000_000_000;
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!("{now_millis}-{suffix}{extension}")
}

/// Relative URL of a file in the uploads directory
pub fn public_url(file_name: &str) -> String {
    format!("{URL_PREFIX}{file_name}")
}

/// File names in the uploads directory that belong to a stored photo URL.
///
/// An `optimized-` photo also owns its original and both thumbnail spellings;
/// any other photo owns its optimized copy and thumbnail.
pub fn photo_artifacts(photo_url: &str) -> Vec<String> {
    let Some(basename) = Path::new(photo_url).file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };

    let mut names = vec![basename.to_string()];
    match basename.strip_prefix(OPTIMIZED_PREFIX) {
        Some(original) if !original.is_empty() => {
            names.push(original.to_string());
            names.push(format!("{THUMB_PREFIX}{original}"));
            names.push(format!("{THUMB_PREFIX}{basename}"));
        }
        _ => {
            names.push(format!("{OPTIMIZED_PREFIX}{basename}"));
            names.push(format!("{THUMB_PREFIX}{basename}"));
        }
    }
    names
}

/// Removes every artifact of the given photos from `dir`.
///
/// Returns the paths actually deleted; failures are logged and skipped.
pub fn remove_photo_files(dir: &Path, photos: &[String]) -> Vec<PathBuf> {
    photos
        .iter()
        .flat_map(|url| photo_artifacts(url))
        .map(|name| dir.join(name))
        .filter(|path| safe_unlink(path))
        .collect()
}

/// Deletes a file if it exists. Returns whether a file was removed.
pub fn safe_unlink(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to remove file");
            false
        }
    }
}
