//! Storage for uploaded item photos
//!
//! Files are written to the uploads directory as
//! `<unix-millis>-<8 hex chars>-<original name>` and served back under
//! `/uploads/`. The random part keeps same-named uploads arriving within
//! one millisecond apart.

use lostfound_common::time::unix_millis;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// URL prefix uploaded files are served from
pub const UPLOADS_ROUTE: &str = "/uploads";

/// A photo written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Location on disk, handed to the detector
    pub path: PathBuf,
    /// Public path recorded on the item
    pub public_path: String,
}

/// Reduce a client-supplied filename to a safe single path component
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Write an uploaded photo into `uploads_dir`
pub async fn store_upload(
    uploads_dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> std::io::Result<StoredUpload> {
    let nonce = Uuid::new_v4().simple().to_string();
    let filename = format!(
        "{}-{}-{}",
        unix_millis(),
        &nonce[..8],
        sanitize_filename(original_name)
    );
    let path = uploads_dir.join(&filename);

    tokio::fs::write(&path, bytes).await?;
    debug!(path = %path.display(), size = bytes.len(), "Stored upload");

    Ok(StoredUpload {
        path,
        public_path: format!("{}/{}", UPLOADS_ROUTE, filename),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\wallet.jpg"), "wallet.jpg");
    }

    #[test]
    fn test_sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename("my phone (1).png"), "my_phone__1_.png");
    }

    #[test]
    fn test_sanitize_never_empty_or_hidden() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[tokio::test]
    async fn test_store_upload_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let stored = store_upload(dir.path(), "bottle.jpg", b"jpegdata").await.unwrap();

        assert!(stored.path.starts_with(dir.path()));
        assert!(stored.public_path.starts_with("/uploads/"));
        assert!(stored.public_path.ends_with("-bottle.jpg"));
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), b"jpegdata");
    }

    #[tokio::test]
    async fn test_same_name_uploads_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let first = store_upload(dir.path(), "photo.jpg", b"one").await.unwrap();
        let second = store_upload(dir.path(), "photo.jpg", b"two").await.unwrap();

        assert_ne!(first.path, second.path);
        assert_eq!(tokio::fs::read(&first.path).await.unwrap(), b"one");
        assert_eq!(tokio::fs::read(&second.path).await.unwrap(), b"two");
    }
}
