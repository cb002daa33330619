//! Local-disk storage for uploaded media.

use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::ApiError;
use crate::forms::{image_extension, UploadedImage};

/// Subdirectory of the media root holding task images.
const TASKS_DIR: &str = "tasks";

#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory all media paths are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an uploaded task image to disk.
    ///
    /// The stored name combines the (already charset-validated) slug
    /// with a random suffix, so repeated uploads never collide. Returns
    /// the media-root-relative path that goes into the task row.
    pub async fn save_task_image(
        &self,
        slug: &str,
        upload: &UploadedImage,
    ) -> Result<String, ApiError> {
        let ext = image_extension(&upload.file_name).ok_or_else(|| {
            ApiError::validation(format!("Not an accepted image file: {}", upload.file_name))
        })?;

        let file_name = format!("{}-{}.{}", slug, Uuid::new_v4().simple(), ext);
        let dir = self.root.join(TASKS_DIR);

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create media directory: {e}")))?;
        tokio::fs::write(dir.join(&file_name), &upload.data)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store upload: {e}")))?;

        tracing::debug!(file = %file_name, size = upload.data.len(), "Stored task image");

        Ok(format!("{TASKS_DIR}/{file_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    #[tokio::test]
    async fn save_task_image_writes_under_tasks_dir() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path());

        let upload = UploadedImage {
            file_name: "photo.png".to_string(),
            data: Bytes::from_static(b"\x89PNG\r\n\x1a\n"),
        };

        let path = store.save_task_image("test-slug", &upload).await.unwrap();
        assert!(path.starts_with("tasks/test-slug-"));
        assert!(path.ends_with(".png"));

        let stored = tokio::fs::read(root.path().join(&path)).await.unwrap();
        assert_eq!(stored, b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn save_task_image_rejects_unknown_extensions() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path());

        let upload = UploadedImage {
            file_name: "notes.txt".to_string(),
            data: Bytes::from_static(b"hello"),
        };

        let err = store.save_task_image("test-slug", &upload).await.unwrap_err();
        assert_eq!(err.error_type(), "validation_error");
    }

    #[tokio::test]
    async fn repeated_uploads_do_not_collide() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path());

        let upload = UploadedImage {
            file_name: "photo.jpg".to_string(),
            data: Bytes::from_static(b"jpeg-bytes"),
        };

        let first = store.save_task_image("same-slug", &upload).await.unwrap();
        let second = store.save_task_image("same-slug", &upload).await.unwrap();
        assert_ne!(first, second);
    }
}
