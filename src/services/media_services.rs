use std::path::PathBuf;

use mime::Mime;
use uuid::Uuid;

use crate::errors::AppError;

/// Local-disk store for uploaded post images. Every post's image lives at
/// `<root>/posts/<post-id>.<ext>`, so re-uploading replaces the old file.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Writes image bytes for a post and returns the relative media path
    /// stored on the posts row.
    pub async fn save_post_image(
        &self,
        post_id: Uuid,
        ext: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        let dir = self.root.join("posts");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("media dir create failed: {}", e)))?;
        let filename = format!("{}.{}", post_id, ext);
        tokio::fs::write(dir.join(&filename), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("image write failed: {}", e)))?;
        Ok(format!("posts/{}", filename))
    }

    /// Removes a previously stored image, given the relative path
    /// `save_post_image` returned. Used when the post row the image belongs
    /// to failed to persist; a missing file is not an error.
    pub async fn remove_post_image(&self, rel_path: &str) -> Result<(), AppError> {
        match tokio::fs::remove_file(self.root.join(rel_path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!("image remove failed: {}", e))),
        }
    }

    pub async fn read_post_image(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        if !is_safe_filename(filename) {
            return Err(AppError::NotFound("image".into()));
        }
        match tokio::fs::read(self.root.join("posts").join(filename)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("image".into()))
            }
            Err(e) => Err(AppError::Internal(format!("image read failed: {}", e))),
        }
    }

    pub fn content_type_for(filename: &str) -> Mime {
        match filename.rsplit('.').next() {
            Some("png") => mime::IMAGE_PNG,
            Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
            Some("gif") => mime::IMAGE_GIF,
            _ => mime::APPLICATION_OCTET_STREAM,
        }
    }
}

fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_filenames_are_rejected() {
        assert!(!is_safe_filename("../secret"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename(""));
        assert!(is_safe_filename("7c9e6679-7425-40de-944b-e07fc1f90ae7.png"));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(MediaStore::content_type_for("x.png"), mime::IMAGE_PNG);
        assert_eq!(MediaStore::content_type_for("x.jpg"), mime::IMAGE_JPEG);
        assert_eq!(MediaStore::content_type_for("x.gif"), mime::IMAGE_GIF);
        assert_eq!(
            MediaStore::content_type_for("x.bin"),
            mime::APPLICATION_OCTET_STREAM
        );
    }

    #[tokio::test]
    async fn save_then_read_roundtrip() {
        let dir = std::env::temp_dir().join(format!("yatube-media-{}", Uuid::new_v4()));
        let store = MediaStore::new(dir.clone());
        let post_id = Uuid::new_v4();
        let rel = store.save_post_image(post_id, "png", b"\x89PNG").await.unwrap();
        assert_eq!(rel, format!("posts/{}.png", post_id));
        let bytes = store.read_post_image(&format!("{}.png", post_id)).await.unwrap();
        assert_eq!(bytes, b"\x89PNG");
        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn removed_image_is_gone() {
        let dir = std::env::temp_dir().join(format!("yatube-media-{}", Uuid::new_v4()));
        let store = MediaStore::new(dir.clone());
        let post_id = Uuid::new_v4();
        let rel = store.save_post_image(post_id, "png", b"\x89PNG").await.unwrap();
        store.remove_post_image(&rel).await.unwrap();
        let err = store
            .read_post_image(&format!("{}.png", post_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn removing_a_missing_image_is_a_noop() {
        let store = MediaStore::new(std::env::temp_dir());
        assert!(store.remove_post_image("posts/never-stored.png").await.is_ok());
    }

    #[tokio::test]
    async fn missing_image_is_not_found() {
        let store = MediaStore::new(std::env::temp_dir());
        let err = store.read_post_image("missing.png").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
