use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::comment_dtos::CommentOut;
use crate::errors::FieldError;
use crate::models::post::Post;

/// Image payload submitted inline with a post form: a declared content type
/// plus base64-encoded bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    pub content_type: String,
    pub data: String,
}

impl ImageUpload {
    /// File extension for the declared content type, or None if the type
    /// is not an accepted image format.
    pub fn extension(&self) -> Option<&'static str> {
        let mime: mime::Mime = self.content_type.trim().parse().ok()?;
        if mime.type_() != mime::IMAGE {
            return None;
        }
        match mime.subtype().as_str() {
            "png" => Some("png"),
            "jpeg" => Some("jpg"),
            "gif" => Some("gif"),
            _ => None,
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, FieldError> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|_| FieldError::new("image", "image data is not valid base64"))
    }
}

/// Create/edit form for a post. Validation is an explicit function rather
/// than anything reflective, and empty text is rejected.
#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<ImageUpload>,
}

impl PostForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.text.trim().is_empty() {
            errors.push(FieldError::new("text", "post text must not be empty"));
        }
        if let Some(image) = &self.image {
            if image.extension().is_none() {
                errors.push(FieldError::new(
                    "image",
                    "image must be png, jpeg or gif",
                ));
            } else if let Err(e) = image.decode() {
                errors.push(e);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupRefOut {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct PostOut {
    pub id: Uuid,
    pub author: String,
    pub author_id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub group: Option<GroupRefOut>,
    pub image_url: Option<String>,
}

impl From<Post> for PostOut {
    fn from(post: Post) -> Self {
        let group = match (post.group_id, post.group_slug, post.group_title) {
            (Some(id), Some(slug), Some(title)) => Some(GroupRefOut { id, slug, title }),
            _ => None,
        };
        Self {
            id: post.id,
            author: post.author_username,
            author_id: post.author_id,
            text: post.text,
            pub_date: post.pub_date,
            group,
            image_url: post.image.map(|p| format!("/media/{}", p)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailOut {
    pub post: PostOut,
    pub comments: Vec<CommentOut>,
    pub comments_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(text: &str) -> PostForm {
        PostForm {
            text: text.to_string(),
            group_id: None,
            image: None,
        }
    }

    #[test]
    fn empty_text_is_rejected() {
        let errors = form("").validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "text");
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        assert!(form("   \n\t").validate().is_err());
    }

    #[test]
    fn plain_text_passes() {
        assert!(form("Тестовый пост").validate().is_ok());
    }

    #[test]
    fn png_upload_passes() {
        let mut f = form("text");
        f.image = Some(ImageUpload {
            content_type: "image/png".into(),
            data: base64::engine::general_purpose::STANDARD.encode(b"\x89PNG"),
        });
        assert!(f.validate().is_ok());
    }

    #[test]
    fn non_image_content_type_is_rejected() {
        let mut f = form("text");
        f.image = Some(ImageUpload {
            content_type: "application/pdf".into(),
            data: "aGVsbG8=".into(),
        });
        let errors = f.validate().unwrap_err();
        assert_eq!(errors[0].field, "image");
    }

    #[test]
    fn bad_base64_is_rejected() {
        let mut f = form("text");
        f.image = Some(ImageUpload {
            content_type: "image/jpeg".into(),
            data: "!!!not-base64!!!".into(),
        });
        assert!(f.validate().is_err());
    }

    #[test]
    fn jpeg_maps_to_jpg_extension() {
        let img = ImageUpload {
            content_type: "image/jpeg".into(),
            data: String::new(),
        };
        assert_eq!(img.extension(), Some("jpg"));
    }

    #[test]
    fn empty_text_with_bad_image_reports_both_fields() {
        let f = PostForm {
            text: String::new(),
            group_id: None,
            image: Some(ImageUpload {
                content_type: "text/plain".into(),
                data: String::new(),
            }),
        };
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
