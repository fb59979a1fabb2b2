use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FieldError;
use crate::models::group::Group;
use crate::models::user::UserPublic;
use crate::pagination::Paginated;
use crate::dtos::post_dtos::PostOut;

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"))
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug_re().is_match(slug)
}

/// Operator form for creating a group.
#[derive(Debug, Deserialize)]
pub struct GroupForm {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let title = self.title.trim();
        if title.is_empty() {
            errors.push(FieldError::new("title", "title must not be empty"));
        } else if title.chars().count() > 200 {
            errors.push(FieldError::new("title", "title must be at most 200 characters"));
        }
        if !is_valid_slug(self.slug.trim()) {
            errors.push(FieldError::new(
                "slug",
                "slug must be lowercase letters, digits and hyphens",
            ));
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError::new("description", "description must not be empty"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupOut {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<Group> for GroupOut {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}

/// Group listing page: the group header plus its posts.
#[derive(Debug, Serialize)]
pub struct GroupPageOut {
    pub group: GroupOut,
    pub posts: Paginated<PostOut>,
}

/// Profile page: the user, their posts, and follow counters. `following`
/// is present only when the caller is authenticated.
#[derive(Debug, Serialize)]
pub struct ProfileOut {
    pub user: UserPublic,
    pub joined: chrono::DateTime<chrono::Utc>,
    pub posts: Paginated<PostOut>,
    pub followers_count: i64,
    pub following_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_lowercase_and_hyphens() {
        assert!(is_valid_slug("test-slug"));
        assert!(is_valid_slug("test-slug2"));
        assert!(is_valid_slug("a"));
    }

    #[test]
    fn slug_rejects_uppercase_spaces_and_edges() {
        assert!(!is_valid_slug("Test-Slug"));
        assert!(!is_valid_slug("test slug"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let form = GroupForm {
            title: "x".repeat(201),
            slug: "ok-slug".into(),
            description: "desc".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn valid_group_form_passes() {
        let form = GroupForm {
            title: "Тестовая группа".into(),
            slug: "test-slug".into(),
            description: "Тестовое описание".into(),
        };
        assert!(form.validate().is_ok());
    }
}
