//! The post entity.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format used for `written_on` in forms and views
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A blog post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Row id, `None` until the post is first saved
    pub id: Option<u64>,

    /// URL slug, lowercase letters, digits and dashes
    pub slug: String,

    pub title: String,

    /// Preview text, usually the first paragraph of the body
    pub preview: String,

    pub body: String,

    pub written_on: NaiveDateTime,

    /// Number of times the post page was requested
    pub views: u64,
}

impl Post {
    /// Create an unsaved post
    pub fn new(slug: &str, title: &str, written_on: NaiveDateTime) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            written_on,
            ..Self::default()
        }
    }

    /// Path of the post page
    pub fn url(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// `written_on` formatted with [`DATE_FORMAT`]
    pub fn written_on_string(&self) -> String {
        self.written_on.format(DATE_FORMAT).to_string()
    }
}
