//! News data models
//!
//! Defines the stored article row and the validated field sets used for writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Unique identifier for a news article
pub type NewsId = i64;

/// A stored news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NewsArticle {
    /// Store-assigned identifier
    pub id: NewsId,
    /// Headline
    pub title: String,
    /// Author name
    pub author: String,
    /// Short summary
    pub description: String,
    /// Full body
    pub content: String,
    /// Canonical link, unique across all articles
    pub url: String,
    /// Link to the cover image
    pub url_image: String,
    /// Publication time
    pub published_at: DateTime<Utc>,
    /// Free-form category (e.g. "sport", "finance")
    pub category: String,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
    /// When the row was last written
    pub updated_at: DateTime<Utc>,
}

/// Every writable field, all present. Used by create and full update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsFields {
    /// Headline
    pub title: String,
    /// Author name
    pub author: String,
    /// Short summary
    pub description: String,
    /// Full body
    pub content: String,
    /// Canonical link
    pub url: String,
    /// Cover image link
    pub url_image: String,
    /// Publication time
    pub published_at: DateTime<Utc>,
    /// Category
    pub category: String,
}

/// A subset of writable fields. `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsChanges {
    /// Headline
    pub title: Option<String>,
    /// Author name
    pub author: Option<String>,
    /// Short summary
    pub description: Option<String>,
    /// Full body
    pub content: Option<String>,
    /// Canonical link
    pub url: Option<String>,
    /// Cover image link
    pub url_image: Option<String>,
    /// Publication time
    pub published_at: Option<DateTime<Utc>>,
    /// Category
    pub category: Option<String>,
}

impl NewsChanges {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<NewsFields> for NewsChanges {
    fn from(fields: NewsFields) -> Self {
        Self {
            title: Some(fields.title),
            author: Some(fields.author),
            description: Some(fields.description),
            content: Some(fields.content),
            url: Some(fields.url),
            url_image: Some(fields.url_image),
            published_at: Some(fields.published_at),
            category: Some(fields.category),
        }
    }
}

/// Categories with a dedicated filter endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Sport news
    Sport,
    /// Finance news
    Finance,
    /// Automotive news
    Automotive,
}

impl Category {
    /// Value stored in the `category` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sport => "sport",
            Category::Finance => "finance",
            Category::Automotive => "automotive",
        }
    }
}
