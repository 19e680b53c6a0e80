//! Storage interface for news articles
//!
//! Handlers only talk to the store through [`NewsRepository`], so the SQLite
//! implementation in [`crate::news::db`] can be swapped for any other backend.

use crate::error::AppError;
use crate::news::models::{NewsArticle, NewsChanges, NewsFields, NewsId};
use async_trait::async_trait;

/// Persistent collection of news articles
///
/// All listing methods return rows in store order (ascending `id`).
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Every article
    async fn list(&self) -> Result<Vec<NewsArticle>, AppError>;

    /// Article with the given id, if any
    async fn get(&self, id: NewsId) -> Result<Option<NewsArticle>, AppError>;

    /// Insert a new article and return it with its assigned id
    async fn create(&self, fields: &NewsFields) -> Result<NewsArticle, AppError>;

    /// Write the supplied fields of an existing article
    ///
    /// Returns `None` if the article does not exist. An empty change set
    /// returns the article unchanged.
    async fn update(
        &self,
        id: NewsId,
        changes: &NewsChanges,
    ) -> Result<Option<NewsArticle>, AppError>;

    /// Remove an article, returning its last state
    async fn delete(&self, id: NewsId) -> Result<Option<NewsArticle>, AppError>;

    /// Articles whose title contains `needle`
    async fn find_by_title_substring(&self, needle: &str) -> Result<Vec<NewsArticle>, AppError>;

    /// Articles whose category equals `category` exactly
    async fn find_by_category(&self, category: &str) -> Result<Vec<NewsArticle>, AppError>;

    /// Whether some article other than `ignore` already uses `url`
    async fn url_taken(&self, url: &str, ignore: Option<NewsId>) -> Result<bool, AppError>;
}
