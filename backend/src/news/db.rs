//! News database operations
//!
//! SQLite implementation of [`NewsRepository`].

use crate::error::AppError;
use crate::news::models::{NewsArticle, NewsChanges, NewsFields, NewsId};
use crate::news::repository::NewsRepository;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Columns selected for every article query
const COLUMNS: &str = "id, title, author, description, content, url, url_image, \
                       published_at, category, created_at, updated_at";

/// Database connection pool for news operations
#[derive(Clone)]
pub struct NewsDb {
    pool: SqlitePool,
}

impl NewsDb {
    /// Initialize database connection pool and run migrations
    ///
    /// # Arguments
    /// * `database_url` - SQLite file path or `sqlite:` URL (`sqlite::memory:` for tests)
    /// * `max_connections` - Pool size; forced to 1 for in-memory databases
    ///
    /// # Returns
    /// * `Ok(NewsDb)` if successful
    /// * `Err(AppError)` if connection or migration failed
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let path = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .unwrap_or(database_url);
        let in_memory = path.starts_with(":memory:") || path.contains("mode=memory");

        // Ensure parent directory exists
        if !in_memory {
            let file = path.split('?').next().unwrap_or(path);
            if let Some(parent) = Path::new(file).parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        // Every connection to :memory: opens its own database
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
        })?;

        info!("Connected to SQLite database at: {}", path);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_news.sql");

        // Remove comments (lines starting with --) and normalize whitespace
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            let without_comments = match trimmed.find("--") {
                Some(comment_pos) => &trimmed[..comment_pos],
                None => trimmed,
            };
            cleaned_sql.push_str(without_comments.trim());
            cleaned_sql.push(' ');
        }

        let statements = cleaned_sql
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty());

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl NewsRepository for NewsDb {
    async fn list(&self) -> Result<Vec<NewsArticle>, AppError> {
        let news = sqlx::query_as::<_, NewsArticle>(&format!(
            "SELECT {} FROM news ORDER BY id ASC",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(news)
    }

    async fn get(&self, id: NewsId) -> Result<Option<NewsArticle>, AppError> {
        let news = sqlx::query_as::<_, NewsArticle>(&format!(
            "SELECT {} FROM news WHERE id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(news)
    }

    async fn create(&self, fields: &NewsFields) -> Result<NewsArticle, AppError> {
        let now = Utc::now();
        let news = sqlx::query_as::<_, NewsArticle>(&format!(
            "INSERT INTO news (title, author, description, content, url, url_image, \
             published_at, category, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            COLUMNS
        ))
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.description)
        .bind(&fields.content)
        .bind(&fields.url)
        .bind(&fields.url_image)
        .bind(fields.published_at)
        .bind(&fields.category)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!("Created news: {}", news.id);
        Ok(news)
    }

    async fn update(
        &self,
        id: NewsId,
        changes: &NewsChanges,
    ) -> Result<Option<NewsArticle>, AppError> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE news SET ");
        let mut set = builder.separated(", ");
        let text_columns = [
            ("title", &changes.title),
            ("author", &changes.author),
            ("description", &changes.description),
            ("content", &changes.content),
            ("url", &changes.url),
            ("url_image", &changes.url_image),
            ("category", &changes.category),
        ];
        for (column, value) in text_columns {
            if let Some(value) = value {
                set.push(format!("{} = ", column))
                    .push_bind_unseparated(value.clone());
            }
        }
        if let Some(published_at) = changes.published_at {
            set.push("published_at = ")
                .push_bind_unseparated(published_at);
        }
        set.push("updated_at = ").push_bind_unseparated(Utc::now());
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        debug!("Updated news: {}", id);
        self.get(id).await
    }

    async fn delete(&self, id: NewsId) -> Result<Option<NewsArticle>, AppError> {
        let news = sqlx::query_as::<_, NewsArticle>(&format!(
            "DELETE FROM news WHERE id = ? RETURNING {}",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if news.is_some() {
            debug!("Deleted news: {}", id);
        }
        Ok(news)
    }

    async fn find_by_title_substring(&self, needle: &str) -> Result<Vec<NewsArticle>, AppError> {
        let pattern = format!("%{}%", escape_like(needle));
        let news = sqlx::query_as::<_, NewsArticle>(&format!(
            "SELECT {} FROM news WHERE title LIKE ? ESCAPE '\\' ORDER BY id ASC",
            COLUMNS
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(news)
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<NewsArticle>, AppError> {
        let news = sqlx::query_as::<_, NewsArticle>(&format!(
            "SELECT {} FROM news WHERE category = ? ORDER BY id ASC",
            COLUMNS
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(news)
    }

    async fn url_taken(&self, url: &str, ignore: Option<NewsId>) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM news WHERE url = ? AND (? IS NULL OR id <> ?))",
        )
        .bind(url)
        .bind(ignore)
        .bind(ignore)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }
}

/// Escape `LIKE` wildcards so the needle matches literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
