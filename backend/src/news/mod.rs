//! News module
//!
//! Article model, validation rules and storage using SQLite database.

pub mod db;
pub mod models;
pub mod repository;
pub mod validation;

pub use db::NewsDb;
pub use models::{Category, NewsArticle, NewsChanges, NewsFields, NewsId};
pub use repository::NewsRepository;
pub use validation::{FieldErrors, NewsPayload, Presence};
