//! News API Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod news;
/// Application state management
pub mod state;
