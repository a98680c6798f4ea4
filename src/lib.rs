//! Local Library catalog server
//!
//! A Rust implementation of the Local Library catalog, serving page models
//! for books, authors, genres and book copies over HTTP and handling the
//! form submissions that create, update and delete them.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
