//! Busline - bus ticketing and fleet operations API
//!
//! An Actix Web and Paperclip service covering:
//! - route, stop and schedule search
//! - online booking paid through a payment gateway
//! - conductor cash sales and single-use ticket validation
//! - live bus tracking
//! - complaints and lost-and-found reports
//! - Prometheus metrics, security headers and structured audit logging
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - row types and request/response models
//! - `db/` - SQLite persistence through sqlx
//! - `services/` - business logic, one module per concern
//! - `handlers/` - HTTP handlers and the app factory
//! - `middleware/` - security headers, request ids and request metrics
//! - `config/` - configuration structures and environment loading
//! - `utils/` - HTTP helpers, HMAC, redaction and validators
//!
//! ## Quick Start
//!
//! ```no_run
//! use busline::{AppConfig, AppState, Database, create_app};
//! use actix_web::HttpServer;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = AppConfig::from_env();
//!     let db = Database::connect(&config.database).await.map_err(std::io::Error::other)?;
//!     let state = AppState::new(config, db).map_err(std::io::Error::other)?;
//!     HttpServer::new(move || create_app(state.clone()))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await
//! }
//! ```

pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use config::AppConfig;
pub use db::Database;
pub use error::{AppError, Result};
pub use handlers::{create_app, create_openapi_spec};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders};
pub use services::accounts::ensure_admin;
pub use state::AppState;
