//! Faultline - Main Library
//!
//! Faultline is the error handling core of an Axum API service: a closed
//! taxonomy of error kinds, a translator for storage driver failure codes,
//! and one dispatcher that turns every failure into a JSON error envelope.
//!
//! # Module Structure
//!
//! - **`shared`** - Types usable by servers and clients alike
//!   - Error and success envelopes
//!   - Runtime mode and application configuration
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Error kinds, `ApiError`, driver translation, `FailureDispatcher`
//!   - Failure middleware, router, application state
//!   - User endpoints backed by PostgreSQL
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Server-side code: Axum, sqlx, tracing-subscriber
//!
//! # Error Envelope
//!
//! Every failed request answers with the kind's HTTP status and:
//!
//! ```json
//! { "name": "ValidationError", "message": "Email is required", "statusCode": 400 }
//! ```
//!
//! Kind-specific fields are flattened next to the base fields. In production
//! (`APP_ENV=production`), non-operational failures are redacted to
//! `"Internal server error"`; elsewhere they include a `stack`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use faultline::backend::server::create_app;
//! use faultline::shared::config::AppConfig;
//!
//! # async fn example() {
//! let config = AppConfig::from_env().unwrap();
//! let app = create_app(&config).await;
//! // Use app with axum::serve
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
