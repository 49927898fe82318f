//! Backend Module
//!
//! This module contains all server-side code: the Axum server, the error
//! taxonomy and the failure pipeline every request handler relies on.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`error`** - Error kinds, driver translation and the failure dispatcher
//! - **`middleware`** - Terminal failure handling installed on the router
//! - **`server`** - Server initialization, application state, database loading
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`users`** - User storage and endpoints
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── error/          - Error taxonomy and dispatcher
//! ├── middleware/     - Failure middleware
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! └── users/          - User endpoints
//! ```
//!
//! # Error Handling
//!
//! Handlers return `Result<T, Failure>` and use `?` freely. A failure never
//! builds its own response: the failure middleware hands it to the single
//! `FailureDispatcher`, which classifies it, logs it and emits the envelope.

/// Backend error types and the failure pipeline
pub mod error;

/// Middleware for request processing
pub mod middleware;

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// User storage and endpoints
pub mod users;

/// Re-export commonly used types
pub use error::{ApiError, ErrorKind, Failure, FailureDispatcher};
pub use server::create_app;
