//! Middleware Module
//!
//! This module contains the HTTP middleware of the backend server.
//!
//! # Architecture
//!
//! The middleware module currently provides:
//!
//! - **`failure`** - Terminal failure handling (error envelopes, panic capture)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use faultline::backend::error::FailureDispatcher;
//! use faultline::backend::middleware::with_failure_handling;
//! use faultline::shared::config::RuntimeMode;
//!
//! let dispatcher = Arc::new(FailureDispatcher::with_tracing(RuntimeMode::Development));
//! let app: Router = with_failure_handling(Router::new(), dispatcher);
//! ```

pub mod failure;

pub use failure::{dispatch_failures, panic_to_failure, with_failure_handling};
