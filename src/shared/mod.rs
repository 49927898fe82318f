//! Shared Module
//!
//! This module contains types that are shared between the server and its
//! clients. All types are designed for serialization and transmission over
//! HTTP, and none of them depend on the server stack.

/// Error and success response envelopes
pub mod envelope;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, RuntimeMode};
pub use envelope::{ErrorEnvelope, SuccessEnvelope};
