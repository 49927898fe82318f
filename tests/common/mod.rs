//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - A recording failure sink
//! - Test servers wired with the failure dispatcher
//! - Custom assertion macros

// Each test binary uses a different subset of the fixtures
#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

// Re-export commonly used utilities
pub use fixtures::*;
