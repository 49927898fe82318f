//! Backend Error Module
//!
//! This module holds the error taxonomy of the API and the pipeline that turns
//! any failure into a JSON error envelope.
//!
//! # Architecture
//!
//! The error module is organized into focused submodules:
//!
//! - **`kind`** - `ErrorKind` descriptors and the `KindRegistry`
//! - **`types`** - `ApiError`, one classified failure
//! - **`driver`** - storage driver failure code translation
//! - **`failure`** - `Failure`, the value handlers return on error
//! - **`dispatcher`** - classify, log, redact and emit
//! - **`sink`** - failure logging
//! - **`conversion`** - `From` and `IntoResponse` implementations
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── kind.rs       - Error kinds and registry
//! ├── types.rs      - ApiError
//! ├── driver.rs     - Driver code translation
//! ├── failure.rs    - Failure and Defect
//! ├── dispatcher.rs - FailureDispatcher
//! ├── sink.rs       - FailureSink and TracingSink
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use faultline::backend::error::{ApiError, Failure};
//!
//! async fn handler() -> Result<&'static str, Failure> {
//!     Err(ApiError::validation("Email is required").into())
//! }
//! ```

/// Error kinds and registry
pub mod kind;

/// Classified error type
pub mod types;

/// Storage driver translation
pub mod driver;

/// Handler failure values
pub mod failure;

/// Terminal failure dispatcher
pub mod dispatcher;

/// Failure logging
pub mod sink;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use dispatcher::{FailureDispatcher, RequestContext, REDACTED_MESSAGE};
pub use driver::{translate, DriverCode, DriverFailure};
pub use failure::{install_panic_hook, Defect, Failure};
pub use kind::{ErrorKind, KindRegistry, RegistryError};
pub use sink::{FailureRecord, FailureSink, TracingSink};
pub use types::{ApiError, ToEnvelope};
