//! Users Module
//!
//! User storage and the `/api/users` endpoints.

/// User model and database operations
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use db::User;
pub use handlers::{create_user, get_user, CreateUserRequest, UserResponse};
