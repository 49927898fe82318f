/**
 * User Model and Database Operations
 *
 * This module handles user rows in PostgreSQL. Query errors are returned as
 * `Failure` so handlers can propagate them with `?`; a duplicate email is
 * translated here into a `ConflictError` naming the offending field.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::backend::error::{ApiError, DriverFailure, ErrorKind, Failure};

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: uuid::Uuid,
    /// User email address (unique)
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

/// Create a new user
///
/// # Errors
///
/// * `ConflictError` - a user with this email already exists
/// * any other driver failure, unchanged
pub async fn insert_user(
    pool: &PgPool,
    email: String,
    name: Option<String>,
) -> Result<User, Failure> {
    let id = uuid::Uuid::new_v4();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, name, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, name, created_at
        "#,
    )
    .bind(id)
    .bind(&email)
    .bind(&name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|err| match DriverFailure::from_sqlx(&err) {
        Some(driver) if driver.code().kind() == ErrorKind::CONFLICT => {
            ApiError::conflict("Email already registered")
                .with_extra("fields", serde_json::json!(["email"]))
                .into()
        }
        Some(driver) => Failure::Driver(driver),
        None => Failure::from(err),
    })
}

/// Get user by ID
///
/// # Returns
/// User or None if not found
pub async fn find_user(pool: &PgPool, id: uuid::Uuid) -> Result<Option<User>, Failure> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
