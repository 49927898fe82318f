/**
 * Storage Driver Error Translation
 *
 * This module maps failure codes reported by the storage driver onto error
 * kinds. Two code families are understood: Prisma-style `P2xxx` query engine
 * codes and PostgreSQL SQLSTATE codes as reported by sqlx.
 *
 * # Mapping
 *
 * | Family                         | Kind              |
 * |--------------------------------|-------------------|
 * | record not found               | `NotFoundError`   |
 * | unique constraint violated     | `ConflictError`   |
 * | malformed / invalid value      | `ValidationError` |
 * | anything else                  | `DatabaseError`   |
 *
 * Translation is total: unknown codes resolve to `DatabaseError` and the
 * translator never fails. Its output is advisory; callers decide whether to
 * return it as the request's failure.
 */

use thiserror::Error;

use crate::backend::error::kind::ErrorKind;
use crate::backend::error::types::{capture_stack, ApiError};

/// SQLSTATE `no_data`, used for sqlx's `RowNotFound`
pub const NO_DATA: &str = "02000";

/// A failure surfaced by the storage driver
///
/// Only the code and message are consulted; any richer driver detail is
/// dropped when this is built. Codes that translate to a non-operational kind
/// capture the stack at construction, so it points at the failing query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("driver failure {code}: {message}")]
pub struct DriverFailure {
    pub code: String,
    pub message: String,
    stack: Option<String>,
}

impl DriverFailure {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let stack = if classify_code(&code).is_operational() {
            None
        } else {
            capture_stack()
        };
        Self {
            code,
            message: message.into(),
            stack,
        }
    }

    /// Replace the captured stack
    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Extract a classifiable failure from a sqlx error
    ///
    /// Returns `None` when the error carries no failure code (pool timeouts,
    /// I/O, decode errors, ...). Those must not be classified here and fall
    /// through to the unclassified path.
    pub fn from_sqlx(err: &sqlx::Error) -> Option<Self> {
        match err {
            sqlx::Error::RowNotFound => Some(Self::new(NO_DATA, err.to_string())),
            sqlx::Error::Database(db_err) => db_err
                .code()
                .map(|code| Self::new(code.into_owned(), db_err.message())),
            _ => None,
        }
    }

    pub fn code(&self) -> DriverCode {
        DriverCode::parse(&self.code)
    }
}

/// Known driver failure codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DriverCode {
    // Record not found family
    /// `P2001` - the record searched for in the where condition does not exist
    RecordNotFound,
    /// `P2015` - a related record could not be found
    RelatedRecordNotFound,
    /// `P2018` - required connected records were not found
    ConnectedRecordsNotFound,
    /// `P2025` - an operation depended on records that were not found
    DependentRecordNotFound,
    /// `02000` - no data
    NoData,

    // Unique constraint family
    /// `P2002` / `23505`
    UniqueViolation,

    // Malformed or invalid value family
    /// `P2000` / `22001` - value too long for the column
    ValueTooLong,
    /// `P2005` - stored value invalid for the field type
    InvalidStoredValue,
    /// `P2006` - provided value not valid for the field
    InvalidFieldValue,
    /// `P2007` - data validation error
    DataValidation,
    /// `P2011` / `23502` - null constraint violation
    NullViolation,
    /// `P2012` - missing a required value
    MissingRequiredValue,
    /// `P2019` - input error
    InputError,
    /// `P2020` / `22003` - value out of range for the type
    ValueOutOfRange,
    /// `P2023` - inconsistent column data
    InconsistentColumnData,
    /// `22007` / `22008` - invalid or overflowing datetime
    InvalidDatetime,
    /// `22P02` - invalid text representation
    InvalidTextRepresentation,
    /// `23514` - check constraint violation
    CheckViolation,

    // Explicitly known, but no more specific than a database failure
    /// `P2003` / `23503`
    ForeignKeyViolation,
    /// `P1001` / `08006` - cannot reach the database server
    ConnectionFailure,

    /// Any other code
    Other(String),
}

impl DriverCode {
    /// Parse a raw driver code; never fails
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "P2001" => Self::RecordNotFound,
            "P2015" => Self::RelatedRecordNotFound,
            "P2018" => Self::ConnectedRecordsNotFound,
            "P2025" => Self::DependentRecordNotFound,
            NO_DATA => Self::NoData,
            "P2002" | "23505" => Self::UniqueViolation,
            "P2000" | "22001" => Self::ValueTooLong,
            "P2005" => Self::InvalidStoredValue,
            "P2006" => Self::InvalidFieldValue,
            "P2007" => Self::DataValidation,
            "P2011" | "23502" => Self::NullViolation,
            "P2012" => Self::MissingRequiredValue,
            "P2019" => Self::InputError,
            "P2020" | "22003" => Self::ValueOutOfRange,
            "P2023" => Self::InconsistentColumnData,
            "22007" | "22008" => Self::InvalidDatetime,
            "22P02" => Self::InvalidTextRepresentation,
            "23514" => Self::CheckViolation,
            "P2003" | "23503" => Self::ForeignKeyViolation,
            "P1001" | "08006" => Self::ConnectionFailure,
            other => Self::Other(other.to_string()),
        }
    }

    /// Kind this code translates to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RecordNotFound
            | Self::RelatedRecordNotFound
            | Self::ConnectedRecordsNotFound
            | Self::DependentRecordNotFound
            | Self::NoData => ErrorKind::NOT_FOUND,

            Self::UniqueViolation => ErrorKind::CONFLICT,

            Self::ValueTooLong
            | Self::InvalidStoredValue
            | Self::InvalidFieldValue
            | Self::DataValidation
            | Self::NullViolation
            | Self::MissingRequiredValue
            | Self::InputError
            | Self::ValueOutOfRange
            | Self::InconsistentColumnData
            | Self::InvalidDatetime
            | Self::InvalidTextRepresentation
            | Self::CheckViolation => ErrorKind::VALIDATION,

            Self::ForeignKeyViolation | Self::ConnectionFailure | Self::Other(_) => {
                ErrorKind::DATABASE
            }
        }
    }
}

/// Kind for a raw driver code
pub fn classify_code(code: &str) -> ErrorKind {
    DriverCode::parse(code).kind()
}

/// Translate a driver failure into an API error
///
/// The driver's raw message becomes the error message; an empty one falls
/// back to the kind's default. The stack captured with the failure is reused.
pub fn translate(failure: &DriverFailure) -> ApiError {
    ApiError::with_parts(
        failure.code().kind(),
        failure.message.clone(),
        failure.stack.clone(),
    )
}
