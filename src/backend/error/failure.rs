/**
 * Request Failures
 *
 * `Failure` is what handlers return in their `Err` arm. It keeps the failure
 * exactly as it was produced; classification into a single `ApiError` only
 * happens once, in the dispatcher.
 *
 * # Variants
 *
 * - `Known` - already classified by a handler or service
 * - `Driver` - a storage driver failure carrying a failure code
 * - `Unclassified` - anything else (defects, panics, foreign errors)
 */

use std::any::Any;
use std::cell::RefCell;
use std::sync::Once;
use thiserror::Error;

use crate::backend::error::driver::DriverFailure;
use crate::backend::error::kind::ErrorKind;
use crate::backend::error::types::{capture_stack, ApiError};

/// A failure produced while handling a request
#[derive(Debug, Clone, Error)]
pub enum Failure {
    #[error(transparent)]
    Known(ApiError),

    #[error(transparent)]
    Driver(DriverFailure),

    #[error(transparent)]
    Unclassified(Defect),
}

impl Failure {
    /// Unclassified failure with a stack captured here
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified(Defect::new(message))
    }

    /// Kind the failure will be classified as, without classifying it
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Known(error) => error.kind(),
            Self::Driver(driver) => driver.code().kind(),
            Self::Unclassified(_) => ErrorKind::INTERNAL,
        }
    }
}

thread_local! {
    static PANIC_STACK: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Record the stack of each panic on the panicking thread
///
/// Chains to the previously installed hook. Installing it more than once is a
/// no-op. [`Defect::from_panic`] takes the recorded stack.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            PANIC_STACK.with(|slot| *slot.borrow_mut() = capture_stack());
            previous(info);
        }));
    });
}

/// An unexpected failure nobody classified
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Defect {
    message: String,
    stack: Option<String>,
}

impl Defect {
    /// Create a defect, capturing the current stack
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: capture_stack(),
        }
    }

    /// Create a defect with an explicit stack (or none)
    pub fn with_stack(message: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            message: message.into(),
            stack,
        }
    }

    /// Build a defect from a caught panic payload
    ///
    /// Uses the stack recorded at the panic site by [`install_panic_hook`].
    /// Without the hook the stack is captured here, where the panic was caught.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "handler panicked".to_string()
        };
        let stack = PANIC_STACK
            .with(|slot| slot.borrow_mut().take())
            .or_else(capture_stack);
        Self { message, stack }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub(crate) fn into_parts(self) -> (String, Option<String>) {
        (self.message, self.stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_from_str_panic() {
        let payload: Box<dyn Any + Send> = Box::new("x is null");
        let defect = Defect::from_panic(payload.as_ref());
        assert_eq!(defect.message(), "x is null");
    }

    #[test]
    fn test_defect_from_string_panic() {
        let payload: Box<dyn Any + Send> = Box::new(format!("index {} out of range", 7));
        let defect = Defect::from_panic(payload.as_ref());
        assert_eq!(defect.message(), "index 7 out of range");
    }

    #[test]
    fn test_defect_from_opaque_panic() {
        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        let defect = Defect::from_panic(payload.as_ref());
        assert_eq!(defect.message(), "handler panicked");
    }

    #[test]
    fn test_panic_stack_is_taken_at_panic_site() {
        install_panic_hook();
        let payload = std::panic::catch_unwind(|| panic!("x is null")).unwrap_err();

        let defect = Defect::from_panic(payload.as_ref());
        let stack = defect.stack().expect("stack should be recorded");
        assert!(!stack.contains("from_panic"), "stack taken at catch site: {}", stack);

        // Consumed by the first defect
        assert!(PANIC_STACK.with(|slot| slot.borrow().is_none()));
    }

    #[test]
    fn test_defect_explicit_stack() {
        let defect = Defect::with_stack("boom", Some("frame 0".to_string()));
        assert_eq!(defect.stack(), Some("frame 0"));
        assert_eq!(defect.to_string(), "boom");
    }

    #[test]
    fn test_failure_kind_without_classifying() {
        assert_eq!(Failure::from(ApiError::conflict("taken")).kind(), ErrorKind::CONFLICT);
        assert_eq!(
            Failure::Driver(DriverFailure::new("P2001", "missing")).kind(),
            ErrorKind::NOT_FOUND
        );
        assert_eq!(Failure::unclassified("x is null").kind(), ErrorKind::INTERNAL);
    }

    #[test]
    fn test_failure_display_is_transparent() {
        let failure = Failure::Known(ApiError::not_found("User not found"));
        assert_eq!(failure.to_string(), "NotFoundError: User not found");

        let failure = Failure::Driver(DriverFailure::new("23505", "duplicate key"));
        assert_eq!(failure.to_string(), "driver failure 23505: duplicate key");
    }
}
