//! Custom assertion macros for error envelopes
//!
//! Failures print the whole body, which makes envelope mismatches easy to
//! read.

/// Assert that an error envelope has the expected base fields
#[macro_export]
macro_rules! assert_envelope {
    ($body:expr, $name:expr, $message:expr, $status:expr) => {
        assert_eq!($body["name"], $name, "unexpected name in {}", $body);
        assert_eq!($body["message"], $message, "unexpected message in {}", $body);
        assert_eq!($body["statusCode"], $status, "unexpected statusCode in {}", $body);
    };
}

/// Assert that a JSON object does not carry a key
#[macro_export]
macro_rules! assert_no_field {
    ($body:expr, $key:expr) => {
        assert!(
            $body.get($key).is_none(),
            "Expected no '{}' in {}",
            $key,
            $body
        );
    };
}
