//! Unit tests for registration error types.

use std::sync::Arc;

use rstest::rstest;

use super::*;

#[rstest]
#[case::invalid_id(
    RegistrationError::InvalidId {
        id: " ".into(),
        message: "loop id must not be blank".into(),
    },
    "must not be blank"
)]
#[case::inconsistent(
    RegistrationError::Inconsistent { id: "median".into() },
    "median"
)]
#[case::ports_exhausted(
    RegistrationError::PortsExhausted {
        id: "median".into(),
        base_port: 9300,
    },
    "9300"
)]
fn error_message_includes_context(#[case] error: RegistrationError, #[case] expected: &str) {
    let message = error.to_string();
    assert!(
        message.contains(expected),
        "expected {expected} in message: {message}"
    );
}

#[test]
fn failed_error_exposes_source() {
    let error = RegistrationError::Failed {
        id: "median".into(),
        message: "executable not found".into(),
        source: Some(Arc::new(std::io::Error::other("no such file"))),
    };
    assert_eq!(error.loop_id(), "median");
    let source = std::error::Error::source(&error).expect("source is attached");
    assert_eq!(source.to_string(), "no such file");
}

#[test]
fn registration_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RegistrationError>();
}
