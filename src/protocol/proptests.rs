//! Property-based tests for the buffer protocol
//!
//! Tests for:
//! - Capacity: outputs that fit (with terminator) come back exactly
//! - Truncation: outputs that do not fit are BufferTooSmall, never cut short
//! - Dispatch: unknown status codes are Unexpected and leave buffers unread

use super::{call_checked, call_with_output, CallBuffer, Outcome, WriteError, ERR_CUSTOM, ERR_NONE};
use crate::error::BindingError;
use proptest::prelude::*;

/// An engine that answers with `output` through the checked writer.
fn answer(output: &str, result: &mut CallBuffer) -> libc::c_int {
    match result.writer().put(output) {
        Ok(()) => ERR_NONE,
        Err(_) => super::ERR_BUFFER_TOO_SMALL,
    }
}

proptest! {
    /// Property test: exact round trip whenever the output fits
    #[test]
    fn prop_fitting_output_is_exact(output in "[^\\x00]{0,256}", slack in 1usize..64) {
        let capacity = output.len() + slack;
        let outcome = call_with_output(capacity, |result, _| answer(&output, result)).unwrap();
        prop_assert_eq!(outcome, Outcome::Success(output.clone()));
    }

    /// Property test: no silent truncation
    /// Any capacity up to and including the output length is refused.
    #[test]
    fn prop_short_buffer_is_refused(output in "[^\\x00]{1,256}", shortfall in 0usize..300) {
        let capacity = output.len().saturating_sub(shortfall);
        let outcome = call_with_output(capacity, |result, _| answer(&output, result)).unwrap();
        prop_assert_eq!(&outcome, &Outcome::BufferTooSmall);
        prop_assert_eq!(
            outcome.into_value(capacity),
            Err(BindingError::BufferTooSmall { capacity })
        );
    }

    /// Property test: checked writes never exceed capacity
    #[test]
    fn prop_put_respects_capacity(output in "[^\\x00]{0,128}", capacity in 0usize..160) {
        let mut buffer = vec![0xAAu8; capacity + 16];
        let result = {
            let mut out = super::OutBuffer::new(&mut buffer[..capacity]);
            out.put(&output)
        };
        if output.len() < capacity {
            prop_assert!(result.is_ok());
            prop_assert_eq!(&buffer[..output.len()], output.as_bytes());
            prop_assert_eq!(buffer[output.len()], 0);
        } else {
            prop_assert_eq!(
                result,
                Err(WriteError::Overflow { len: output.len(), capacity })
            );
        }
        // Bytes past the declared capacity are untouched.
        prop_assert!(buffer[capacity..].iter().all(|&b| b == 0xAA));
    }

    /// Property test: unknown codes surface as Unexpected
    #[test]
    fn prop_unknown_status_is_unexpected(
        status in any::<i32>().prop_filter("known code", |s| ![0, 1, 2, 100].contains(s))
    ) {
        let outcome = call_checked(4, |error| {
            // Unterminated garbage: reading it would fail.
            let len = error.capacity();
            unsafe { std::ptr::write_bytes(error.as_mut_ptr(), b'!', len) };
            status
        })
        .unwrap();
        prop_assert_eq!(&outcome, &Outcome::Unexpected(status));
        prop_assert_eq!(outcome.into_verdict(4), Err(BindingError::Unexpected { status }));
    }

    /// Property test: custom errors are passed through verbatim
    #[test]
    fn prop_engine_message_verbatim(message in "[^\\x00]{0,200}") {
        let capacity = message.len() + 1;
        let outcome = call_checked(capacity, |error| {
            error.writer().put(&message).unwrap();
            ERR_CUSTOM
        })
        .unwrap();
        prop_assert_eq!(
            outcome.into_verdict(capacity),
            Err(BindingError::Engine(message.clone()))
        );
    }
}
