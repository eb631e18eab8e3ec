//! Per-call outcome of the buffer protocol.

use super::buffer::CallBuffer;
use super::status::Status;
use crate::error::{BindingError, BindingResult};
use libc::c_int;
use tracing::trace;

/// What a single engine call produced.
///
/// Built only from the status code, so a buffer is never read unless the
/// status designates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    BufferTooSmall,
    VerificationFailed,
    EngineError(String),
    Unexpected(c_int),
}

impl<T> Outcome<T> {
    /// Variant name, for logging without payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::BufferTooSmall => "buffer_too_small",
            Outcome::VerificationFailed => "verification_failed",
            Outcome::EngineError(_) => "engine_error",
            Outcome::Unexpected(_) => "unexpected",
        }
    }

    /// Collapse into a value for calls where only success carries one
    /// (setup, prove). `VerificationFailed` is not part of their table.
    pub fn into_value(self, capacity: usize) -> BindingResult<T> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::BufferTooSmall => Err(BindingError::BufferTooSmall { capacity }),
            Outcome::EngineError(message) => Err(BindingError::Engine(message)),
            Outcome::VerificationFailed => Err(BindingError::Unexpected {
                status: Status::VerificationFailed.code(),
            }),
            Outcome::Unexpected(status) => Err(BindingError::Unexpected { status }),
        }
    }
}

impl Outcome<()> {
    /// Collapse a verify outcome: rejection is `Ok(false)`, not an error.
    pub fn into_verdict(self, capacity: usize) -> BindingResult<bool> {
        match self {
            Outcome::Success(()) => Ok(true),
            Outcome::VerificationFailed => Ok(false),
            Outcome::BufferTooSmall => Err(BindingError::BufferTooSmall { capacity }),
            Outcome::EngineError(message) => Err(BindingError::Engine(message)),
            Outcome::Unexpected(status) => Err(BindingError::Unexpected { status }),
        }
    }
}

/// Run a call that fills a result buffer or an error buffer.
///
/// Both buffers are allocated at `capacity` and released when this returns.
/// If they cannot be allocated the engine is not called.
pub fn call_with_output<F>(capacity: usize, call: F) -> BindingResult<Outcome<String>>
where
    F: FnOnce(&mut CallBuffer, &mut CallBuffer) -> c_int,
{
    let mut result = CallBuffer::with_capacity(capacity)?;
    let mut error = CallBuffer::with_capacity(capacity)?;

    let status = Status::from_raw(call(&mut result, &mut error));
    trace!(?status, capacity, "engine returned");

    Ok(match status {
        Status::Success => Outcome::Success(result.read_string()?),
        Status::BufferTooSmall => Outcome::BufferTooSmall,
        Status::VerificationFailed => Outcome::VerificationFailed,
        Status::Custom => Outcome::EngineError(error.read_string()?),
        Status::Unexpected(code) => Outcome::Unexpected(code),
    })
}

/// Run a call that only reports through its status and an error buffer.
pub fn call_checked<F>(capacity: usize, call: F) -> BindingResult<Outcome<()>>
where
    F: FnOnce(&mut CallBuffer) -> c_int,
{
    let mut error = CallBuffer::with_capacity(capacity)?;

    let status = Status::from_raw(call(&mut error));
    trace!(?status, capacity, "engine returned");

    Ok(match status {
        Status::Success => Outcome::Success(()),
        Status::BufferTooSmall => Outcome::BufferTooSmall,
        Status::VerificationFailed => Outcome::VerificationFailed,
        Status::Custom => Outcome::EngineError(error.read_string()?),
        Status::Unexpected(code) => Outcome::Unexpected(code),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::status::{
        ERR_BUFFER_TOO_SMALL, ERR_CUSTOM, ERR_NONE, ERR_VERIFICATION_FAILED,
    };

    #[test]
    fn test_success_reads_result_buffer() {
        let outcome = call_with_output(32, |result, error| {
            result.writer().put("vk").unwrap();
            error.writer().put("ignored").unwrap();
            ERR_NONE
        })
        .unwrap();
        assert_eq!(outcome, Outcome::Success("vk".to_string()));
    }

    #[test]
    fn test_allocation_failure_skips_the_call() {
        let mut called = false;
        let err = call_with_output(usize::MAX, |_, _| {
            called = true;
            ERR_NONE
        })
        .unwrap_err();
        assert_eq!(
            err,
            BindingError::BufferAllocation {
                capacity: usize::MAX
            }
        );
        assert!(!called);

        let err = call_checked(usize::MAX, |_| ERR_NONE).unwrap_err();
        assert!(matches!(err, BindingError::BufferAllocation { .. }));
    }

    #[test]
    fn test_custom_reads_error_buffer() {
        let outcome = call_with_output(32, |result, error| {
            result.writer().put("ignored").unwrap();
            error.writer().put("bad circuit").unwrap();
            ERR_CUSTOM
        })
        .unwrap();
        assert_eq!(outcome, Outcome::EngineError("bad circuit".to_string()));
    }

    #[test]
    fn test_buffer_too_small_ignores_contents() {
        // Garbage in the buffers must not matter.
        let outcome = call_with_output(4, |result, error| {
            let len = result.capacity();
            unsafe {
                std::ptr::write_bytes(result.as_mut_ptr(), b'x', len);
                std::ptr::write_bytes(error.as_mut_ptr(), b'y', len);
            }
            ERR_BUFFER_TOO_SMALL
        })
        .unwrap();
        assert_eq!(outcome, Outcome::BufferTooSmall);
        assert_eq!(
            outcome.into_value(4),
            Err(BindingError::BufferTooSmall { capacity: 4 })
        );
    }

    #[test]
    fn test_unexpected_does_not_read_error_buffer() {
        // An unterminated error buffer would fail to read; it must be left alone.
        let outcome = call_checked(2, |error| {
            let len = error.capacity();
            unsafe { std::ptr::write_bytes(error.as_mut_ptr(), b'z', len) };
            7
        })
        .unwrap();
        assert_eq!(outcome, Outcome::Unexpected(7));
    }

    #[test]
    fn test_verdicts() {
        assert_eq!(Outcome::Success(()).into_verdict(8), Ok(true));
        assert_eq!(Outcome::<()>::VerificationFailed.into_verdict(8), Ok(false));
        assert_eq!(
            Outcome::<()>::EngineError("bad key".into()).into_verdict(8),
            Err(BindingError::Engine("bad key".into()))
        );
        assert_eq!(
            Outcome::<()>::Unexpected(-3).into_verdict(8),
            Err(BindingError::Unexpected { status: -3 })
        );
    }

    #[test]
    fn test_verification_failed_outside_verify_is_unexpected() {
        let outcome =
            call_with_output(8, |_result, _error| ERR_VERIFICATION_FAILED).unwrap();
        assert_eq!(
            outcome.into_value(8),
            Err(BindingError::Unexpected {
                status: ERR_VERIFICATION_FAILED
            })
        );
    }
}
