//! Status codes returned by every engine entry point.

use libc::c_int;

/// Call succeeded; the result buffer holds the output.
pub const ERR_NONE: c_int = 0;
/// Output did not fit in the offered buffer.
pub const ERR_BUFFER_TOO_SMALL: c_int = 1;
/// Proof is well formed but does not verify (verify only).
pub const ERR_VERIFICATION_FAILED: c_int = 2;
/// Engine failure; the error buffer holds the message.
pub const ERR_CUSTOM: c_int = 100;

/// Decoded engine status.
///
/// This is the only thing that decides which buffer, if any, may be read
/// after a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    BufferTooSmall,
    VerificationFailed,
    Custom,
    Unexpected(c_int),
}

impl Status {
    /// Decode a raw status code.
    pub fn from_raw(code: c_int) -> Self {
        match code {
            ERR_NONE => Self::Success,
            ERR_BUFFER_TOO_SMALL => Self::BufferTooSmall,
            ERR_VERIFICATION_FAILED => Self::VerificationFailed,
            ERR_CUSTOM => Self::Custom,
            other => Self::Unexpected(other),
        }
    }

    /// Encode back to the raw ABI value.
    pub fn code(self) -> c_int {
        match self {
            Self::Success => ERR_NONE,
            Self::BufferTooSmall => ERR_BUFFER_TOO_SMALL,
            Self::VerificationFailed => ERR_VERIFICATION_FAILED,
            Self::Custom => ERR_CUSTOM,
            Self::Unexpected(code) => code,
        }
    }
}
