//! Error type for calls across the engine boundary.

use thiserror::Error;

/// Result type for binding operations.
pub type BindingResult<T> = Result<T, BindingError>;

/// Errors surfaced by [`crate::Binding`] operations.
///
/// `BufferTooSmall` and `Unexpected` are the two fixed sentinels of the
/// buffer protocol. `Engine` carries the engine's own message unchanged.
/// The remaining variants are raised locally, before or after the engine
/// call, and never originate from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The engine's output did not fit in the caller-provided buffer.
    #[error("buffer too small")]
    BufferTooSmall {
        /// Capacity that was offered for this call.
        capacity: usize,
    },

    /// The engine reported a failure; the message is passed through verbatim.
    #[error("{0}")]
    Engine(String),

    /// The engine returned a status outside the set defined for the call.
    #[error("unexpected result")]
    Unexpected {
        /// Raw status code returned by the engine.
        status: i32,
    },

    /// Witness inputs could not be marshaled to a JSON object.
    #[error("failed to marshal witness inputs: {0}")]
    Marshal(String),

    /// An argument cannot be represented as a C string.
    #[error("argument `{argument}` contains an interior nul byte")]
    InteriorNul {
        /// Name of the offending argument.
        argument: &'static str,
    },

    /// The engine wrote something that is not a terminated UTF-8 string.
    #[error("malformed engine output: {0}")]
    MalformedOutput(String),

    /// A result or error buffer of the requested capacity could not be
    /// allocated. The engine was not called.
    #[error("cannot allocate a {capacity} byte buffer")]
    BufferAllocation {
        /// Capacity that was requested.
        capacity: usize,
    },

    /// The native engine library is not linked into this build.
    #[error("native engine unavailable: {0}")]
    EngineUnavailable(String),
}

impl BindingError {
    /// True for the under-provisioned buffer sentinel.
    pub fn is_buffer_too_small(&self) -> bool {
        matches!(self, Self::BufferTooSmall { .. })
    }

    /// True for the unknown status sentinel.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Unexpected { .. })
    }
}
