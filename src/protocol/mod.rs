//! Buffer protocol for the engine boundary.
//!
//! Every fallible engine call:
//! - receives nul-terminated input strings owned by the caller
//! - receives caller-allocated result/error buffers with their capacity
//! - returns a status code that alone decides which buffer is meaningful
//!
//! There is no retry with a larger buffer. An under-sized buffer surfaces as
//! `BufferTooSmall` and the caller picks a new capacity.

pub mod buffer;
pub mod outcome;
pub mod status;

#[cfg(test)]
mod proptests;

pub use buffer::{c_arg, CallBuffer, OutBuffer, WriteError};
pub use outcome::{call_checked, call_with_output, Outcome};
pub use status::{Status, ERR_BUFFER_TOO_SMALL, ERR_CUSTOM, ERR_NONE, ERR_VERIFICATION_FAILED};
