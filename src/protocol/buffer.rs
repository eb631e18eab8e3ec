//! Fixed-capacity buffers shared with the engine.
//!
//! The caller owns both sides of every exchange: [`CallBuffer`] is allocated
//! before the call at the configured capacity and dropped afterwards on every
//! path. The engine only ever sees a pointer and a capacity. Rust engines
//! write through [`OutBuffer`], which refuses anything that would not fit
//! together with its nul terminator.

use crate::error::{BindingError, BindingResult};
use libc::c_char;
use std::ffi::{CStr, CString};
use thiserror::Error;

/// Caller-owned, zero-initialised byte region of fixed capacity.
pub struct CallBuffer {
    bytes: Box<[u8]>,
}

impl CallBuffer {
    /// Allocate a zeroed buffer of exactly `capacity` bytes.
    ///
    /// Fails with [`BindingError::BufferAllocation`] when the allocator
    /// cannot provide that much memory.
    pub fn with_capacity(capacity: usize) -> BindingResult<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| BindingError::BufferAllocation { capacity })?;
        bytes.resize(capacity, 0u8);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Declared capacity, terminator included.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Raw pointer handed to the engine together with [`Self::capacity`].
    pub fn as_mut_ptr(&mut self) -> *mut c_char {
        self.bytes.as_mut_ptr().cast()
    }

    /// Checked writer over this buffer.
    pub fn writer(&mut self) -> OutBuffer<'_> {
        OutBuffer::new(&mut self.bytes)
    }

    /// Read the nul-terminated string the engine left in the buffer.
    ///
    /// Only meaningful after a status that designates this buffer.
    pub fn read_string(&self) -> BindingResult<String> {
        let text = CStr::from_bytes_until_nul(&self.bytes).map_err(|_| {
            BindingError::MalformedOutput(format!(
                "no terminator within {} byte buffer",
                self.capacity()
            ))
        })?;
        text.to_str()
            .map(str::to_owned)
            .map_err(|e| BindingError::MalformedOutput(e.to_string()))
    }
}

/// Reasons a checked write is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("{len} byte output does not fit in {capacity} byte buffer")]
    Overflow { len: usize, capacity: usize },

    #[error("output contains an interior nul byte")]
    InteriorNul,
}

/// Callee view of a buffer: a byte region paired with its capacity.
///
/// The only way to write is [`OutBuffer::put`], which never goes past the
/// capacity and always terminates what it writes.
pub struct OutBuffer<'a> {
    bytes: &'a mut [u8],
}

impl<'a> OutBuffer<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    /// Wrap a pointer and capacity received over the C ABI.
    ///
    /// A null pointer is treated as a zero-capacity buffer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `capacity` bytes for the whole of
    /// `'a`, and nothing else may access that region meanwhile.
    pub unsafe fn from_raw(ptr: *mut c_char, capacity: usize) -> Self {
        if ptr.is_null() || capacity == 0 {
            return Self { bytes: &mut [] };
        }
        Self {
            bytes: std::slice::from_raw_parts_mut(ptr.cast::<u8>(), capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Write `s` followed by a nul terminator.
    ///
    /// A string of `n` bytes needs a capacity of at least `n + 1`.
    pub fn put(&mut self, s: &str) -> Result<(), WriteError> {
        let src = s.as_bytes();
        if src.contains(&0) {
            return Err(WriteError::InteriorNul);
        }
        if src.len() >= self.bytes.len() {
            return Err(WriteError::Overflow {
                len: src.len(),
                capacity: self.bytes.len(),
            });
        }
        self.bytes[..src.len()].copy_from_slice(src);
        self.bytes[src.len()] = 0;
        Ok(())
    }
}

/// Convert an argument to a C string, naming it in the error.
pub fn c_arg(argument: &'static str, value: &str) -> BindingResult<CString> {
    CString::new(value).map_err(|_| BindingError::InteriorNul { argument })
}
