//! Native engine linked over the C ABI.
//!
//! With the `native` feature the four entry points are resolved at link time
//! (see `build.rs`). Without it, a stand-in answers every call with an engine
//! error so the crate still builds and the failure is reported through the
//! normal protocol.
//!
//! The engine is not assumed to be reentrant. Every call, the verbosity
//! toggle included, runs under one process-wide lock.

use super::traits::Engine;
use crate::error::BindingResult;
use crate::protocol::CallBuffer;
use libc::c_int;
use std::ffi::CStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENGINE_LOCK: Mutex<()> = Mutex::new(());
static VERBOSE: AtomicBool = AtomicBool::new(false);

#[cfg(feature = "native")]
mod sys {
    use libc::{c_char, c_int, size_t};

    extern "C" {
        pub fn verbose(on: c_int);

        pub fn setup(
            circuit_path: *const c_char,
            pk_path: *const c_char,
            verifier_type: *const c_char,
            verifier_buffer: *mut c_char,
            verifier_buffer_size: size_t,
            error_buffer: *mut c_char,
            error_buffer_size: size_t,
        ) -> c_int;

        pub fn prove(
            circuit_path: *const c_char,
            pk_path: *const c_char,
            inputs: *const c_char,
            proof_buffer: *mut c_char,
            proof_buffer_size: size_t,
            error_buffer: *mut c_char,
            error_buffer_size: size_t,
        ) -> c_int;

        pub fn verify(
            verifying_key: *const c_char,
            proof_with_inputs: *const c_char,
            error_buffer: *mut c_char,
            error_buffer_size: size_t,
        ) -> c_int;
    }
}

#[cfg(not(feature = "native"))]
mod sys {
    use crate::protocol::{OutBuffer, ERR_BUFFER_TOO_SMALL, ERR_CUSTOM};
    use libc::{c_char, c_int, size_t};

    pub const NOT_LINKED: &str = "built without the `native` feature";

    unsafe fn not_linked(error_buffer: *mut c_char, error_buffer_size: size_t) -> c_int {
        match OutBuffer::from_raw(error_buffer, error_buffer_size).put(NOT_LINKED) {
            Ok(()) => ERR_CUSTOM,
            Err(_) => ERR_BUFFER_TOO_SMALL,
        }
    }

    pub unsafe fn verbose(_on: c_int) {}

    pub unsafe fn setup(
        _circuit_path: *const c_char,
        _pk_path: *const c_char,
        _verifier_type: *const c_char,
        _verifier_buffer: *mut c_char,
        _verifier_buffer_size: size_t,
        error_buffer: *mut c_char,
        error_buffer_size: size_t,
    ) -> c_int {
        not_linked(error_buffer, error_buffer_size)
    }

    pub unsafe fn prove(
        _circuit_path: *const c_char,
        _pk_path: *const c_char,
        _inputs: *const c_char,
        _proof_buffer: *mut c_char,
        _proof_buffer_size: size_t,
        error_buffer: *mut c_char,
        error_buffer_size: size_t,
    ) -> c_int {
        not_linked(error_buffer, error_buffer_size)
    }

    pub unsafe fn verify(
        _verifying_key: *const c_char,
        _proof_with_inputs: *const c_char,
        error_buffer: *mut c_char,
        error_buffer_size: size_t,
    ) -> c_int {
        not_linked(error_buffer, error_buffer_size)
    }
}

fn engine_lock() -> MutexGuard<'static, ()> {
    ENGINE_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Forward the verbosity toggle to the native engine.
///
/// Process-wide: affects every later call from any thread until changed
/// again. Serialized with engine calls, so it never lands mid-call.
pub fn set_verbosity(on: bool) {
    let _guard = engine_lock();
    unsafe { sys::verbose(c_int::from(on)) };
    VERBOSE.store(on, Ordering::SeqCst);
}

/// Verbosity last forwarded to the native engine.
pub fn verbosity() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Handle to the linked engine library.
#[derive(Debug, Clone, Copy)]
pub struct NativeEngine {
    _linked: (),
}

impl NativeEngine {
    /// Get a handle, failing early if the library is not linked.
    pub fn new() -> BindingResult<Self> {
        #[cfg(not(feature = "native"))]
        {
            Err(crate::error::BindingError::EngineUnavailable(format!(
                "{}; rebuild with `--features native` and CIRCOM_ENGINE_LIB_DIR set",
                sys::NOT_LINKED
            )))
        }
        #[cfg(feature = "native")]
        {
            Ok(Self { _linked: () })
        }
    }
}

impl Engine for NativeEngine {
    fn set_verbose(&self, on: bool) {
        set_verbosity(on);
    }

    fn setup(
        &self,
        circuit: &CStr,
        proving_key: &CStr,
        verifier_format: &CStr,
        result: &mut CallBuffer,
        error: &mut CallBuffer,
    ) -> c_int {
        let _guard = engine_lock();
        let (result_cap, error_cap) = (result.capacity(), error.capacity());
        unsafe {
            sys::setup(
                circuit.as_ptr(),
                proving_key.as_ptr(),
                verifier_format.as_ptr(),
                result.as_mut_ptr(),
                result_cap,
                error.as_mut_ptr(),
                error_cap,
            )
        }
    }

    fn prove(
        &self,
        circuit: &CStr,
        proving_key: &CStr,
        inputs_json: &CStr,
        result: &mut CallBuffer,
        error: &mut CallBuffer,
    ) -> c_int {
        let _guard = engine_lock();
        let (result_cap, error_cap) = (result.capacity(), error.capacity());
        unsafe {
            sys::prove(
                circuit.as_ptr(),
                proving_key.as_ptr(),
                inputs_json.as_ptr(),
                result.as_mut_ptr(),
                result_cap,
                error.as_mut_ptr(),
                error_cap,
            )
        }
    }

    fn verify(
        &self,
        verifying_key: &CStr,
        proof_with_inputs: &CStr,
        error: &mut CallBuffer,
    ) -> c_int {
        let _guard = engine_lock();
        let error_cap = error.capacity();
        unsafe {
            sys::verify(
                verifying_key.as_ptr(),
                proof_with_inputs.as_ptr(),
                error.as_mut_ptr(),
                error_cap,
            )
        }
    }
}
