//! Trait abstraction for the proving engine.
//!
//! Mirrors the engine's C ABI one to one: nul-terminated inputs, caller-owned
//! buffers, raw status codes. Interpreting those codes is the job of
//! [`crate::protocol`], not of implementors.

use crate::protocol::CallBuffer;
use libc::c_int;
use std::ffi::CStr;

/// The four entry points exported by a proving engine.
///
/// Implementations must not write past a buffer's capacity and must leave
/// a nul-terminated string in whichever buffer their status designates.
pub trait Engine: Send + Sync {
    /// Process-wide logging toggle inside the engine.
    fn set_verbose(&self, on: bool);

    /// Compile the circuit, write the proving key to `proving_key` and
    /// return the verifying key in `result`.
    fn setup(
        &self,
        circuit: &CStr,
        proving_key: &CStr,
        verifier_format: &CStr,
        result: &mut CallBuffer,
        error: &mut CallBuffer,
    ) -> c_int;

    /// Compute the witness from `inputs_json` and return the proof with its
    /// public inputs in `result`.
    fn prove(
        &self,
        circuit: &CStr,
        proving_key: &CStr,
        inputs_json: &CStr,
        result: &mut CallBuffer,
        error: &mut CallBuffer,
    ) -> c_int;

    /// Check a proof. Success means it verifies; rejection has its own code.
    fn verify(
        &self,
        verifying_key: &CStr,
        proof_with_inputs: &CStr,
        error: &mut CallBuffer,
    ) -> c_int;
}
