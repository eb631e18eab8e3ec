//! Typed API over the engine boundary.
//!
//! Hides C string conversion, buffer allocation and status dispatch behind
//! `setup`, `prove`, `verify` and `verbose`. Every operation takes the buffer
//! capacity to use for that call; there is no retry with a larger one.

use crate::engine::{Engine, NativeEngine};
use crate::error::{BindingError, BindingResult};
use crate::marshal::inputs_json;
use crate::protocol::{c_arg, call_checked, call_with_output};
use crate::types::{ProofWithInputs, VerifierFormat, VerifyingKey};
use serde::Serialize;
use std::ffi::CString;
use std::path::Path;
use tracing::debug;

/// Caller-side handle over an [`Engine`].
#[derive(Debug, Clone)]
pub struct Binding<E> {
    engine: E,
}

impl Binding<NativeEngine> {
    /// Binding over the linked native library.
    pub fn native() -> BindingResult<Self> {
        Ok(Self::new(NativeEngine::new()?))
    }
}

impl<E: Engine> Binding<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Toggle engine logging for the whole process.
    pub fn verbose(&self, on: bool) {
        debug!(on, "setting engine verbosity");
        self.engine.set_verbose(on);
    }

    /// Run the trusted setup for `circuit`.
    ///
    /// The proving key is written by the engine to `proving_key_out`; the
    /// verifying key is returned in `format`.
    pub fn setup(
        &self,
        circuit: &Path,
        proving_key_out: &Path,
        format: VerifierFormat,
        max_buffer: usize,
    ) -> BindingResult<VerifyingKey> {
        let circuit_c = path_arg("circuit", circuit)?;
        let proving_key_c = path_arg("proving_key", proving_key_out)?;
        let format_c = c_arg("verifier_format", format.as_str())?;

        debug!(
            circuit = %circuit.display(),
            proving_key = %proving_key_out.display(),
            %format,
            max_buffer,
            "engine setup"
        );
        let outcome = call_with_output(max_buffer, |result, error| {
            self.engine
                .setup(&circuit_c, &proving_key_c, &format_c, result, error)
        })?;
        debug!(outcome = outcome.kind(), "engine setup returned");

        outcome.into_value(max_buffer).map(VerifyingKey::from)
    }

    /// Generate a proof for `inputs`.
    ///
    /// `inputs` is usually [`crate::WitnessInputs`] but anything serializing
    /// to a JSON object is accepted. Marshaling failures are returned before
    /// the engine is called.
    pub fn prove<T>(
        &self,
        circuit: &Path,
        proving_key: &Path,
        inputs: &T,
        max_buffer: usize,
    ) -> BindingResult<ProofWithInputs>
    where
        T: Serialize + ?Sized,
    {
        let inputs_c = inputs_json(inputs)?;
        let circuit_c = path_arg("circuit", circuit)?;
        let proving_key_c = path_arg("proving_key", proving_key)?;

        debug!(
            circuit = %circuit.display(),
            proving_key = %proving_key.display(),
            max_buffer,
            "engine prove"
        );
        let outcome = call_with_output(max_buffer, |result, error| {
            self.engine
                .prove(&circuit_c, &proving_key_c, &inputs_c, result, error)
        })?;
        debug!(outcome = outcome.kind(), "engine prove returned");

        outcome.into_value(max_buffer).map(ProofWithInputs::from)
    }

    /// Check a proof against a verifying key.
    ///
    /// A proof that does not verify is `Ok(false)`, not an error.
    pub fn verify(
        &self,
        verifying_key: &VerifyingKey,
        proof_with_inputs: &ProofWithInputs,
        max_buffer: usize,
    ) -> BindingResult<bool> {
        let verifying_key_c = c_arg("verifying_key", verifying_key.as_str())?;
        let proof_c = c_arg("proof_with_inputs", proof_with_inputs.as_str())?;

        debug!(
            verifying_key = %verifying_key.fingerprint(),
            proof = %proof_with_inputs.fingerprint(),
            max_buffer,
            "engine verify"
        );
        let outcome = call_checked(max_buffer, |error| {
            self.engine.verify(&verifying_key_c, &proof_c, error)
        })?;
        debug!(outcome = outcome.kind(), "engine verify returned");

        outcome.into_verdict(max_buffer)
    }
}

#[cfg(unix)]
fn path_arg(argument: &'static str, path: &Path) -> BindingResult<CString> {
    use std::os::unix::ffi::OsStrExt;
    CString::new(path.as_os_str().as_bytes()).map_err(|_| BindingError::InteriorNul { argument })
}

#[cfg(not(unix))]
fn path_arg(argument: &'static str, path: &Path) -> BindingResult<CString> {
    c_arg(argument, &path.to_string_lossy())
}

/// Toggle native engine logging for the whole process.
pub fn verbose(on: bool) {
    crate::engine::set_verbosity(on);
}

/// [`Binding::setup`] on the native engine.
pub fn setup(
    circuit: &Path,
    proving_key_out: &Path,
    format: VerifierFormat,
    max_buffer: usize,
) -> BindingResult<VerifyingKey> {
    Binding::native()?.setup(circuit, proving_key_out, format, max_buffer)
}

/// [`Binding::prove`] on the native engine.
pub fn prove<T>(
    circuit: &Path,
    proving_key: &Path,
    inputs: &T,
    max_buffer: usize,
) -> BindingResult<ProofWithInputs>
where
    T: Serialize + ?Sized,
{
    Binding::native()?.prove(circuit, proving_key, inputs, max_buffer)
}

/// [`Binding::verify`] on the native engine.
pub fn verify(
    verifying_key: &VerifyingKey,
    proof_with_inputs: &ProofWithInputs,
    max_buffer: usize,
) -> BindingResult<bool> {
    Binding::native()?.verify(verifying_key, proof_with_inputs, max_buffer)
}
