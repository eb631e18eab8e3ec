//! In-process engine for tests and benches.
//!
//! `MockEngine` speaks the same buffer protocol as the native library but
//! replaces the SNARK with hash commitments:
//! - setup digests the circuit source and writes a proving key file
//! - prove binds the witness inputs to the key's commitment
//! - verify recomputes the binding and rejects anything that differs
//!
//! It records every call, and can be told to answer with an arbitrary status
//! to exercise the caller's dispatch.

use super::traits::Engine;
use crate::protocol::{
    CallBuffer, WriteError, ERR_BUFFER_TOO_SMALL, ERR_CUSTOM, ERR_NONE, ERR_VERIFICATION_FAILED,
};
use libc::c_int;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ffi::CStr;
use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const PROTOCOL: &str = "mock-groth16";

/// One recorded entry point invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Verbose(bool),
    Setup {
        circuit: String,
        proving_key: String,
        verifier_format: String,
        capacity: usize,
    },
    Prove {
        circuit: String,
        proving_key: String,
        inputs_json: String,
        capacity: usize,
    },
    Verify {
        verifying_key: String,
        proof_with_inputs: String,
        capacity: usize,
    },
}

/// Mock proving engine.
#[derive(Clone, Default)]
pub struct MockEngine {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<MockCall>,
    forced_status: Option<c_int>,
    verbose: bool,
}

#[derive(Serialize, Deserialize)]
struct ProvingKeyFile {
    protocol: String,
    circuit: String,
    toxic: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonVerifyingKey {
    protocol: String,
    circuit: String,
    commitment: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonProof {
    proof: String,
    inputs: serde_json::Map<String, serde_json::Value>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Drain the call log.
    pub fn take_calls(&self) -> Vec<MockCall> {
        std::mem::take(&mut self.lock().calls)
    }

    /// Number of setup/prove/verify calls (verbosity toggles excluded).
    pub fn boundary_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| !matches!(call, MockCall::Verbose(_)))
            .count()
    }

    /// Answer every following call with `status`, leaving buffers untouched.
    pub fn force_status(&self, status: c_int) {
        self.lock().forced_status = Some(status);
    }

    /// Go back to real answers.
    pub fn clear_forced_status(&self) {
        self.lock().forced_status = None;
    }

    /// Last value passed to `set_verbose`.
    pub fn is_verbose(&self) -> bool {
        self.lock().verbose
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call; returns the forced status if one is set.
    fn record(&self, call: MockCall) -> Option<c_int> {
        let mut state = self.lock();
        state.calls.push(call);
        state.forced_status
    }
}

fn text(s: &CStr) -> String {
    s.to_string_lossy().into_owned()
}

fn sha256_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

fn arg<'a>(name: &str, s: &'a CStr) -> Result<&'a str, String> {
    s.to_str()
        .map_err(|e| format!("argument {} is not UTF-8: {}", name, e))
}

/// Write the outcome into the buffer its status designates.
fn reply(result: &mut CallBuffer, error: &mut CallBuffer, outcome: Result<String, String>) -> c_int {
    match outcome {
        Ok(output) => write(result, error, &output, ERR_NONE),
        Err(message) => fail(error, &message),
    }
}

fn fail(error: &mut CallBuffer, message: &str) -> c_int {
    match error.writer().put(message) {
        Ok(()) => ERR_CUSTOM,
        Err(WriteError::Overflow { .. }) => ERR_BUFFER_TOO_SMALL,
        Err(WriteError::InteriorNul) => fail(error, "error message contains a nul byte"),
    }
}

fn write(buffer: &mut CallBuffer, error: &mut CallBuffer, output: &str, status: c_int) -> c_int {
    match buffer.writer().put(output) {
        Ok(()) => status,
        Err(WriteError::Overflow { .. }) => ERR_BUFFER_TOO_SMALL,
        Err(WriteError::InteriorNul) => fail(error, "output contains a nul byte"),
    }
}

fn run_setup(circuit: &CStr, proving_key: &CStr, verifier_format: &CStr) -> Result<String, String> {
    let circuit = arg("circuit", circuit)?;
    let proving_key = arg("proving_key", proving_key)?;
    let verifier_format = arg("verifier_format", verifier_format)?;

    if verifier_format != "json" && verifier_format != "solidity" {
        return Err("invalid verifier type".to_string());
    }

    let source = fs::read_to_string(circuit)
        .map_err(|e| format!("Io(\"cannot read circuit {}: {}\")", circuit, e))?;
    let circuit_digest = sha256_hex(&[source.as_bytes()]);
    let toxic = sha256_hex(&[b"toxic", circuit_digest.as_bytes(), proving_key.as_bytes()]);
    let commitment = sha256_hex(&[toxic.as_bytes()]);

    let key = ProvingKeyFile {
        protocol: PROTOCOL.to_string(),
        circuit: circuit_digest.clone(),
        toxic,
    };
    let key = serde_json::to_string(&key).map_err(|e| e.to_string())?;
    fs::write(proving_key, key)
        .map_err(|e| format!("Io(\"cannot write proving key {}: {}\")", proving_key, e))?;

    if verifier_format == "solidity" {
        return Ok(format!(
            "pragma solidity ^0.5.0;\n\ncontract Verifier {{\n    bytes32 constant CIRCUIT = 0x{};\n    bytes32 constant COMMITMENT = 0x{};\n}}\n",
            circuit_digest, commitment
        ));
    }

    let vk = JsonVerifyingKey {
        protocol: PROTOCOL.to_string(),
        circuit: circuit_digest,
        commitment,
    };
    serde_json::to_string(&vk).map_err(|e| e.to_string())
}

fn run_prove(circuit: &CStr, proving_key: &CStr, inputs_json: &CStr) -> Result<String, String> {
    let circuit = arg("circuit", circuit)?;
    let proving_key = arg("proving_key", proving_key)?;
    let inputs_json = arg("inputs", inputs_json)?;

    let key = fs::read_to_string(proving_key)
        .map_err(|e| format!("Io(\"cannot read proving key {}: {}\")", proving_key, e))?;
    let key: ProvingKeyFile =
        serde_json::from_str(&key).map_err(|e| format!("BadFormat(\"proving key: {}\")", e))?;

    let source = fs::read_to_string(circuit)
        .map_err(|e| format!("Io(\"cannot read circuit {}: {}\")", circuit, e))?;
    if sha256_hex(&[source.as_bytes()]) != key.circuit {
        return Err("BadFormat(\"proving key was not generated for this circuit\")".to_string());
    }

    let inputs: serde_json::Map<String, serde_json::Value> = serde_json::from_str(inputs_json)
        .map_err(|e| format!("BadFormat(\"inputs: {}\")", e))?;
    if inputs.is_empty() {
        return Err("BadFormat(\"no witness inputs\")".to_string());
    }

    let commitment = sha256_hex(&[key.toxic.as_bytes()]);
    let proof = JsonProof {
        proof: binding_tag(&commitment, &key.circuit, &inputs)?,
        inputs,
    };
    serde_json::to_string(&proof).map_err(|e| e.to_string())
}

fn binding_tag(
    commitment: &str,
    circuit: &str,
    inputs: &serde_json::Map<String, serde_json::Value>,
) -> Result<String, String> {
    let inputs = serde_json::to_string(inputs).map_err(|e| e.to_string())?;
    Ok(sha256_hex(&[
        commitment.as_bytes(),
        circuit.as_bytes(),
        inputs.as_bytes(),
    ]))
}

/// `Ok(true)` verifies, `Ok(false)` rejects, `Err` is an engine failure.
fn run_verify(verifying_key: &CStr, proof_with_inputs: &CStr) -> Result<bool, String> {
    let verifying_key = arg("verifying_key", verifying_key)?;
    let vk: JsonVerifyingKey = serde_json::from_str(verifying_key)
        .map_err(|e| format!("BadFormat(\"verifying key: {}\")", e))?;
    if vk.protocol != PROTOCOL {
        return Err(format!("BadFormat(\"unsupported protocol {}\")", vk.protocol));
    }

    // Anything that is not exactly a proof this engine would emit is rejected.
    let Ok(raw) = proof_with_inputs.to_str() else {
        return Ok(false);
    };
    let Ok(proof) = serde_json::from_str::<JsonProof>(raw) else {
        return Ok(false);
    };
    if serde_json::to_string(&proof).ok().as_deref() != Some(raw) {
        return Ok(false);
    }

    let expected = binding_tag(&vk.commitment, &vk.circuit, &proof.inputs)?;
    Ok(proof.proof == expected)
}

impl Engine for MockEngine {
    fn set_verbose(&self, on: bool) {
        let mut state = self.lock();
        state.calls.push(MockCall::Verbose(on));
        state.verbose = on;
    }

    fn setup(
        &self,
        circuit: &CStr,
        proving_key: &CStr,
        verifier_format: &CStr,
        result: &mut CallBuffer,
        error: &mut CallBuffer,
    ) -> c_int {
        let forced = self.record(MockCall::Setup {
            circuit: text(circuit),
            proving_key: text(proving_key),
            verifier_format: text(verifier_format),
            capacity: result.capacity(),
        });
        if let Some(status) = forced {
            return status;
        }
        reply(result, error, run_setup(circuit, proving_key, verifier_format))
    }

    fn prove(
        &self,
        circuit: &CStr,
        proving_key: &CStr,
        inputs_json: &CStr,
        result: &mut CallBuffer,
        error: &mut CallBuffer,
    ) -> c_int {
        let forced = self.record(MockCall::Prove {
            circuit: text(circuit),
            proving_key: text(proving_key),
            inputs_json: text(inputs_json),
            capacity: result.capacity(),
        });
        if let Some(status) = forced {
            return status;
        }
        reply(result, error, run_prove(circuit, proving_key, inputs_json))
    }

    fn verify(
        &self,
        verifying_key: &CStr,
        proof_with_inputs: &CStr,
        error: &mut CallBuffer,
    ) -> c_int {
        let forced = self.record(MockCall::Verify {
            verifying_key: text(verifying_key),
            proof_with_inputs: text(proof_with_inputs),
            capacity: error.capacity(),
        });
        if let Some(status) = forced {
            return status;
        }
        match run_verify(verifying_key, proof_with_inputs) {
            Ok(true) => ERR_NONE,
            Ok(false) => ERR_VERIFICATION_FAILED,
            Err(message) => fail(error, &message),
        }
    }
}
