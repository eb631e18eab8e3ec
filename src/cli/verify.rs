use circom_bridge::{Binding, Engine, ProofWithInputs, VerifyingKey};
use std::fs;
use std::path::Path;
use tracing::info;

/// Verify a proof against a verifying key
///
/// Prints the verdict. A proof that does not verify is reported as an error
/// so the process exits non-zero.
pub fn execute<E: Engine>(
    binding: &Binding<E>,
    vk: &Path,
    proof: &Path,
    max_buffer: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let verifying_key = fs::read_to_string(vk)
        .map(VerifyingKey::from)
        .map_err(|e| format!("Failed to read verifying key '{}': {}", vk.display(), e))?;
    let proof_with_inputs = fs::read_to_string(proof)
        .map(|contents| ProofWithInputs::from(contents.trim_end().to_string()))
        .map_err(|e| format!("Failed to read proof '{}': {}", proof.display(), e))?;

    let verified = binding.verify(&verifying_key, &proof_with_inputs, max_buffer)?;

    info!(
        verifying_key = %verifying_key.fingerprint(),
        proof = %proof_with_inputs.fingerprint(),
        verified,
        "verification finished"
    );

    if verified {
        println!("✅ Proof verified");
        Ok(())
    } else {
        println!("❌ Proof rejected");
        Err("Verification failed".into())
    }
}
