use super::write_artifact;
use circom_bridge::{Binding, Engine};
use std::fs;
use std::path::Path;
use tracing::info;

/// Generate a proof from a JSON input file
///
/// The input file is a JSON object of signal name to value. It is handed to
/// the engine as-is (re-serialized), so numbers and nested arrays are fine.
pub fn execute<E: Engine>(
    binding: &Binding<E>,
    circuit: &Path,
    pk: &Path,
    input: &Path,
    out: Option<&Path>,
    max_buffer: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(input)
        .map_err(|e| format!("Failed to read input file '{}': {}", input.display(), e))?;
    let inputs: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse input file '{}': {}", input.display(), e))?;

    let proof = binding.prove(circuit, pk, &inputs, max_buffer)?;

    info!(
        circuit = %circuit.display(),
        proving_key = %pk.display(),
        bytes = proof.len(),
        sha256 = %proof.fingerprint(),
        "proof generated"
    );

    match out {
        Some(path) => {
            write_artifact(path, proof.as_str())?;
            println!(
                "Proof: {} (sha256 {})",
                path.display(),
                proof.fingerprint()
            );
        }
        None => println!("{}", proof),
    }

    Ok(())
}
