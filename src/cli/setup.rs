use super::write_artifact;
use circom_bridge::{Binding, Engine, VerifierFormat};
use std::path::Path;
use tracing::info;

/// Compile the circuit and run the trusted setup
///
/// The engine writes the proving key to `pk`. The verifying key is written
/// to `out` when given, otherwise printed to stdout.
pub fn execute<E: Engine>(
    binding: &Binding<E>,
    circuit: &Path,
    pk: &Path,
    format: VerifierFormat,
    out: Option<&Path>,
    max_buffer: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let verifying_key = binding.setup(circuit, pk, format, max_buffer)?;

    info!(
        circuit = %circuit.display(),
        proving_key = %pk.display(),
        %format,
        bytes = verifying_key.len(),
        sha256 = %verifying_key.fingerprint(),
        "setup complete"
    );

    match out {
        Some(path) => {
            write_artifact(path, verifying_key.as_str())?;
            println!("Proving key: {}", pk.display());
            println!(
                "Verifying key ({}): {} (sha256 {})",
                format,
                path.display(),
                verifying_key.fingerprint()
            );
        }
        None => println!("{}", verifying_key),
    }

    Ok(())
}
