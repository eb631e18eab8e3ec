//! circom-bridge - caller side of the circom proving engine ABI
//!
//! The engine (circuit compilation, trusted setup, witness computation,
//! Groth16 proving and verification) lives in a native library with four C
//! entry points. This crate wraps them:
//! - `protocol`: fixed-capacity buffers and status-code dispatch
//! - `marshal`: witness inputs to the engine's JSON object
//! - `binding`: typed `setup` / `prove` / `verify` / `verbose`
//! - `engine`: the ABI as a trait, the native library, and a mock
//!
//! ```no_run
//! use circom_bridge::{Binding, VerifierFormat, WitnessInputs};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), circom_bridge::BindingError> {
//! let binding = Binding::native()?;
//! let circuit = Path::new("/tmp/circuit.circom");
//! let pk = Path::new("/tmp/proving.key");
//!
//! let vk = binding.setup(circuit, pk, VerifierFormat::Json, 4000)?;
//! let inputs = WitnessInputs::new().with("p", "2").with("q", "3");
//! let proof = binding.prove(circuit, pk, &inputs, 4000)?;
//! assert!(binding.verify(&vk, &proof, 4000)?);
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod engine;
pub mod error;
pub mod marshal;
pub mod protocol;
pub mod types;

pub use binding::{prove, setup, verbose, verify, Binding};
pub use engine::{Engine, MockEngine, NativeEngine};
pub use error::{BindingError, BindingResult};
pub use marshal::{WitnessInputs, WitnessValue};
pub use types::{ProofWithInputs, VerifierFormat, VerifyingKey};
