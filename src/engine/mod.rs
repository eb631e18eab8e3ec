//! Proving engine behind the C ABI.
//!
//! - `traits`: the four entry points as a Rust trait
//! - `native`: the linked library (feature `native`)
//! - `mock`: hash-commitment stand-in speaking the same protocol

pub mod mock;
pub mod native;
pub mod traits;

pub use mock::{MockCall, MockEngine};
pub use native::{set_verbosity, verbosity, NativeEngine};
pub use traits::Engine;
