//! # picnic3-mpc
//!
//! Bit-sliced `LowMC` primitives and the 16-party MPC-in-the-head (KKW)
//! simulation core of the `Picnic3` post-quantum signature scheme.
//!
//! The crate covers the hot inner layer of a `Picnic3` prover/verifier:
//! plain `LowMC` encryption, the auxiliary tape pass that makes a set of
//! sixteen random tapes consistent, and the online simulation that replays
//! the masked execution and checks it against the public output. All three
//! are bound per parameter set through a registry that picks the widest
//! SIMD backend the CPU supports; every backend is byte-identical.
//!
//! Tapes, broadcasts and states interoperate bit-for-bit with the reference
//! implementation, so transcripts produced here cross-verify.
//!
//! # Usage
//! ```rust
//! use picnic3_mpc::{instance_get, ParameterSet};
//!
//! let inst = instance_get(ParameterSet::Picnic3L1).expect("KKW instance");
//!
//! let mut key = [0u8; 17];
//! key[0] = 0x80;
//! let mut plaintext = [0u8; 17];
//! plaintext[0] = 0xAB;
//! plaintext[1] = 0xFF;
//!
//! let mut ciphertext = [0u8; 17];
//! (inst.impls.lowmc)(&key, &plaintext, &mut ciphertext);
//! assert_eq!(ciphertext[0], 0x2F);
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod bitstream;
// Re-exported for tests and benchmarks; not part of the stable API.
#[doc(hidden)]
pub mod kernels;
mod lowmc;
mod mpc;
mod registry;
mod tapes;
mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use lowmc::LowmcParameters;
pub use registry::{instance_get, Implementations, Instance};
pub use tapes::{MessageSet, RandomTapeSet, NUM_PARTIES};
pub use types::{ComputeAuxFn, LowmcFn, ParameterSet, SimulateOnlineFn};

/// Returns the name of the backend the dispatcher binds on this CPU.
#[must_use]
pub fn active_backend() -> &'static str {
    registry::dispatcher::active_backend_name()
}
