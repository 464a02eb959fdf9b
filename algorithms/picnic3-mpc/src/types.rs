//! Shared types: the parameter-set enumeration and the unified entry-point
//! signatures every backend implements.

use crate::tapes::{MessageSet, RandomTapeSet};

// =============================================================================
// ENTRY-POINT SIGNATURES
// =============================================================================

/// Plain `LowMC` encryption: `(key, plaintext, ciphertext)`.
///
/// All hardware backends and the portable fallback implement this same
/// signature so the dispatcher can swap them at resolution time.
pub type LowmcFn = fn(&[u8], &[u8], &mut [u8]);

/// Auxiliary tape pass: `(tapes, key_mask_out)`. Rewrites the last party's
/// and-helper bits in place and emits the derived key mask.
pub type ComputeAuxFn = fn(&mut RandomTapeSet, &mut [u8]);

/// Online MPC simulation:
/// `(masked_key, tapes, msgs, plaintext, public_output) -> matches`.
pub type SimulateOnlineFn = fn(&[u8], &mut RandomTapeSet, &mut MessageSet, &[u8], &[u8]) -> bool;

// =============================================================================
// PARAMETER SETS
// =============================================================================

/// Parameter-set identifiers of the Picnic family.
///
/// The enumeration is closed and mirrors the reference registry. Only the
/// KKW (`Picnic3`) identifiers resolve to an instance here; the ZKB++ and
/// Unruh variants are recognized but report no implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterSet {
    /// ZKB++, L1, Fiat-Shamir (not provided by this crate).
    PicnicL1Fs,
    /// ZKB++, L1, Unruh (not provided by this crate).
    PicnicL1Ur,
    /// ZKB++, L3, Fiat-Shamir (not provided by this crate).
    PicnicL3Fs,
    /// ZKB++, L3, Unruh (not provided by this crate).
    PicnicL3Ur,
    /// ZKB++, L5, Fiat-Shamir (not provided by this crate).
    PicnicL5Fs,
    /// ZKB++, L5, Unruh (not provided by this crate).
    PicnicL5Ur,
    /// KKW over `LowMC`-129-43, 16 parties.
    Picnic3L1,
    /// KKW over `LowMC`-192-64, 16 parties.
    Picnic3L3,
    /// KKW over `LowMC`-255-85, 16 parties.
    Picnic3L5,
    /// ZKB++ over the full-S-box L1 instance (not provided by this crate).
    PicnicL1Full,
    /// ZKB++ over the full-S-box L3 instance (not provided by this crate).
    PicnicL3Full,
    /// ZKB++ over the full-S-box L5 instance (not provided by this crate).
    PicnicL5Full,
}

impl ParameterSet {
    /// All identifiers, in registry order.
    pub const ALL: [Self; 12] = [
        Self::PicnicL1Fs,
        Self::PicnicL1Ur,
        Self::PicnicL3Fs,
        Self::PicnicL3Ur,
        Self::PicnicL5Fs,
        Self::PicnicL5Ur,
        Self::Picnic3L1,
        Self::Picnic3L3,
        Self::Picnic3L5,
        Self::PicnicL1Full,
        Self::PicnicL3Full,
        Self::PicnicL5Full,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}
