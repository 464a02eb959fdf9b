//! Backend word types and the per-instance entry points built on them.
//!
//! Every backend implements the same packed GF(2) vector semantics over a
//! fixed container width (192 or 256 bits); the dispatcher may swap backends
//! freely because their outputs are byte-identical.

use crate::bitstream::{BitstreamReader, BitstreamWriter};

pub mod portable;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        pub mod s128;
        pub mod s256;
    }
}

// =============================================================================
// WORD INTERFACE
// =============================================================================

/// Packed GF(2) vector of a fixed container width.
///
/// The logical value occupies the most significant `n` bits of the container;
/// everything below stays zero on entry and exit of every operation. Shift
/// counts are always 1 or 2 (the S-box triple offsets).
pub(crate) trait Word: Copy {
    /// Container width in bits; the active limb count is `BITS / 64`.
    const BITS: usize;

    fn zero() -> Self;
    fn xor(self, rhs: Self) -> Self;
    fn and(self, rhs: Self) -> Self;
    fn shift_left(self, count: u32) -> Self;
    fn shift_right(self, count: u32) -> Self;
    /// `self ^ (row & broadcast(mask))`; `mask` is all-ones or all-zeros.
    fn xor_masked(self, row: Self, mask: u64) -> Self;
    fn from_limbs(limbs: &[u64; 4]) -> Self;
    fn to_limbs(self) -> [u64; 4];
}

// =============================================================================
// SERIALIZATION (shared by all backends)
// =============================================================================

/// Loads a byte string (MSB-first, byte-index-first) left-aligned into a word.
pub(crate) fn word_from_bytes<W: Word>(bytes: &[u8]) -> W {
    let mut limbs = [0u64; 4];
    let words = bytes.len().div_ceil(8);
    let mut data = bytes;
    for limb in limbs.iter_mut().take(words).rev() {
        let take = data.len().min(8);
        let mut chunk = [0u8; 8];
        chunk[..take].copy_from_slice(&data[..take]);
        *limb = u64::from_be_bytes(chunk);
        data = &data[take..];
    }
    W::from_limbs(&limbs)
}

/// Stores the top `out.len() * 8` bits of a word back into bytes.
pub(crate) fn word_to_bytes<W: Word>(w: W, out: &mut [u8]) {
    let limbs = w.to_limbs();
    let words = out.len().div_ceil(8);
    let mut offset = 0;
    for limb in limbs.iter().take(words).rev() {
        let take = (out.len() - offset).min(8);
        out[offset..offset + take].copy_from_slice(&limb.to_be_bytes()[..take]);
        offset += take;
    }
}

/// Reads `bits` bits from the stream, left-aligned into a word.
pub(crate) fn word_from_bitstream<W: Word>(bs: &mut BitstreamReader<'_>, bits: usize) -> W {
    let mut limbs = [0u64; 4];
    let mut f = bits.div_ceil(64);
    let mut remaining = bits;
    while remaining >= 64 {
        f -= 1;
        limbs[f] = bs.get_bits(64);
        remaining -= 64;
    }
    if remaining > 0 {
        f -= 1;
        limbs[f] = bs.get_bits(remaining) << (64 - remaining);
    }
    W::from_limbs(&limbs)
}

/// Writes the top `bits` bits of a word to the stream.
pub(crate) fn word_to_bitstream<W: Word>(bs: &mut BitstreamWriter<'_>, w: W, bits: usize) {
    let limbs = w.to_limbs();
    let mut f = bits.div_ceil(64);
    let mut remaining = bits;
    while remaining >= 64 {
        f -= 1;
        bs.put_bits(limbs[f], 64);
        remaining -= 64;
    }
    if remaining > 0 {
        f -= 1;
        bs.put_bits(limbs[f] >> (64 - remaining), remaining);
    }
}

// =============================================================================
// ENTRY-POINT INSTANTIATION
// =============================================================================

/// Stamps the nine per-instance entry points of a safe backend.
macro_rules! instantiate_backend {
    ($w192:ty, $w256:ty) => {
        /// `LowMC`-129-43 encryption.
        pub fn lowmc_129_43(key: &[u8], plaintext: &[u8], ciphertext: &mut [u8]) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_129_129_4);
            $crate::lowmc::encrypt::<$w192>(c, key, plaintext, ciphertext);
        }

        /// `LowMC`-192-64 encryption.
        pub fn lowmc_192_64(key: &[u8], plaintext: &[u8], ciphertext: &mut [u8]) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_192_192_4);
            $crate::lowmc::encrypt::<$w192>(c, key, plaintext, ciphertext);
        }

        /// `LowMC`-255-85 encryption.
        pub fn lowmc_255_85(key: &[u8], plaintext: &[u8], ciphertext: &mut [u8]) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_255_255_4);
            $crate::lowmc::encrypt::<$w256>(c, key, plaintext, ciphertext);
        }

        /// Auxiliary tape pass for `LowMC`-129-43.
        pub fn compute_aux_129_43(
            tapes: &mut $crate::tapes::RandomTapeSet,
            key_mask: &mut [u8],
        ) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_129_129_4);
            $crate::mpc::compute_aux::<$w192>(c, tapes, key_mask);
        }

        /// Auxiliary tape pass for `LowMC`-192-64.
        pub fn compute_aux_192_64(
            tapes: &mut $crate::tapes::RandomTapeSet,
            key_mask: &mut [u8],
        ) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_192_192_4);
            $crate::mpc::compute_aux::<$w192>(c, tapes, key_mask);
        }

        /// Auxiliary tape pass for `LowMC`-255-85.
        pub fn compute_aux_255_85(
            tapes: &mut $crate::tapes::RandomTapeSet,
            key_mask: &mut [u8],
        ) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_255_255_4);
            $crate::mpc::compute_aux::<$w256>(c, tapes, key_mask);
        }

        /// Online MPC simulation for `LowMC`-129-43.
        pub fn simulate_online_129_43(
            masked_key: &[u8],
            tapes: &mut $crate::tapes::RandomTapeSet,
            msgs: &mut $crate::tapes::MessageSet,
            plaintext: &[u8],
            public_output: &[u8],
        ) -> bool {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_129_129_4);
            $crate::mpc::simulate_online::<$w192>(c, masked_key, tapes, msgs, plaintext, public_output)
        }

        /// Online MPC simulation for `LowMC`-192-64.
        pub fn simulate_online_192_64(
            masked_key: &[u8],
            tapes: &mut $crate::tapes::RandomTapeSet,
            msgs: &mut $crate::tapes::MessageSet,
            plaintext: &[u8],
            public_output: &[u8],
        ) -> bool {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_192_192_4);
            $crate::mpc::simulate_online::<$w192>(c, masked_key, tapes, msgs, plaintext, public_output)
        }

        /// Online MPC simulation for `LowMC`-255-85.
        pub fn simulate_online_255_85(
            masked_key: &[u8],
            tapes: &mut $crate::tapes::RandomTapeSet,
            msgs: &mut $crate::tapes::MessageSet,
            plaintext: &[u8],
            public_output: &[u8],
        ) -> bool {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_255_255_4);
            $crate::mpc::simulate_online::<$w256>(c, masked_key, tapes, msgs, plaintext, public_output)
        }
    };
}

/// Stamps the entry points of a SIMD backend behind a target feature.
///
/// The functions are `unsafe`: the caller must have verified the feature via
/// CPU detection before binding them.
macro_rules! instantiate_simd_backend {
    ($feature:literal, $w192:ty, $w256:ty) => {
        /// `LowMC`-129-43 encryption.
        ///
        /// # Safety
        /// The executing CPU must support the backend's target feature.
        #[target_feature(enable = $feature)]
        pub unsafe fn lowmc_129_43(key: &[u8], plaintext: &[u8], ciphertext: &mut [u8]) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_129_129_4);
            $crate::lowmc::encrypt::<$w192>(c, key, plaintext, ciphertext);
        }

        /// `LowMC`-192-64 encryption.
        ///
        /// # Safety
        /// The executing CPU must support the backend's target feature.
        #[target_feature(enable = $feature)]
        pub unsafe fn lowmc_192_64(key: &[u8], plaintext: &[u8], ciphertext: &mut [u8]) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_192_192_4);
            $crate::lowmc::encrypt::<$w192>(c, key, plaintext, ciphertext);
        }

        /// `LowMC`-255-85 encryption.
        ///
        /// # Safety
        /// The executing CPU must support the backend's target feature.
        #[target_feature(enable = $feature)]
        pub unsafe fn lowmc_255_85(key: &[u8], plaintext: &[u8], ciphertext: &mut [u8]) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_255_255_4);
            $crate::lowmc::encrypt::<$w256>(c, key, plaintext, ciphertext);
        }

        /// Auxiliary tape pass for `LowMC`-129-43.
        ///
        /// # Safety
        /// The executing CPU must support the backend's target feature.
        #[target_feature(enable = $feature)]
        pub unsafe fn compute_aux_129_43(
            tapes: &mut $crate::tapes::RandomTapeSet,
            key_mask: &mut [u8],
        ) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_129_129_4);
            $crate::mpc::compute_aux::<$w192>(c, tapes, key_mask);
        }

        /// Auxiliary tape pass for `LowMC`-192-64.
        ///
        /// # Safety
        /// The executing CPU must support the backend's target feature.
        #[target_feature(enable = $feature)]
        pub unsafe fn compute_aux_192_64(
            tapes: &mut $crate::tapes::RandomTapeSet,
            key_mask: &mut [u8],
        ) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_192_192_4);
            $crate::mpc::compute_aux::<$w192>(c, tapes, key_mask);
        }

        /// Auxiliary tape pass for `LowMC`-255-85.
        ///
        /// # Safety
        /// The executing CPU must support the backend's target feature.
        #[target_feature(enable = $feature)]
        pub unsafe fn compute_aux_255_85(
            tapes: &mut $crate::tapes::RandomTapeSet,
            key_mask: &mut [u8],
        ) {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_255_255_4);
            $crate::mpc::compute_aux::<$w256>(c, tapes, key_mask);
        }

        /// Online MPC simulation for `LowMC`-129-43.
        ///
        /// # Safety
        /// The executing CPU must support the backend's target feature.
        #[target_feature(enable = $feature)]
        pub unsafe fn simulate_online_129_43(
            masked_key: &[u8],
            tapes: &mut $crate::tapes::RandomTapeSet,
            msgs: &mut $crate::tapes::MessageSet,
            plaintext: &[u8],
            public_output: &[u8],
        ) -> bool {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_129_129_4);
            $crate::mpc::simulate_online::<$w192>(c, masked_key, tapes, msgs, plaintext, public_output)
        }

        /// Online MPC simulation for `LowMC`-192-64.
        ///
        /// # Safety
        /// The executing CPU must support the backend's target feature.
        #[target_feature(enable = $feature)]
        pub unsafe fn simulate_online_192_64(
            masked_key: &[u8],
            tapes: &mut $crate::tapes::RandomTapeSet,
            msgs: &mut $crate::tapes::MessageSet,
            plaintext: &[u8],
            public_output: &[u8],
        ) -> bool {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_192_192_4);
            $crate::mpc::simulate_online::<$w192>(c, masked_key, tapes, msgs, plaintext, public_output)
        }

        /// Online MPC simulation for `LowMC`-255-85.
        ///
        /// # Safety
        /// The executing CPU must support the backend's target feature.
        #[target_feature(enable = $feature)]
        pub unsafe fn simulate_online_255_85(
            masked_key: &[u8],
            tapes: &mut $crate::tapes::RandomTapeSet,
            msgs: &mut $crate::tapes::MessageSet,
            plaintext: &[u8],
            public_output: &[u8],
        ) -> bool {
            let c = $crate::lowmc::constants::for_parameters(&$crate::lowmc::LOWMC_255_255_4);
            $crate::mpc::simulate_online::<$w256>(c, masked_key, tapes, msgs, plaintext, public_output)
        }
    };
}

pub(crate) use instantiate_backend;
#[cfg(target_arch = "x86_64")]
pub(crate) use instantiate_simd_backend;

// =============================================================================
// TESTS
// =============================================================================
