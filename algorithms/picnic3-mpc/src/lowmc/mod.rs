//! Bit-sliced `LowMC` block-cipher primitives.
//!
//! The state is kept left-aligned in a 192- or 256-bit container word; the
//! full S-box layer is evaluated bitsliced through the three triple masks,
//! and the linear algebra runs over transposed multiplication tables.

pub(crate) mod constants;
pub(crate) mod grain;

use self::constants::{LowmcConstants, MatrixTable};
use crate::kernels::{word_from_bytes, word_to_bytes, Word};
use static_assertions::const_assert;

/// `LowMC` parameter tuple: state bits, key bits, rounds, S-boxes per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowmcParameters {
    /// State (block) size in bits.
    pub n: usize,
    /// Key size in bits.
    pub k: usize,
    /// Number of rounds.
    pub r: usize,
    /// Number of S-boxes per round.
    pub m: usize,
}

impl LowmcParameters {
    /// Byte length of a serialized state block.
    #[must_use]
    pub const fn block_bytes(&self) -> usize {
        self.n.div_ceil(8)
    }

    /// Byte length of a serialized key.
    #[must_use]
    pub const fn key_bytes(&self) -> usize {
        self.k.div_ceil(8)
    }
}

/// Full-S-box instance backing `Picnic3` L1.
pub(crate) const LOWMC_129_129_4: LowmcParameters = LowmcParameters {
    n: 129,
    k: 129,
    r: 4,
    m: 43,
};

/// Full-S-box instance backing `Picnic3` L3.
pub(crate) const LOWMC_192_192_4: LowmcParameters = LowmcParameters {
    n: 192,
    k: 192,
    r: 4,
    m: 64,
};

/// Full-S-box instance backing `Picnic3` L5.
pub(crate) const LOWMC_255_255_4: LowmcParameters = LowmcParameters {
    n: 255,
    k: 255,
    r: 4,
    m: 85,
};

// The S-box layer must cover the whole state for the bitsliced recombination
// to be a plain replacement.
const_assert!(LOWMC_129_129_4.n == 3 * LOWMC_129_129_4.m);
const_assert!(LOWMC_192_192_4.n == 3 * LOWMC_192_192_4.m);
const_assert!(LOWMC_255_255_4.n == 3 * LOWMC_255_255_4.m);

// =============================================================================
// LINEAR ALGEBRA
// =============================================================================

/// `matrix * v` via the transposed table: XOR the row of every set input bit,
/// selected branchlessly through a broadcast mask.
pub(crate) fn matrix_mul<W: Word>(v: W, matrix: &MatrixTable) -> W {
    let limbs = v.to_limbs();
    let mut acc = W::zero();
    let mut p = 0;
    for limb in limbs.iter().take(W::BITS / 64) {
        let mut idx = *limb;
        for _ in 0..64 {
            let mask = 0u64.wrapping_sub(idx & 1);
            acc = acc.xor_masked(W::from_limbs(matrix.row(p)), mask);
            idx >>= 1;
            p += 1;
        }
    }
    acc
}

// =============================================================================
// S-BOX LAYER
// =============================================================================

/// Bitsliced S-box over the whole state: aligns the three triple slots,
/// evaluates the quadratic forms, and recombines them into their positions.
pub(crate) fn sbox_layer<W: Word>(state: W, consts: &LowmcConstants) -> W {
    let mask_a = W::from_limbs(&consts.mask_a);
    let mask_b = W::from_limbs(&consts.mask_b);
    let mask_c = W::from_limbs(&consts.mask_c);

    let a = state.and(mask_a).shift_left(2);
    let b = state.and(mask_b).shift_left(1);
    let c = state.and(mask_c);

    let t2 = a.and(b).xor(a).xor(b).xor(c);
    let t1 = c.and(a).xor(a).xor(b);
    let t0 = b.and(c).xor(a);

    t2.xor(t1.shift_right(1)).xor(t0.shift_right(2))
}

// =============================================================================
// ENCRYPTION
// =============================================================================

/// Forward `LowMC` encryption.
///
/// `key`, `plaintext` and `ciphertext` are byte strings of the instance's
/// key/block length, MSB-first with zero padding bits.
pub(crate) fn encrypt<W: Word>(
    c: &LowmcConstants,
    key: &[u8],
    plaintext: &[u8],
    ciphertext: &mut [u8],
) {
    assert_eq!(key.len(), c.params.key_bytes(), "key length");
    assert_eq!(plaintext.len(), c.params.block_bytes(), "plaintext length");
    assert_eq!(ciphertext.len(), c.params.block_bytes(), "ciphertext length");

    let key: W = word_from_bytes(key);
    let mut state: W = matrix_mul(key, &c.k0_matrix).xor(word_from_bytes(plaintext));
    for round in &c.rounds {
        state = sbox_layer(state, c);
        state = matrix_mul(state, &round.l_matrix)
            .xor(W::from_limbs(&round.constant))
            .xor(matrix_mul(key, &round.k_matrix));
    }
    word_to_bytes(state, ciphertext);
}
