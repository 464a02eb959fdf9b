//! 16-party MPC simulation of the `LowMC` online phase.
//!
//! The simulator walks the masked state through every round, replacing the
//! S-box layer with the bitsliced multi-party protocol: each party's tape
//! supplies an input-mask word and an and-helper word, each opened party
//! broadcasts one n-bit message, and the hidden party's broadcast is taken
//! from the committed messages instead.

mod preprocessing;

pub(crate) use self::preprocessing::compute_aux;

use subtle::ConstantTimeEq;

use crate::kernels::{word_from_bitstream, word_from_bytes, word_to_bitstream, word_to_bytes, Word};
use crate::lowmc::constants::LowmcConstants;
use crate::lowmc::matrix_mul;
use crate::tapes::{MessageSet, RandomTapeSet, NUM_PARTIES};

// =============================================================================
// MPC S-BOX
// =============================================================================

/// One multi-party S-box layer.
///
/// Consumes 2n tape bits and n message bits per party slot (the shared
/// cursors advance once, after all sixteen iterations) and returns the
/// post-S-box masked state.
#[allow(clippy::many_single_char_names)]
fn mpc_sbox<W: Word>(
    state: W,
    consts: &LowmcConstants,
    tapes: &mut RandomTapeSet,
    msgs: &mut MessageSet,
) -> W {
    let n = consts.params.n;
    let bitmask_a = W::from_limbs(&consts.mask_a);
    let bitmask_b = W::from_limbs(&consts.mask_b);
    let bitmask_c = W::from_limbs(&consts.mask_c);

    let a = state.and(bitmask_a).shift_left(2);
    let b = state.and(bitmask_b).shift_left(1);
    let c = state.and(bitmask_c);

    let mut s_ab = W::zero();
    let mut s_bc = W::zero();
    let mut s_ca = W::zero();

    for i in 0..NUM_PARTIES {
        if Some(i) == msgs.unopened() {
            // Verification: take the hidden party's broadcast from the
            // committed messages. The slot rotation mirrors the composition
            // below: c-aligned bits carry s_ab, b-aligned s_bc, a-aligned
            // s_ca.
            let mut committed = msgs.reader(i);
            let tmp: W = word_from_bitstream(&mut committed, n);
            s_ab = s_ab.xor(tmp.and(bitmask_c));
            s_bc = s_bc.xor(tmp.and(bitmask_b).shift_left(1));
            s_ca = s_ca.xor(tmp.and(bitmask_a).shift_left(2));
            continue;
        }

        let mut party_tape = tapes.reader(i);
        let tmp: W = word_from_bitstream(&mut party_tape, n);
        let mask_a = tmp.and(bitmask_a).shift_left(2);
        let mask_b = tmp.and(bitmask_b).shift_left(1);
        let mask_c = tmp.and(bitmask_c);

        let tmp: W = word_from_bitstream(&mut party_tape, n);
        let and_helper_ab = tmp.and(bitmask_c);
        let and_helper_bc = tmp.and(bitmask_b).shift_left(1);
        let and_helper_ca = tmp.and(bitmask_a).shift_left(2);

        let sh_ab = a.and(mask_b).xor(b.and(mask_a)).xor(and_helper_ab);
        let sh_bc = b.and(mask_c).xor(c.and(mask_b)).xor(and_helper_bc);
        let sh_ca = c.and(mask_a).xor(a.and(mask_c)).xor(and_helper_ca);

        s_ab = s_ab.xor(sh_ab);
        s_bc = s_bc.xor(sh_bc);
        s_ca = s_ca.xor(sh_ca);

        let broadcast = sh_ab.xor(sh_bc.shift_right(1)).xor(sh_ca.shift_right(2));
        let mut party_msgs = msgs.writer(i);
        word_to_bitstream(&mut party_msgs, broadcast, n);
    }

    tapes.advance(2 * n);
    msgs.advance(n);

    let t0 = b.and(c).xor(s_bc).xor(a);
    let t1 = c.and(a).xor(s_ca).xor(a).xor(b);
    let t2 = a.and(b).xor(s_ab).xor(a).xor(b).xor(c);

    // The triples cover the whole state, so the recombination replaces it.
    t2.xor(t1.shift_right(1)).xor(t0.shift_right(2))
}

// =============================================================================
// ONLINE ROUND DRIVER
// =============================================================================

/// Simulates the online phase on the masked key and compares the final state
/// with the public output in constant time.
///
/// Returns `false` on an output mismatch; inconsistent tapes or tampered
/// committed broadcasts surface the same way, never as an error.
pub(crate) fn simulate_online<W: Word>(
    consts: &LowmcConstants,
    masked_key: &[u8],
    tapes: &mut RandomTapeSet,
    msgs: &mut MessageSet,
    plaintext: &[u8],
    public_output: &[u8],
) -> bool {
    let params = consts.params;
    assert_eq!(masked_key.len(), params.key_bytes(), "masked key length");
    assert_eq!(plaintext.len(), params.block_bytes(), "plaintext length");
    assert_eq!(public_output.len(), params.block_bytes(), "output length");

    let key: W = word_from_bytes(masked_key);
    let mut state: W = matrix_mul(key, &consts.k0_matrix).xor(word_from_bytes(plaintext));

    for round in &consts.rounds {
        state = mpc_sbox(state, consts, tapes, msgs);
        state = matrix_mul(state, &round.l_matrix)
            .xor(W::from_limbs(&round.constant))
            .xor(matrix_mul(key, &round.k_matrix));
    }

    let mut output = [0u8; 32];
    let output = &mut output[..params.block_bytes()];
    word_to_bytes(state, output);
    output.ct_eq(public_output).into()
}
