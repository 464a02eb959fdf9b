//! Auxiliary tape pass.
//!
//! Before the online simulation, the sixteen random tapes are not yet a
//! consistent preprocessing: the XOR over all parties of each and-helper
//! word must equal the mask products the S-box protocol expects. This pass
//! derives the shared key mask, propagates the per-round wire masks through
//! the inverse linear layers, and rewrites the last party's helper words so
//! the parity comes out right. The final round's output mask is forced to
//! zero, which is what lets the verifier compare the simulated output with
//! the public ciphertext directly.

use crate::bitstream::{BitstreamReader, BitstreamWriter};
use crate::kernels::{word_from_bitstream, word_to_bitstream, word_to_bytes, Word};
use crate::lowmc::constants::LowmcConstants;
use crate::lowmc::matrix_mul;
use crate::tapes::{RandomTapeSet, NUM_PARTIES};

/// XOR-parity of the sixteen tapes over the first `len` bytes.
fn parity_tape(tapes: &RandomTapeSet, len: usize) -> Vec<u8> {
    let mut parity = vec![0u8; len];
    for i in 0..NUM_PARTIES {
        let tape = tapes.party(i);
        assert!(tape.len() >= len, "party {i} tape shorter than one execution");
        for (p, t) in parity.iter_mut().zip(tape.iter()) {
            *p ^= *t;
        }
    }
    parity
}

/// Fixes the last party's and-helper words and writes the derived key mask
/// (the caller XORs it into the secret key to form the masked key).
pub(crate) fn compute_aux<W: Word>(
    consts: &LowmcConstants,
    tapes: &mut RandomTapeSet,
    key_mask: &mut [u8],
) {
    let params = consts.params;
    let (n, r) = (params.n, params.r);
    assert_eq!(key_mask.len(), params.key_bytes(), "key mask length");

    let mut parity = parity_tape(tapes, (2 * n * r).div_ceil(8));

    let mask_a = W::from_limbs(&consts.mask_a);
    let mask_b = W::from_limbs(&consts.mask_b);
    let mask_c = W::from_limbs(&consts.mask_c);

    // The first tape word is the round-0 S-box input mask; the key mask is
    // its preimage under the whitening-key matrix.
    let first: W = word_from_bitstream(&mut BitstreamReader::new(&parity, 0), n);
    let lambda_key = matrix_mul(first, &consts.ki0_matrix);

    for round in 0..r {
        let offset = 2 * n * round;
        let lambda_in: W =
            word_from_bitstream(&mut BitstreamReader::new(&parity, offset), n);
        let lambda_next: W = if round + 1 < r {
            word_from_bitstream(&mut BitstreamReader::new(&parity, offset + 2 * n), n)
        } else {
            W::zero()
        };
        // Output-wire masks: the next round's input mask (zero after the
        // last round), minus the round-key mask, pulled back through the
        // inverse linear layer.
        let lambda_out = matrix_mul(
            lambda_next.xor(matrix_mul(lambda_key, &consts.rounds[round].k_matrix)),
            &consts.rounds[round].li_matrix,
        );

        let am = lambda_in.and(mask_a).shift_left(2);
        let bm = lambda_in.and(mask_b).shift_left(1);
        let cm = lambda_in.and(mask_c);
        let d = lambda_out.and(mask_a).shift_left(2);
        let e = lambda_out.and(mask_b).shift_left(1);
        let f = lambda_out.and(mask_c);

        // Helper parities required by the three shared products, aligned at
        // the c slot, then packed with the same rotation the broadcasts use.
        let h_ab = am.and(bm).xor(am).xor(bm).xor(cm).xor(f);
        let h_bc = bm.and(cm).xor(am).xor(d);
        let h_ca = cm.and(am).xor(am).xor(bm).xor(e);
        let required = h_ab.xor(h_bc.shift_right(1)).xor(h_ca.shift_right(2));

        let current: W =
            word_from_bitstream(&mut BitstreamReader::new(&parity, offset + n), n);
        let delta = required.xor(current);

        let last = NUM_PARTIES - 1;
        let helper: W =
            word_from_bitstream(&mut tapes.reader_at(last, offset + n), n);
        let mut writer = tapes.writer_at(last, offset + n);
        word_to_bitstream(&mut writer, helper.xor(delta), n);

        // keep the parity view in step for the remaining rounds
        let mut parity_writer = BitstreamWriter::new(&mut parity, offset + n);
        word_to_bitstream(&mut parity_writer, required, n);
    }

    word_to_bytes(lambda_key, key_mask);
}
