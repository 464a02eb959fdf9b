//! Cross-Backend Consistency Tests
//!
//! Verifies that the SSE2, AVX2 and portable backends produce IDENTICAL
//! results: output states, broadcast buffers and derived key masks. CPU
//! feature detection must never alter the cryptographic output.

#![allow(clippy::unwrap_used)]
#![allow(unsafe_code)]

use picnic3_mpc::kernels::portable;
use picnic3_mpc::{instance_get, Instance, MessageSet, ParameterSet, RandomTapeSet};

const KKW_SETS: [ParameterSet; 3] = [
    ParameterSet::Picnic3L1,
    ParameterSet::Picnic3L3,
    ParameterSet::Picnic3L5,
];

// Simple pseudo-random generator to keep inputs reproducible without
// touching a real RNG.
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        self.0
    }

    fn fill(&mut self, buf: &mut [u8]) {
        for b in buf {
            *b = (self.next_u64() >> 56) as u8;
        }
    }
}

fn random_block(inst: &Instance, rng: &mut Lcg) -> Vec<u8> {
    // clear the padding bits of the final byte so the block is a valid state
    let mut block = vec![0u8; inst.output_size];
    rng.fill(&mut block);
    let spare = inst.output_size * 8 - inst.lowmc.n;
    block[inst.output_size - 1] &= 0xFF << spare;
    block
}

type Backend = (
    fn(&[u8], &[u8], &mut [u8]),
    fn(&mut RandomTapeSet, &mut [u8]),
    fn(&[u8], &mut RandomTapeSet, &mut MessageSet, &[u8], &[u8]) -> bool,
);

fn portable_backend(params: ParameterSet) -> Backend {
    match params {
        ParameterSet::Picnic3L1 => (
            portable::lowmc_129_43,
            portable::compute_aux_129_43,
            portable::simulate_online_129_43,
        ),
        ParameterSet::Picnic3L3 => (
            portable::lowmc_192_64,
            portable::compute_aux_192_64,
            portable::simulate_online_192_64,
        ),
        _ => (
            portable::lowmc_255_85,
            portable::compute_aux_255_85,
            portable::simulate_online_255_85,
        ),
    }
}

/// Runs one full aux + sign flow and returns everything observable.
fn run_flow(
    inst: &Instance,
    (lowmc, aux, simulate): Backend,
    tapes_seed: &RandomTapeSet,
    key: &[u8],
    plaintext: &[u8],
) -> (Vec<u8>, Vec<u8>, Vec<Vec<u8>>, bool) {
    let mut ciphertext = vec![0u8; inst.output_size];
    lowmc(key, plaintext, &mut ciphertext);

    let mut tapes =
        RandomTapeSet::new(std::array::from_fn(|i| tapes_seed.party(i).to_vec()));
    let mut key_mask = vec![0u8; inst.input_size];
    aux(&mut tapes, &mut key_mask);

    let masked_key: Vec<u8> = key
        .iter()
        .zip(key_mask.iter())
        .map(|(k, m)| k ^ m)
        .collect();
    let mut msgs = MessageSet::zeroed(inst.view_size);
    let matches = simulate(&masked_key, &mut tapes, &mut msgs, plaintext, &ciphertext);

    let broadcasts = (0..picnic3_mpc::NUM_PARTIES)
        .map(|i| msgs.party(i).to_vec())
        .collect();
    (ciphertext, key_mask, broadcasts, matches)
}

fn assert_backends_agree(params: ParameterSet, other: Backend, name: &str) {
    let inst = instance_get(params).unwrap();
    let mut rng = Lcg(0xDEAD_BEEF_CAFE_BABE);

    for case in 0..4 {
        let key = random_block(inst, &mut rng);
        let plaintext = random_block(inst, &mut rng);
        let tapes = RandomTapeSet::new(std::array::from_fn(|_| {
            let mut t = vec![0u8; inst.tape_size];
            rng.fill(&mut t);
            t
        }));

        let reference = run_flow(inst, portable_backend(params), &tapes, &key, &plaintext);
        let candidate = run_flow(inst, other, &tapes, &key, &plaintext);

        assert_eq!(reference.0, candidate.0, "{name} {params:?} ciphertext, case {case}");
        assert_eq!(reference.1, candidate.1, "{name} {params:?} key mask, case {case}");
        assert_eq!(reference.2, candidate.2, "{name} {params:?} broadcasts, case {case}");
        assert!(reference.3 && candidate.3, "{name} {params:?} simulate, case {case}");
    }
}

// =============================================================================
// DISPATCHED vs PORTABLE
// =============================================================================

#[test]
fn dispatched_matches_portable() {
    for params in KKW_SETS {
        let inst = instance_get(params).unwrap();
        let dispatched: Backend = (
            inst.impls.lowmc,
            inst.impls.lowmc_aux,
            inst.impls.lowmc_simulate_online,
        );
        assert_backends_agree(params, dispatched, "dispatched");
    }
}

// =============================================================================
// SSE2 vs PORTABLE
// =============================================================================

#[cfg(target_arch = "x86_64")]
#[test]
fn sse2_matches_portable() {
    use picnic3_mpc::kernels::s128;
    if !is_x86_feature_detected!("sse2") {
        return;
    }
    // SAFETY (for the whole table): feature checked above.
    let backends: [(ParameterSet, Backend); 3] = [
        (
            ParameterSet::Picnic3L1,
            (
                |k: &[u8], p: &[u8], c: &mut [u8]| unsafe { s128::lowmc_129_43(k, p, c) },
                |t: &mut RandomTapeSet, m: &mut [u8]| unsafe { s128::compute_aux_129_43(t, m) },
                |k: &[u8], t: &mut RandomTapeSet, m: &mut MessageSet, p: &[u8], o: &[u8]| unsafe {
                    s128::simulate_online_129_43(k, t, m, p, o)
                },
            ),
        ),
        (
            ParameterSet::Picnic3L3,
            (
                |k: &[u8], p: &[u8], c: &mut [u8]| unsafe { s128::lowmc_192_64(k, p, c) },
                |t: &mut RandomTapeSet, m: &mut [u8]| unsafe { s128::compute_aux_192_64(t, m) },
                |k: &[u8], t: &mut RandomTapeSet, m: &mut MessageSet, p: &[u8], o: &[u8]| unsafe {
                    s128::simulate_online_192_64(k, t, m, p, o)
                },
            ),
        ),
        (
            ParameterSet::Picnic3L5,
            (
                |k: &[u8], p: &[u8], c: &mut [u8]| unsafe { s128::lowmc_255_85(k, p, c) },
                |t: &mut RandomTapeSet, m: &mut [u8]| unsafe { s128::compute_aux_255_85(t, m) },
                |k: &[u8], t: &mut RandomTapeSet, m: &mut MessageSet, p: &[u8], o: &[u8]| unsafe {
                    s128::simulate_online_255_85(k, t, m, p, o)
                },
            ),
        ),
    ];
    for (params, backend) in backends {
        assert_backends_agree(params, backend, "sse2");
    }
}

// =============================================================================
// AVX2 vs PORTABLE
// =============================================================================

#[cfg(target_arch = "x86_64")]
#[test]
fn avx2_matches_portable() {
    use picnic3_mpc::kernels::s256;
    if !is_x86_feature_detected!("avx2") {
        println!("Skipping: AVX2 not supported.");
        return;
    }
    // SAFETY (for the whole table): feature checked above.
    let backends: [(ParameterSet, Backend); 3] = [
        (
            ParameterSet::Picnic3L1,
            (
                |k: &[u8], p: &[u8], c: &mut [u8]| unsafe { s256::lowmc_129_43(k, p, c) },
                |t: &mut RandomTapeSet, m: &mut [u8]| unsafe { s256::compute_aux_129_43(t, m) },
                |k: &[u8], t: &mut RandomTapeSet, m: &mut MessageSet, p: &[u8], o: &[u8]| unsafe {
                    s256::simulate_online_129_43(k, t, m, p, o)
                },
            ),
        ),
        (
            ParameterSet::Picnic3L3,
            (
                |k: &[u8], p: &[u8], c: &mut [u8]| unsafe { s256::lowmc_192_64(k, p, c) },
                |t: &mut RandomTapeSet, m: &mut [u8]| unsafe { s256::compute_aux_192_64(t, m) },
                |k: &[u8], t: &mut RandomTapeSet, m: &mut MessageSet, p: &[u8], o: &[u8]| unsafe {
                    s256::simulate_online_192_64(k, t, m, p, o)
                },
            ),
        ),
        (
            ParameterSet::Picnic3L5,
            (
                |k: &[u8], p: &[u8], c: &mut [u8]| unsafe { s256::lowmc_255_85(k, p, c) },
                |t: &mut RandomTapeSet, m: &mut [u8]| unsafe { s256::compute_aux_255_85(t, m) },
                |k: &[u8], t: &mut RandomTapeSet, m: &mut MessageSet, p: &[u8], o: &[u8]| unsafe {
                    s256::simulate_online_255_85(k, t, m, p, o)
                },
            ),
        ),
    ];
    for (params, backend) in backends {
        assert_backends_agree(params, backend, "avx2");
    }
}
