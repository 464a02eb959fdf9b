//! Online Simulation Benchmark
//!
//! Measures one full prover-side flow per parameter set: auxiliary tape
//! pass plus the 16-party online simulation. This is the inner loop of a
//! `Picnic3` signature (run `num_rounds` times per signature).

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use picnic3_mpc::{instance_get, MessageSet, ParameterSet, RandomTapeSet};
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("MPC Simulate");

    let sets = [
        (ParameterSet::Picnic3L1, "L1"),
        (ParameterSet::Picnic3L3, "L3"),
        (ParameterSet::Picnic3L5, "L5"),
    ];

    for (params, label) in sets {
        let inst = instance_get(params).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xB1A5);

        let mut key = vec![0u8; inst.input_size];
        key[0] = 0x80;
        let mut plaintext = vec![0u8; inst.output_size];
        plaintext[0] = 0xAB;
        plaintext[1] = 0xFF;
        let mut ciphertext = vec![0u8; inst.output_size];
        (inst.impls.lowmc)(&key, &plaintext, &mut ciphertext);

        let tape_material: [Vec<u8>; picnic3_mpc::NUM_PARTIES] = std::array::from_fn(|_| {
            let mut t = vec![0u8; inst.tape_size];
            rng.fill_bytes(&mut t);
            t
        });

        group.bench_function(format!("Aux + Online - {label}"), |b| {
            b.iter(|| {
                let mut tapes =
                    RandomTapeSet::new(std::array::from_fn(|i| tape_material[i].clone()));
                let mut key_mask = vec![0u8; inst.input_size];
                (inst.impls.lowmc_aux)(&mut tapes, &mut key_mask);
                let masked_key: Vec<u8> = key
                    .iter()
                    .zip(key_mask.iter())
                    .map(|(k, m)| k ^ m)
                    .collect();
                let mut msgs = MessageSet::zeroed(inst.view_size);
                (inst.impls.lowmc_simulate_online)(
                    black_box(&masked_key),
                    &mut tapes,
                    &mut msgs,
                    black_box(&plaintext),
                    black_box(&ciphertext),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simulate);
criterion_main!(benches);
