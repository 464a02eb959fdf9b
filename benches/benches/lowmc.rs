//! `LowMC` Encryption Benchmark
//!
//! Measures the plain cipher per parameter set, dispatched vs explicit
//! backends. Quantifies what the SIMD matrix multiply buys.

#![allow(missing_docs)]
#![allow(unsafe_code)]
#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use picnic3_mpc::kernels::portable;
use picnic3_mpc::{instance_get, ParameterSet};
use std::hint::black_box;

fn bench_lowmc(c: &mut Criterion) {
    let mut group = c.benchmark_group("LowMC Encrypt");

    let sets = [
        (ParameterSet::Picnic3L1, "L1"),
        (ParameterSet::Picnic3L3, "L3"),
        (ParameterSet::Picnic3L5, "L5"),
    ];

    for (params, label) in sets {
        let inst = instance_get(params).unwrap();
        let key = {
            let mut k = vec![0u8; inst.input_size];
            k[0] = 0x80;
            k
        };
        let mut plaintext = vec![0u8; inst.output_size];
        plaintext[0] = 0xAB;
        plaintext[1] = 0xFF;
        let mut ciphertext = vec![0u8; inst.output_size];

        // 1. Dispatched (production path)
        group.bench_function(format!("Dispatched - {label}"), |b| {
            b.iter(|| {
                (inst.impls.lowmc)(black_box(&key), black_box(&plaintext), &mut ciphertext);
            });
        });

        // 2. Portable baseline
        group.bench_function(format!("Portable - {label}"), |b| {
            b.iter(|| match params {
                ParameterSet::Picnic3L1 => {
                    portable::lowmc_129_43(black_box(&key), black_box(&plaintext), &mut ciphertext);
                }
                ParameterSet::Picnic3L3 => {
                    portable::lowmc_192_64(black_box(&key), black_box(&plaintext), &mut ciphertext);
                }
                _ => {
                    portable::lowmc_255_85(black_box(&key), black_box(&plaintext), &mut ciphertext);
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lowmc);
criterion_main!(benches);
