//! Generated `LowMC` constants: matrices, round constants and S-box masks.
//!
//! The reference implementation ships these as pregenerated headers; here
//! they are regenerated from the canonical instance stream on first use and
//! cached for the lifetime of the process. The generated material is pinned
//! by the cipher test vectors, so any drift in the generator is caught
//! immediately.

use std::sync::OnceLock;

use super::grain::InstanceStream;
use super::{LowmcParameters, LOWMC_129_129_4, LOWMC_192_192_4, LOWMC_255_255_4};

// =============================================================================
// ROW MATRICES (generation-time representation)
// =============================================================================

/// One matrix row, column `j` at bit `j` of the limb array.
type Row = [u64; 4];

fn row_bit(row: &Row, j: usize) -> u64 {
    (row[j / 64] >> (j % 64)) & 1
}

fn set_row_bit(row: &mut Row, j: usize) {
    row[j / 64] |= 1 << (j % 64);
}

fn xor_rows(dst: &mut Row, src: &Row) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= *s;
    }
}

fn random_row(stream: &mut InstanceStream, width: usize) -> Row {
    let mut row = [0u64; 4];
    for j in 0..width {
        row[j / 64] |= stream.bit() << (j % 64);
    }
    row
}

/// Rank of a GF(2) matrix, by elimination on a scratch copy.
fn rank(matrix: &[Row], cols: usize) -> usize {
    let mut rows = matrix.to_vec();
    let mut r = 0;
    for col in 0..cols {
        let Some(pivot) = (r..rows.len()).find(|&i| row_bit(&rows[i], col) == 1) else {
            continue;
        };
        rows.swap(r, pivot);
        let pivot_row = rows[r];
        for (i, row) in rows.iter_mut().enumerate() {
            if i != r && row_bit(row, col) == 1 {
                xor_rows(row, &pivot_row);
            }
        }
        r += 1;
        if r == rows.len() {
            break;
        }
    }
    r
}

/// Inverse of an invertible square matrix, by Gauss-Jordan elimination.
fn invert(matrix: &[Row], n: usize) -> Vec<Row> {
    let mut rows = matrix.to_vec();
    let mut inv: Vec<Row> = (0..n)
        .map(|i| {
            let mut row = [0u64; 4];
            set_row_bit(&mut row, i);
            row
        })
        .collect();
    let mut r = 0;
    for col in 0..n {
        let pivot = (r..n)
            .find(|&i| row_bit(&rows[i], col) == 1)
            .unwrap_or_else(|| panic!("matrix is singular"));
        rows.swap(r, pivot);
        inv.swap(r, pivot);
        let pivot_row = rows[r];
        let pivot_inv = inv[r];
        for i in 0..n {
            if i != r && row_bit(&rows[i], col) == 1 {
                xor_rows(&mut rows[i], &pivot_row);
                xor_rows(&mut inv[i], &pivot_inv);
            }
        }
        r += 1;
    }
    inv
}

/// Draws matrices until one has full rank, as the instance generation
/// prescribes. Roughly every fourth square draw succeeds.
fn random_matrix(stream: &mut InstanceStream, rows: usize, cols: usize) -> Vec<Row> {
    loop {
        let m: Vec<Row> = (0..rows).map(|_| random_row(stream, cols)).collect();
        if rank(&m, cols) == rows.min(cols) {
            return m;
        }
    }
}

// =============================================================================
// ALIGNED REPRESENTATION
// =============================================================================

/// Container width for a state of `n` bits.
pub(crate) const fn container_bits(n: usize) -> usize {
    if n <= 192 {
        192
    } else {
        256
    }
}

/// Converts bit `i` of the logical string into its aligned limb position
/// (`w - 1 - i`, counting from the least significant container bit).
fn aligned(value: &Row, n: usize, w: usize) -> [u64; 4] {
    let mut out = [0u64; 4];
    for i in 0..n {
        if row_bit(value, i) == 1 {
            let bit = w - 1 - i;
            out[bit / 64] |= 1 << (bit % 64);
        }
    }
    out
}

/// Transposed multiplication table: one XOR row per container bit of the
/// input vector. Rows for padding bits stay zero, so multiplying never
/// depends on them.
pub(crate) struct MatrixTable {
    rows: Vec<[u64; 4]>,
}

impl MatrixTable {
    fn transpose(matrix: &[Row], n_in: usize, w: usize) -> Self {
        let rows = (0..w)
            .map(|p| {
                let i = w - 1 - p;
                if i >= n_in {
                    return [0u64; 4];
                }
                let mut col = [0u64; 4];
                for (out_bit, row) in matrix.iter().enumerate() {
                    if row_bit(row, i) == 1 {
                        set_row_bit(&mut col, out_bit);
                    }
                }
                aligned(&col, matrix.len(), w)
            })
            .collect();
        Self { rows }
    }

    pub(crate) fn row(&self, p: usize) -> &[u64; 4] {
        &self.rows[p]
    }
}

/// The three S-box bit masks. Each round partitions the state into `m`
/// aligned triples; within a triple the third input sits two bit positions
/// above the first.
const fn sbox_mask(n: usize, offset: usize) -> [u64; 4] {
    let w = container_bits(n);
    let m = n / 3;
    let mut out = [0u64; 4];
    let mut j = 0;
    while j < m {
        let bit = w - 1 - 3 * j - offset;
        out[bit / 64] |= 1 << (bit % 64);
        j += 1;
    }
    out
}

// =============================================================================
// INSTANCE CONSTANTS
// =============================================================================

/// Per-round matrices and constants.
pub(crate) struct RoundConstants {
    /// Linear layer.
    pub l_matrix: MatrixTable,
    /// Inverse linear layer (mask propagation in the auxiliary pass).
    pub li_matrix: MatrixTable,
    /// Round-key matrix.
    pub k_matrix: MatrixTable,
    /// Round constant, aligned.
    pub constant: [u64; 4],
}

/// Everything the cipher and the MPC simulation need for one parameter set.
pub(crate) struct LowmcConstants {
    pub params: &'static LowmcParameters,
    pub mask_a: [u64; 4],
    pub mask_b: [u64; 4],
    pub mask_c: [u64; 4],
    /// Whitening-key matrix.
    pub k0_matrix: MatrixTable,
    /// Inverse whitening-key matrix (key-mask recovery).
    pub ki0_matrix: MatrixTable,
    pub rounds: Vec<RoundConstants>,
}

fn generate(params: &'static LowmcParameters) -> LowmcConstants {
    let (n, k, r) = (params.n, params.k, params.r);
    let w = container_bits(n);
    let mut stream = InstanceStream::new();

    // Generation order is fixed: linear matrices, round constants, key
    // matrices. Consuming the stream out of order would desynchronize every
    // later draw.
    let lin: Vec<Vec<Row>> = (0..r).map(|_| random_matrix(&mut stream, n, n)).collect();
    let constants: Vec<Row> = (0..r).map(|_| random_row(&mut stream, n)).collect();
    let kmat: Vec<Vec<Row>> = (0..=r).map(|_| random_matrix(&mut stream, n, k)).collect();

    let k0_matrix = MatrixTable::transpose(&kmat[0], k, w);
    let ki0_matrix = MatrixTable::transpose(&invert(&kmat[0], n), n, w);

    let rounds = (0..r)
        .map(|i| RoundConstants {
            l_matrix: MatrixTable::transpose(&lin[i], n, w),
            li_matrix: MatrixTable::transpose(&invert(&lin[i], n), n, w),
            k_matrix: MatrixTable::transpose(&kmat[i + 1], k, w),
            constant: aligned(&constants[i], n, w),
        })
        .collect();

    LowmcConstants {
        params,
        mask_a: sbox_mask(n, 2),
        mask_b: sbox_mask(n, 1),
        mask_c: sbox_mask(n, 0),
        k0_matrix,
        ki0_matrix,
        rounds,
    }
}

/// Constants for a supported parameter set, generated on first use.
///
/// # Panics
/// Panics on a parameter tuple outside the supported full-S-box instances;
/// reaching that state is a programming error in the caller.
pub(crate) fn for_parameters(params: &LowmcParameters) -> &'static LowmcConstants {
    static L129: OnceLock<LowmcConstants> = OnceLock::new();
    static L192: OnceLock<LowmcConstants> = OnceLock::new();
    static L255: OnceLock<LowmcConstants> = OnceLock::new();

    match (params.n, params.k, params.r, params.m) {
        (129, 129, 4, 43) => L129.get_or_init(|| generate(&LOWMC_129_129_4)),
        (192, 192, 4, 64) => L192.get_or_init(|| generate(&LOWMC_192_192_4)),
        (255, 255, 4, 85) => L255.get_or_init(|| generate(&LOWMC_255_255_4)),
        _ => panic!("unsupported LowMC parameters"),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_129_match_reference_constants() {
        let a = sbox_mask(129, 2);
        let b = sbox_mask(129, 1);
        let c = sbox_mask(129, 0);
        assert_eq!(a[..3], [0x8000_0000_0000_0000, 0x4924_9249_2492_4924, 0x2492_4924_9249_2492]);
        assert_eq!(b[..3], [0x0000_0000_0000_0000, 0x9249_2492_4924_9249, 0x4924_9249_2492_4924]);
        assert_eq!(c[..3], [0x0000_0000_0000_0000, 0x2492_4924_9249_2492, 0x9249_2492_4924_9249]);
    }

    #[test]
    fn masks_partition_the_sbox_bits() {
        for &(n, m) in &[(129usize, 43usize), (192, 64), (255, 85)] {
            let w = container_bits(n);
            let a = sbox_mask(n, 2);
            let b = sbox_mask(n, 1);
            let c = sbox_mask(n, 0);
            let mut union = [0u64; 4];
            for i in 0..4 {
                assert_eq!(a[i] & b[i], 0);
                assert_eq!(b[i] & c[i], 0);
                assert_eq!(a[i] & c[i], 0);
                union[i] = a[i] | b[i] | c[i];
            }
            let covered: u32 = union.iter().map(|l| l.count_ones()).sum();
            assert_eq!(covered as usize, 3 * m);
            // the triples occupy the top 3m container bits
            for p in 0..w {
                let bit = (union[p / 64] >> (p % 64)) & 1;
                let expected = u64::from(p >= w - 3 * m);
                assert_eq!(bit, expected, "n={n} bit {p}");
            }
        }
    }

    #[test]
    fn invert_round_trips() {
        // A * A^-1 = I over a handful of generated square matrices
        let mut stream = InstanceStream::new();
        let n = 96;
        let m = random_matrix(&mut stream, n, n);
        let inv = invert(&m, n);
        for i in 0..n {
            for j in 0..n {
                let mut acc = 0;
                for t in 0..n {
                    acc ^= row_bit(&m[i], t) & row_bit(&inv[t], j);
                }
                assert_eq!(acc, u64::from(i == j), "({i},{j})");
            }
        }
    }

    #[test]
    fn rank_detects_dependence() {
        let mut rows = vec![[0u64; 4]; 3];
        set_row_bit(&mut rows[0], 0);
        set_row_bit(&mut rows[1], 1);
        rows[2] = rows[0];
        let (left, right) = rows.split_at_mut(2);
        xor_rows(&mut right[0], &left[1]);
        assert_eq!(rank(&rows, 8), 2);
    }
}
