//! 256-bit SIMD backend (AVX2).
//!
//! Holds the whole container in a single `__m256i`; shift carries cross the
//! 64-bit lanes through a permute-and-blend sequence.

#![allow(unsafe_code)]

use core::arch::x86_64::{
    __m256i, _mm256_and_si256, _mm256_blend_epi32, _mm256_loadu_si256, _mm256_or_si256,
    _mm256_permute4x64_epi64, _mm256_set1_epi64x, _mm256_setzero_si256, _mm256_slli_epi64,
    _mm256_srli_epi64, _mm256_storeu_si256, _mm256_xor_si256,
};

use super::Word;

/// Packed GF(2) vector in one 256-bit lane.
#[derive(Clone, Copy)]
pub(crate) struct S256<const B: usize>(__m256i);

// _MM_SHUFFLE(2, 1, 0, 0): rotate lanes up, lane 0 duplicated (blended away)
const SHL_PERMUTE: i32 = 0b1001_0000;
// keep dword elements 2..=7 of the permuted carry, zero the bottom lane
const SHL_BLEND: i32 = 0b1111_1100;
// _MM_SHUFFLE(0, 3, 2, 1): rotate lanes down, lane 3 duplicated (blended away)
const SHR_PERMUTE: i32 = 0b0011_1001;
// keep dword elements 0..=5 of the permuted carry, zero the top lane
const SHR_BLEND: i32 = 0b0011_1111;

impl<const B: usize> S256<B> {
    #[inline]
    fn shl<const COUNT: i32, const RIGHT: i32>(self) -> Self {
        // SAFETY: bound only after AVX2 was detected by the dispatcher.
        unsafe {
            let carry = _mm256_permute4x64_epi64::<SHL_PERMUTE>(_mm256_srli_epi64::<RIGHT>(self.0));
            let carry = _mm256_blend_epi32::<SHL_BLEND>(_mm256_setzero_si256(), carry);
            Self(_mm256_or_si256(_mm256_slli_epi64::<COUNT>(self.0), carry))
        }
    }

    #[inline]
    fn shr<const COUNT: i32, const LEFT: i32>(self) -> Self {
        // SAFETY: bound only after AVX2 was detected by the dispatcher.
        unsafe {
            let carry = _mm256_permute4x64_epi64::<SHR_PERMUTE>(_mm256_slli_epi64::<LEFT>(self.0));
            let carry = _mm256_blend_epi32::<SHR_BLEND>(_mm256_setzero_si256(), carry);
            Self(_mm256_or_si256(_mm256_srli_epi64::<COUNT>(self.0), carry))
        }
    }
}

impl<const B: usize> Word for S256<B> {
    const BITS: usize = B;

    #[inline]
    fn zero() -> Self {
        // SAFETY: bound only after AVX2 was detected by the dispatcher.
        unsafe { Self(_mm256_setzero_si256()) }
    }

    #[inline]
    fn xor(self, rhs: Self) -> Self {
        // SAFETY: bound only after AVX2 was detected by the dispatcher.
        unsafe { Self(_mm256_xor_si256(self.0, rhs.0)) }
    }

    #[inline]
    fn and(self, rhs: Self) -> Self {
        // SAFETY: bound only after AVX2 was detected by the dispatcher.
        unsafe { Self(_mm256_and_si256(self.0, rhs.0)) }
    }

    #[inline]
    fn shift_left(self, count: u32) -> Self {
        match count {
            1 => self.shl::<1, 63>(),
            2 => self.shl::<2, 62>(),
            _ => unreachable!("shift count is always 1 or 2"),
        }
    }

    #[inline]
    fn shift_right(self, count: u32) -> Self {
        match count {
            1 => self.shr::<1, 63>(),
            2 => self.shr::<2, 62>(),
            _ => unreachable!("shift count is always 1 or 2"),
        }
    }

    #[inline]
    fn xor_masked(self, row: Self, mask: u64) -> Self {
        // SAFETY: bound only after AVX2 was detected by the dispatcher.
        unsafe {
            #[allow(clippy::cast_possible_wrap)]
            let m = _mm256_set1_epi64x(mask as i64);
            Self(_mm256_xor_si256(self.0, _mm256_and_si256(row.0, m)))
        }
    }

    #[inline]
    fn from_limbs(limbs: &[u64; 4]) -> Self {
        // SAFETY: unaligned load from a 32-byte array.
        unsafe { Self(_mm256_loadu_si256(limbs.as_ptr().cast::<__m256i>())) }
    }

    #[inline]
    fn to_limbs(self) -> [u64; 4] {
        let mut limbs = [0u64; 4];
        // SAFETY: unaligned store into a 32-byte array.
        unsafe {
            _mm256_storeu_si256(limbs.as_mut_ptr().cast::<__m256i>(), self.0);
        }
        limbs
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

super::instantiate_simd_backend!("avx2", S256<192>, S256<256>);

// =============================================================================
// TESTS
// =============================================================================
