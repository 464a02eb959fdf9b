//! 128-bit SIMD backend (SSE2).
//!
//! Holds the 192/256-bit container in a pair of `__m128i` registers and
//! carries shift bits across the word boundary with byte-shuffle sequences.

#![allow(unsafe_code)]

use core::arch::x86_64::{
    __m128i, _mm_and_si128, _mm_bslli_si128, _mm_bsrli_si128, _mm_loadu_si128, _mm_or_si128,
    _mm_set1_epi64x, _mm_setzero_si128, _mm_slli_epi64, _mm_srli_epi64, _mm_storeu_si128,
    _mm_xor_si128,
};

use super::Word;

/// Packed GF(2) vector in two 128-bit lanes.
#[derive(Clone, Copy)]
pub(crate) struct S128<const B: usize>([__m128i; 2]);

impl<const B: usize> S128<B> {
    #[inline]
    fn shl<const COUNT: i32, const RIGHT: i32>(self) -> Self {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe {
            let [lo, hi] = self.0;
            let total_carry = _mm_srli_epi64::<RIGHT>(_mm_bsrli_si128::<8>(lo));
            let carry = _mm_srli_epi64::<RIGHT>(_mm_bslli_si128::<8>(lo));
            let r0 = _mm_or_si128(_mm_slli_epi64::<COUNT>(lo), carry);
            let carry = _mm_srli_epi64::<RIGHT>(_mm_bslli_si128::<8>(hi));
            let r1 = _mm_or_si128(_mm_slli_epi64::<COUNT>(hi), carry);
            Self([r0, _mm_or_si128(r1, total_carry)])
        }
    }

    #[inline]
    fn shr<const COUNT: i32, const LEFT: i32>(self) -> Self {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe {
            let [lo, hi] = self.0;
            let total_carry = _mm_slli_epi64::<LEFT>(_mm_bslli_si128::<8>(hi));
            let carry = _mm_slli_epi64::<LEFT>(_mm_bsrli_si128::<8>(lo));
            let r0 = _mm_or_si128(_mm_srli_epi64::<COUNT>(lo), carry);
            let carry = _mm_slli_epi64::<LEFT>(_mm_bsrli_si128::<8>(hi));
            let r1 = _mm_or_si128(_mm_srli_epi64::<COUNT>(hi), carry);
            Self([_mm_or_si128(r0, total_carry), r1])
        }
    }
}

impl<const B: usize> Word for S128<B> {
    const BITS: usize = B;

    #[inline]
    fn zero() -> Self {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { Self([_mm_setzero_si128(), _mm_setzero_si128()]) }
    }

    #[inline]
    fn xor(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe {
            Self([
                _mm_xor_si128(self.0[0], rhs.0[0]),
                _mm_xor_si128(self.0[1], rhs.0[1]),
            ])
        }
    }

    #[inline]
    fn and(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe {
            Self([
                _mm_and_si128(self.0[0], rhs.0[0]),
                _mm_and_si128(self.0[1], rhs.0[1]),
            ])
        }
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
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe {
            #[allow(clippy::cast_possible_wrap)]
            let m = _mm_set1_epi64x(mask as i64);
            Self([
                _mm_xor_si128(self.0[0], _mm_and_si128(row.0[0], m)),
                _mm_xor_si128(self.0[1], _mm_and_si128(row.0[1], m)),
            ])
        }
    }

    #[inline]
    fn from_limbs(limbs: &[u64; 4]) -> Self {
        // SAFETY: unaligned loads from a 32-byte array.
        unsafe {
            let ptr = limbs.as_ptr().cast::<__m128i>();
            Self([_mm_loadu_si128(ptr), _mm_loadu_si128(ptr.add(1))])
        }
    }

    #[inline]
    fn to_limbs(self) -> [u64; 4] {
        let mut limbs = [0u64; 4];
        // SAFETY: unaligned stores into a 32-byte array.
        unsafe {
            let ptr = limbs.as_mut_ptr().cast::<__m128i>();
            _mm_storeu_si128(ptr, self.0[0]);
            _mm_storeu_si128(ptr.add(1), self.0[1]);
        }
        limbs
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

super::instantiate_simd_backend!("sse2", S128<192>, S128<256>);

// =============================================================================
// TESTS
// =============================================================================
