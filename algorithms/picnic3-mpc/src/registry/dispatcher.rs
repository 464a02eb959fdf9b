//! Hardware dispatcher.
//!
//! Picks the widest available backend for the current CPU (AVX2, then SSE2,
//! then the portable fallback) and hands out matching entry points. The
//! SIMD entry points are `unsafe` behind a target feature; the wrappers here
//! are the only place that turns them into safe function pointers, and they
//! are reachable only after the feature probe succeeded.

use crate::lowmc::LowmcParameters;
use crate::registry::Implementations;

// =============================================================================
// RESOLUTION
// =============================================================================

/// Binds the best backend for `lowmc` on this CPU.
pub(crate) fn implementations_for(lowmc: &LowmcParameters) -> Option<Implementations> {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            return s256_impls(lowmc);
        }
        if is_x86_feature_detected!("sse2") {
            return s128_impls(lowmc);
        }
    }
    portable_impls(lowmc)
}

/// Name of the backend the dispatcher would bind right now.
pub(crate) fn active_backend_name() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            return "AVX2";
        }
        if is_x86_feature_detected!("sse2") {
            return "SSE2";
        }
    }
    "Portable"
}

// =============================================================================
// BACKEND TABLES
// =============================================================================

fn portable_impls(lowmc: &LowmcParameters) -> Option<Implementations> {
    use crate::kernels::portable;
    match lowmc.n {
        129 => Some(Implementations {
            lowmc: portable::lowmc_129_43,
            lowmc_aux: portable::compute_aux_129_43,
            lowmc_simulate_online: portable::simulate_online_129_43,
        }),
        192 => Some(Implementations {
            lowmc: portable::lowmc_192_64,
            lowmc_aux: portable::compute_aux_192_64,
            lowmc_simulate_online: portable::simulate_online_192_64,
        }),
        255 => Some(Implementations {
            lowmc: portable::lowmc_255_85,
            lowmc_aux: portable::compute_aux_255_85,
            lowmc_simulate_online: portable::simulate_online_255_85,
        }),
        _ => None,
    }
}

#[cfg(target_arch = "x86_64")]
fn s128_impls(lowmc: &LowmcParameters) -> Option<Implementations> {
    match lowmc.n {
        129 => Some(Implementations {
            lowmc: checked_s128::lowmc_129_43,
            lowmc_aux: checked_s128::compute_aux_129_43,
            lowmc_simulate_online: checked_s128::simulate_online_129_43,
        }),
        192 => Some(Implementations {
            lowmc: checked_s128::lowmc_192_64,
            lowmc_aux: checked_s128::compute_aux_192_64,
            lowmc_simulate_online: checked_s128::simulate_online_192_64,
        }),
        255 => Some(Implementations {
            lowmc: checked_s128::lowmc_255_85,
            lowmc_aux: checked_s128::compute_aux_255_85,
            lowmc_simulate_online: checked_s128::simulate_online_255_85,
        }),
        _ => None,
    }
}

#[cfg(target_arch = "x86_64")]
fn s256_impls(lowmc: &LowmcParameters) -> Option<Implementations> {
    match lowmc.n {
        129 => Some(Implementations {
            lowmc: checked_s256::lowmc_129_43,
            lowmc_aux: checked_s256::compute_aux_129_43,
            lowmc_simulate_online: checked_s256::simulate_online_129_43,
        }),
        192 => Some(Implementations {
            lowmc: checked_s256::lowmc_192_64,
            lowmc_aux: checked_s256::compute_aux_192_64,
            lowmc_simulate_online: checked_s256::simulate_online_192_64,
        }),
        255 => Some(Implementations {
            lowmc: checked_s256::lowmc_255_85,
            lowmc_aux: checked_s256::compute_aux_255_85,
            lowmc_simulate_online: checked_s256::simulate_online_255_85,
        }),
        _ => None,
    }
}

// =============================================================================
// CHECKED WRAPPERS
// =============================================================================

/// Stamps safe wrappers over one SIMD backend's entry points. The wrappers
/// carry the CPUID precondition established in `implementations_for`.
#[cfg(target_arch = "x86_64")]
macro_rules! checked_wrappers {
    ($name:ident, $backend:ident) => {
        mod $name {
            #![allow(unsafe_code)]

            use crate::tapes::{MessageSet, RandomTapeSet};

            pub(super) fn lowmc_129_43(key: &[u8], plaintext: &[u8], ciphertext: &mut [u8]) {
                // SAFETY: bound only after CPUID validation in `implementations_for`.
                unsafe { crate::kernels::$backend::lowmc_129_43(key, plaintext, ciphertext) }
            }

            pub(super) fn lowmc_192_64(key: &[u8], plaintext: &[u8], ciphertext: &mut [u8]) {
                // SAFETY: bound only after CPUID validation in `implementations_for`.
                unsafe { crate::kernels::$backend::lowmc_192_64(key, plaintext, ciphertext) }
            }

            pub(super) fn lowmc_255_85(key: &[u8], plaintext: &[u8], ciphertext: &mut [u8]) {
                // SAFETY: bound only after CPUID validation in `implementations_for`.
                unsafe { crate::kernels::$backend::lowmc_255_85(key, plaintext, ciphertext) }
            }

            pub(super) fn compute_aux_129_43(tapes: &mut RandomTapeSet, key_mask: &mut [u8]) {
                // SAFETY: bound only after CPUID validation in `implementations_for`.
                unsafe { crate::kernels::$backend::compute_aux_129_43(tapes, key_mask) }
            }

            pub(super) fn compute_aux_192_64(tapes: &mut RandomTapeSet, key_mask: &mut [u8]) {
                // SAFETY: bound only after CPUID validation in `implementations_for`.
                unsafe { crate::kernels::$backend::compute_aux_192_64(tapes, key_mask) }
            }

            pub(super) fn compute_aux_255_85(tapes: &mut RandomTapeSet, key_mask: &mut [u8]) {
                // SAFETY: bound only after CPUID validation in `implementations_for`.
                unsafe { crate::kernels::$backend::compute_aux_255_85(tapes, key_mask) }
            }

            pub(super) fn simulate_online_129_43(
                masked_key: &[u8],
                tapes: &mut RandomTapeSet,
                msgs: &mut MessageSet,
                plaintext: &[u8],
                public_output: &[u8],
            ) -> bool {
                // SAFETY: bound only after CPUID validation in `implementations_for`.
                unsafe {
                    crate::kernels::$backend::simulate_online_129_43(
                        masked_key,
                        tapes,
                        msgs,
                        plaintext,
                        public_output,
                    )
                }
            }

            pub(super) fn simulate_online_192_64(
                masked_key: &[u8],
                tapes: &mut RandomTapeSet,
                msgs: &mut MessageSet,
                plaintext: &[u8],
                public_output: &[u8],
            ) -> bool {
                // SAFETY: bound only after CPUID validation in `implementations_for`.
                unsafe {
                    crate::kernels::$backend::simulate_online_192_64(
                        masked_key,
                        tapes,
                        msgs,
                        plaintext,
                        public_output,
                    )
                }
            }

            pub(super) fn simulate_online_255_85(
                masked_key: &[u8],
                tapes: &mut RandomTapeSet,
                msgs: &mut MessageSet,
                plaintext: &[u8],
                public_output: &[u8],
            ) -> bool {
                // SAFETY: bound only after CPUID validation in `implementations_for`.
                unsafe {
                    crate::kernels::$backend::simulate_online_255_85(
                        masked_key,
                        tapes,
                        msgs,
                        plaintext,
                        public_output,
                    )
                }
            }
        }
    };
}

#[cfg(target_arch = "x86_64")]
checked_wrappers!(checked_s128, s128);
#[cfg(target_arch = "x86_64")]
checked_wrappers!(checked_s256, s256);
