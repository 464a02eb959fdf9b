//! Parameter-set registry.
//!
//! Maps each identifier to a descriptor holding the instance sizes and the
//! entry points bound for this CPU. Descriptors resolve exactly once, on
//! first access; resolution is deterministic for a given machine, so a
//! racing second resolution is harmless.

pub(crate) mod dispatcher;

use std::sync::OnceLock;

use crate::lowmc::{LowmcParameters, LOWMC_129_129_4, LOWMC_192_192_4, LOWMC_255_255_4};
use crate::types::{ComputeAuxFn, LowmcFn, ParameterSet, SimulateOnlineFn};

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// Entry points resolved for one parameter set.
#[derive(Clone, Copy)]
pub struct Implementations {
    /// Plain `LowMC` encryption.
    pub lowmc: LowmcFn,
    /// Auxiliary tape pass.
    pub lowmc_aux: ComputeAuxFn,
    /// Online MPC simulation.
    pub lowmc_simulate_online: SimulateOnlineFn,
}

/// Descriptor for one Picnic parameter set.
pub struct Instance {
    /// Underlying `LowMC` instance.
    pub lowmc: LowmcParameters,
    /// Digest length in bytes.
    pub digest_size: usize,
    /// Seed length in bytes.
    pub seed_size: usize,
    /// Total number of MPC executions.
    pub num_rounds: usize,
    /// Number of executions opened during verification.
    pub num_opened_rounds: usize,
    /// Parties per execution.
    pub num_mpc_parties: usize,
    /// Serialized key / masked-key length in bytes.
    pub input_size: usize,
    /// Serialized ciphertext length in bytes.
    pub output_size: usize,
    /// Broadcast bits of one execution, in bytes (n * r bits).
    pub view_size: usize,
    /// Random-tape bits of one party, in bytes (2 * n * r bits).
    pub tape_size: usize,
    /// Resolved entry points.
    pub impls: Implementations,
}

/// Looks up the descriptor for `params`, resolving it on first access.
///
/// Returns `None` for identifiers this crate does not implement (the ZKB++
/// and Unruh variants); the caller treats that as an unusable parameter
/// set, not an error.
#[must_use]
pub fn instance_get(params: ParameterSet) -> Option<&'static Instance> {
    static INSTANCES: [OnceLock<Option<Instance>>; 12] = [const { OnceLock::new() }; 12];
    INSTANCES[params.index()]
        .get_or_init(|| create_instance(params))
        .as_ref()
}

fn create_instance(params: ParameterSet) -> Option<Instance> {
    let (lowmc, digest_size, seed_size, num_rounds, num_opened_rounds) = match params {
        ParameterSet::Picnic3L1 => (LOWMC_129_129_4, 32, 16, 250, 36),
        ParameterSet::Picnic3L3 => (LOWMC_192_192_4, 48, 24, 419, 52),
        ParameterSet::Picnic3L5 => (LOWMC_255_255_4, 64, 32, 601, 68),
        _ => return None,
    };
    let impls = dispatcher::implementations_for(&lowmc)?;
    Some(Instance {
        lowmc,
        digest_size,
        seed_size,
        num_rounds,
        num_opened_rounds,
        num_mpc_parties: crate::tapes::NUM_PARTIES,
        input_size: lowmc.key_bytes(),
        output_size: lowmc.block_bytes(),
        view_size: (lowmc.n * lowmc.r).div_ceil(8),
        tape_size: (2 * lowmc.n * lowmc.r).div_ceil(8),
        impls,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kkw_sets_resolve() {
        for params in [
            ParameterSet::Picnic3L1,
            ParameterSet::Picnic3L3,
            ParameterSet::Picnic3L5,
        ] {
            let inst = instance_get(params);
            assert!(inst.is_some(), "{params:?}");
        }
        let l1 = instance_get(ParameterSet::Picnic3L1).map(|i| (i.input_size, i.tape_size));
        assert_eq!(l1, Some((17, 129)));
    }

    #[test]
    fn non_kkw_sets_report_absent() {
        for params in ParameterSet::ALL {
            let expected = matches!(
                params,
                ParameterSet::Picnic3L1 | ParameterSet::Picnic3L3 | ParameterSet::Picnic3L5
            );
            assert_eq!(instance_get(params).is_some(), expected, "{params:?}");
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let a = instance_get(ParameterSet::Picnic3L1).map(std::ptr::from_ref);
        let b = instance_get(ParameterSet::Picnic3L1).map(std::ptr::from_ref);
        assert_eq!(a, b);
    }
}
