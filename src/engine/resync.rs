//! Target resynchronization: hard-copy every eval network into its target.
//!
//! Runs unconditionally after every operator, including no-op, because a
//! structural mutation may have changed the eval network's architecture.
//! The target is rebuilt from the eval network's current descriptor and
//! then value-copied, so it is always a deep, independent, state-identical
//! replica.

use log::trace;

use crate::agent::{Individual, NetRole};
use crate::net::{EvolvableNetwork, NetworkError};

use super::rng::MutationRng;

/// Restore the eval/target pairing invariant for every role.
pub fn resync_targets<N: EvolvableNetwork>(
    individual: &mut Individual<N>,
    rng: &mut MutationRng,
) -> Result<(), NetworkError> {
    let topology = individual.algo.topology();

    resync_role(&mut individual.actor, rng)?;
    trace!("resynchronized {}", topology.actor.target);

    for (i, role) in individual.critics.iter_mut().enumerate() {
        resync_role(role, rng)?;
        if let Some(spec) = topology.critics.get(i) {
            trace!("resynchronized {}", spec.target);
        }
    }
    Ok(())
}

fn resync_role<N: EvolvableNetwork>(
    role: &mut NetRole<N>,
    rng: &mut MutationRng,
) -> Result<(), NetworkError> {
    let descriptor = role.eval.descriptor();
    let mut target = N::build(&descriptor, rng.inner());
    target.import_params(&role.eval.export_params())?;
    role.target = target;
    Ok(())
}
