//! Architecture mutation: grow an individual's networks by one structural
//! unit, keeping actor and critics shape-compatible.
//!
//! Networks are cloned, grown, and only then swapped into the individual,
//! so no partially-mutated state is ever observable on the individual
//! itself.

use crate::agent::{Individual, MutationLabel};
use crate::net::{EvolvableNetwork, NetworkError};

use super::rng::MutationRng;

/// Apply one structural mutation to the actor and mirror it to every critic.
///
/// A single draw decides layer-vs-node for the whole individual. For node
/// growth, the placement parameters returned by the actor's growth call are
/// replayed verbatim on each critic (invariant: coupled networks change in
/// lockstep). A critic that cannot accept the mirrored placement is a fatal
/// structural mismatch surfaced from the capability boundary.
pub fn mutate<N: EvolvableNetwork>(
    individual: &mut Individual<N>,
    new_layer_prob: f32,
    rng: &mut MutationRng,
) -> Result<(), NetworkError> {
    let mut actor = individual.actor.eval.clone();
    let mut critics: Vec<N> = individual
        .critics
        .iter()
        .map(|role| role.eval.clone())
        .collect();

    if rng.uniform() < new_layer_prob {
        actor.add_layer(rng.inner());
        for critic in &mut critics {
            critic.add_layer(rng.inner());
        }
    } else {
        let placement = actor.add_node(rng.inner(), None)?;
        for critic in &mut critics {
            critic.add_node(rng.inner(), Some(placement))?;
        }
    }

    individual.actor.eval = actor;
    for (role, critic) in individual.critics.iter_mut().zip(critics) {
        role.eval = critic;
    }
    individual.last_mutation = MutationLabel::Architecture;
    Ok(())
}
