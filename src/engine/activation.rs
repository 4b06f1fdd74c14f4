//! Activation mutation: swap a network's nonlinearity, keeping its weights.

use crate::agent::{Individual, MutationLabel};
use crate::net::{Activation, EvolvableNetwork, NetworkError};

use super::rng::MutationRng;

/// Swap the activation of the actor and of every critic independently.
///
/// Each network draws its own replacement, so critics may end up with
/// different activations than the actor.
pub fn mutate<N: EvolvableNetwork>(
    individual: &mut Individual<N>,
    rng: &mut MutationRng,
) -> Result<(), NetworkError> {
    permute_activation(&mut individual.actor.eval, rng)?;
    for role in &mut individual.critics {
        permute_activation(&mut role.eval, rng)?;
    }
    individual.last_mutation = MutationLabel::Activation;
    Ok(())
}

/// Rebuild `network` with a new activation and its old parameter values.
fn permute_activation<N: EvolvableNetwork>(
    network: &mut N,
    rng: &mut MutationRng,
) -> Result<(), NetworkError> {
    let new_activation = pick_new_activation(network.activation(), rng);
    let descriptor = network.descriptor_with_activation(new_activation);
    let mut fresh = N::build(&descriptor, rng.inner());
    fresh.import_params(&network.export_params())?;
    *network = fresh;
    Ok(())
}

/// Uniform draw over the candidate activations, excluding the current one.
pub(crate) fn pick_new_activation(current: Activation, rng: &mut MutationRng) -> Activation {
    let candidates: Vec<Activation> = Activation::ALL
        .iter()
        .copied()
        .filter(|&a| a != current)
        .collect();
    candidates[rng.below(candidates.len())]
}
