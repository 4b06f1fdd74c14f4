//! Classic parameter mutation: bounded stochastic perturbation of weight
//! matrices.
//!
//! Only two-dimensional, non-normalization parameters are eligible; biases
//! and norm vectors are never touched. Perturbed networks keep their
//! architecture, so the follow-up target resync is a pure values copy.

use crate::agent::{Individual, MutationLabel};
use crate::net::{EvolvableNetwork, NetworkError, ParamTensor};
use crate::schema::{
    MUTATION_FRACTION, RESET_PROB, SUPER_MUTATION_PROB, SUPER_MUTATION_STRENGTH, WEIGHT_CLAMP,
};

use super::rng::MutationRng;

/// Apply parameter mutation to an individual's actor eval network.
pub fn mutate<N: EvolvableNetwork>(
    individual: &mut Individual<N>,
    mutation_sd: f32,
    rng: &mut MutationRng,
) -> Result<(), NetworkError> {
    perturb_network(&mut individual.actor.eval, mutation_sd, rng)?;
    individual.last_mutation = MutationLabel::Parameters;
    Ok(())
}

/// Perturb a random subset of one network's weight matrices in place.
///
/// A network with no eligible parameters is left untouched; that is not an
/// error.
pub fn perturb_network<N: EvolvableNetwork>(
    network: &mut N,
    mutation_sd: f32,
    rng: &mut MutationRng,
) -> Result<(), NetworkError> {
    let mut snapshot = network.export_params();

    let eligible: Vec<usize> = snapshot
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.name.contains("norm") && matches!(p.tensor, ParamTensor::Matrix(_)))
        .map(|(i, _)| i)
        .collect();
    if eligible.is_empty() {
        return Ok(());
    }

    // Non-empty subset: size uniform in [1, eligible count], members drawn
    // without replacement.
    let how_many = rng.below(eligible.len()) + 1;
    let chosen = rng.sample_distinct(eligible.len(), how_many);

    for pick in chosen {
        let Some(matrix) = snapshot
            .iter_mut()
            .nth(eligible[pick])
            .and_then(|p| p.tensor.as_matrix_mut())
        else {
            continue;
        };
        let (rows, cols) = matrix.dim();
        let num_weights = rows * cols;
        if num_weights == 0 {
            continue;
        }

        // Mutation count in [0, ceil(0.1 * n)): exclusive upper bound, and
        // the same cell may be hit more than once.
        let max_mutations = (MUTATION_FRACTION * num_weights as f32).ceil() as usize;
        let num_mutations = rng.below(max_mutations.max(1));
        for _ in 0..num_mutations {
            let row = rng.below(rows);
            let col = rng.below(cols);
            let current = matrix[[row, col]];

            let random_num = rng.uniform();
            let mutated = if random_num < SUPER_MUTATION_PROB {
                current + rng.standard_normal() * (SUPER_MUTATION_STRENGTH * current).abs()
            } else if random_num < RESET_PROB {
                rng.standard_normal()
            } else {
                current + rng.standard_normal() * (mutation_sd * current).abs()
            };

            matrix[[row, col]] = mutated.clamp(-WEIGHT_CLAMP, WEIGHT_CLAMP);
        }
    }

    network.import_params(&snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Activation, Mlp, MlpDescriptor};
    use proptest::prelude::*;

    fn network(seed: u64, layer_norm: bool) -> Mlp {
        let mut rng = MutationRng::new(seed);
        Mlp::new(
            MlpDescriptor {
                num_inputs: 10,
                num_outputs: 10,
                hidden_sizes: vec![10],
                activation: Activation::Relu,
                layer_norm,
            },
            rng.inner(),
        )
    }

    #[test]
    fn test_biases_and_norm_params_untouched() {
        let mut rng = MutationRng::new(11);
        let mut net = network(5, true);
        let before = net.export_params();

        perturb_network(&mut net, 0.1, &mut rng).unwrap();

        let after = net.export_params();
        for param in before.iter() {
            if param.name.contains("bias") || param.name.contains("norm") {
                assert_eq!(
                    Some(&param.tensor),
                    after.get(&param.name),
                    "{} must not be mutated",
                    param.name
                );
            }
        }
    }

    #[test]
    fn test_mutated_values_stay_clamped() {
        let mut rng = MutationRng::new(12);
        let mut net = network(6, false);

        // Many rounds so super mutations and resets both occur.
        for _ in 0..200 {
            perturb_network(&mut net, 0.1, &mut rng).unwrap();
        }

        for param in net.export_params().iter() {
            if let ParamTensor::Matrix(m) = &param.tensor {
                for &w in m.iter() {
                    assert!(w.abs() <= WEIGHT_CLAMP);
                    assert!(w.is_finite());
                }
            }
        }
    }

    // Scenario from the engine contract: a 10×10 matrix (n = 100) admits at
    // most ceil(0.1 * 100) - 1 = 9 mutation instances per pass, so no more
    // than 9 cells can differ afterwards.
    #[test]
    fn test_mutation_count_bound_on_100_weight_matrix() {
        for seed in 0..20 {
            let mut rng = MutationRng::new(seed);
            let mut net = network(7, false);
            let before = net.export_params();

            perturb_network(&mut net, 0.1, &mut rng).unwrap();

            let after = net.export_params();
            for (b, a) in before.iter().zip(after.iter()) {
                let (ParamTensor::Matrix(mb), ParamTensor::Matrix(ma)) = (&b.tensor, &a.tensor)
                else {
                    continue;
                };
                let changed = mb.iter().zip(ma.iter()).filter(|(x, y)| x != y).count();
                assert!(changed <= 9, "{} cells changed in one pass", changed);
                for &w in ma.iter() {
                    assert!(w.abs() <= WEIGHT_CLAMP);
                }
            }
        }
    }

    #[test]
    fn test_architecture_is_unchanged() {
        let mut rng = MutationRng::new(13);
        let mut net = network(8, true);
        let descriptor = net.descriptor();

        perturb_network(&mut net, 0.1, &mut rng).unwrap();

        assert_eq!(net.descriptor(), descriptor);
    }

    proptest! {
        // Any seed and any sane mutation_sd keeps every weight within the
        // clamp bound and finite.
        #[test]
        fn prop_clamp_holds_for_any_seed(seed in 0u64..500, sd in 0.0f32..2.0) {
            let mut rng = MutationRng::new(seed);
            let mut net = network(9, false);
            perturb_network(&mut net, sd, &mut rng).unwrap();
            for param in net.export_params().iter() {
                if let ParamTensor::Matrix(m) = &param.tensor {
                    for &w in m.iter() {
                        prop_assert!(w.abs() <= WEIGHT_CLAMP);
                        prop_assert!(w.is_finite());
                    }
                }
            }
        }
    }
}
