//! RL hyperparameter mutation: batch size and learning rate.

use crate::agent::{Individual, MutationLabel};
use crate::net::{EvolvableNetwork, Optimizer};
use crate::schema::{
    HYPERPARAM_SCALE_DOWN, HYPERPARAM_SCALE_UP, MAX_BATCH_SIZE, MAX_LEARNING_RATE, MIN_BATCH_SIZE,
    MIN_LEARNING_RATE, TunableHyperparam,
};

use super::rng::MutationRng;

/// Perturb one scalar hyperparameter chosen uniformly from `tunables`.
///
/// A learning-rate change rebuilds every optimizer of the individual with
/// the same kind against the unchanged network parameters; the rebuilt
/// optimizers start with fresh moment state.
pub fn mutate<N: EvolvableNetwork>(
    individual: &mut Individual<N>,
    tunables: &[TunableHyperparam],
    rng: &mut MutationRng,
) {
    if tunables.is_empty() {
        return;
    }

    let param = tunables[rng.below(tunables.len())];
    let up = rng.uniform() > 0.5;
    match param {
        TunableHyperparam::BatchSize => {
            individual.batch_size = scaled_batch_size(individual.batch_size, up);
            individual.last_mutation = MutationLabel::BatchSize;
        }
        TunableHyperparam::LearningRate => {
            let new_lr = scaled_learning_rate(individual.lr, up);
            if new_lr != individual.lr {
                individual.lr = new_lr;
                rebuild_optimizers(individual, new_lr);
            }
            individual.last_mutation = MutationLabel::LearningRate;
        }
    }
}

fn rebuild_optimizers<N: EvolvableNetwork>(individual: &mut Individual<N>, lr: f32) {
    let kind = individual.actor.optimizer.kind();
    individual.actor.optimizer = Optimizer::new(kind, &individual.actor.eval.export_params(), lr);
    for role in &mut individual.critics {
        let kind = role.optimizer.kind();
        role.optimizer = Optimizer::new(kind, &role.eval.export_params(), lr);
    }
}

/// Scale and clamp a batch size; fractional results truncate.
pub(crate) fn scaled_batch_size(batch_size: u32, up: bool) -> u32 {
    let factor = if up {
        HYPERPARAM_SCALE_UP
    } else {
        HYPERPARAM_SCALE_DOWN
    };
    ((batch_size as f32 * factor) as u32).clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE)
}

/// Scale and clamp a learning rate.
pub(crate) fn scaled_learning_rate(lr: f32, up: bool) -> f32 {
    let factor = if up {
        HYPERPARAM_SCALE_UP
    } else {
        HYPERPARAM_SCALE_DOWN
    };
    (lr * factor).clamp(MIN_LEARNING_RATE, MAX_LEARNING_RATE)
}
