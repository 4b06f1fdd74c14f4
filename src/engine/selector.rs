//! Top-level mutation dispatch over a population.

use log::debug;
use rand::Rng;
use rand::distributions::WeightedIndex;

use crate::agent::{Individual, MutationLabel};
use crate::net::EvolvableNetwork;
use crate::schema::{ConfigError, MutationConfig};

use super::rng::MutationRng;
use super::{MutationError, activation, hyperparams, resync, structure, weights};

/// The five mutation operator kinds the selector draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    NoMutation,
    Architecture,
    Parameters,
    Activation,
    RlHyperparam,
}

/// Population-level mutation engine.
///
/// Validates its configuration once at construction and owns the single
/// seeded random source every operator draws from. Individuals are
/// processed strictly in order, so a pass is deterministic under a fixed
/// seed.
pub struct MutationEngine {
    config: MutationConfig,
    rng: MutationRng,
    operators: Vec<MutationKind>,
    sampler: Option<WeightedIndex<f32>>,
}

impl MutationEngine {
    /// Create an engine from a validated configuration.
    pub fn new(config: MutationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let weighted: Vec<(MutationKind, f32)> = [
            (MutationKind::NoMutation, config.no_mutation),
            (MutationKind::Architecture, config.architecture),
            (MutationKind::Parameters, config.parameters),
            (MutationKind::Activation, config.activation),
            (MutationKind::RlHyperparam, config.rl_hp),
        ]
        .into_iter()
        .filter(|&(_, weight)| weight > 0.0)
        .collect();

        // WeightedIndex normalizes the positive weights; an empty set means
        // mutation is disabled outright.
        let (operators, sampler) = if weighted.is_empty() {
            (Vec::new(), None)
        } else {
            let sampler = WeightedIndex::new(weighted.iter().map(|&(_, w)| w))
                .map_err(|_| ConfigError::UnsampleableWeights)?;
            (
                weighted.into_iter().map(|(kind, _)| kind).collect(),
                Some(sampler),
            )
        };

        let rng = match config.random_seed {
            Some(seed) => MutationRng::new(seed),
            None => MutationRng::from_entropy(),
        };

        Ok(Self {
            config,
            rng,
            operators,
            sampler,
        })
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Mutate a population: one operator drawn per individual, targets
    /// resynchronized unconditionally afterwards.
    ///
    /// Returns the mutated individuals in input order. With no positively
    /// weighted operator the population passes through untouched.
    pub fn mutate_population<N: EvolvableNetwork>(
        &mut self,
        population: Vec<Individual<N>>,
    ) -> Result<Vec<Individual<N>>, MutationError> {
        let Some(sampler) = self.sampler.clone() else {
            debug!("no mutation operator enabled; population passes through unchanged");
            return Ok(population);
        };

        let mut mutated = Vec::with_capacity(population.len());
        for mut individual in population {
            individual.algo.topology().check(&individual)?;

            let kind = self.operators[self.rng.inner().sample(&sampler)];
            match kind {
                MutationKind::NoMutation => {
                    individual.last_mutation = MutationLabel::None;
                }
                MutationKind::Architecture => {
                    structure::mutate(&mut individual, self.config.new_layer_prob, &mut self.rng)?
                }
                MutationKind::Parameters => {
                    weights::mutate(&mut individual, self.config.mutation_sd, &mut self.rng)?
                }
                MutationKind::Activation => activation::mutate(&mut individual, &mut self.rng)?,
                MutationKind::RlHyperparam => hyperparams::mutate(
                    &mut individual,
                    &self.config.tunable_hyperparams,
                    &mut self.rng,
                ),
            }

            resync::resync_targets(&mut individual, &mut self.rng)?;
            debug!(
                "mutated {} individual: {}",
                individual.algo, individual.last_mutation
            );
            mutated.push(individual);
        }
        Ok(mutated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Activation, Mlp, MlpDescriptor, OptimizerKind};
    use crate::schema::{Algorithm, TopologyError};

    fn descriptor() -> MlpDescriptor {
        MlpDescriptor {
            num_inputs: 4,
            num_outputs: 2,
            hidden_sizes: vec![8, 8],
            activation: Activation::Relu,
            layer_norm: false,
        }
    }

    fn population(seed: u64, size: usize) -> Vec<Individual<Mlp>> {
        let mut rng = MutationRng::new(seed);
        (0..size)
            .map(|i| {
                let algo = match i % 3 {
                    0 => Algorithm::Dqn,
                    1 => Algorithm::Ddpg,
                    _ => Algorithm::Td3,
                };
                Individual::new(
                    algo,
                    &descriptor(),
                    &descriptor(),
                    OptimizerKind::Adam,
                    1e-3,
                    8 + i as u32,
                    rng.inner(),
                )
                .unwrap()
            })
            .collect()
    }

    fn build_engine(config: MutationConfig) -> MutationEngine {
        MutationEngine::new(MutationConfig {
            random_seed: Some(1234),
            ..config
        })
        .unwrap()
    }

    fn single_operator(kind: MutationKind) -> MutationConfig {
        let mut config = MutationConfig {
            no_mutation: 0.0,
            architecture: 0.0,
            parameters: 0.0,
            activation: 0.0,
            rl_hp: 0.0,
            ..Default::default()
        };
        match kind {
            MutationKind::NoMutation => config.no_mutation = 1.0,
            MutationKind::Architecture => config.architecture = 1.0,
            MutationKind::Parameters => config.parameters = 1.0,
            MutationKind::Activation => config.activation = 1.0,
            MutationKind::RlHyperparam => config.rl_hp = 1.0,
        }
        config
    }

    #[test]
    fn test_all_zero_weights_pass_population_through() {
        let mut engine = build_engine(MutationConfig {
            no_mutation: 0.0,
            architecture: 0.0,
            parameters: 0.0,
            activation: 0.0,
            rl_hp: 0.0,
            ..Default::default()
        });
        let population = population(50, 6);
        let snapshots: Vec<_> = population
            .iter()
            .map(|ind| ind.actor.eval.export_params())
            .collect();

        let out = engine.mutate_population(population).unwrap();

        assert_eq!(out.len(), 6);
        for (individual, before) in out.iter().zip(&snapshots) {
            assert_eq!(individual.last_mutation, MutationLabel::None);
            assert_eq!(&individual.actor.eval.export_params(), before);
        }
    }

    #[test]
    fn test_targets_equal_eval_after_every_operator() {
        for kind in [
            MutationKind::NoMutation,
            MutationKind::Architecture,
            MutationKind::Parameters,
            MutationKind::Activation,
            MutationKind::RlHyperparam,
        ] {
            let mut engine = build_engine(single_operator(kind));
            let out = engine.mutate_population(population(51, 6)).unwrap();

            for individual in &out {
                assert_eq!(
                    individual.actor.eval.export_params(),
                    individual.actor.target.export_params(),
                    "actor target out of sync after {kind:?}"
                );
                for role in &individual.critics {
                    assert_eq!(
                        role.eval.export_params(),
                        role.target.export_params(),
                        "critic target out of sync after {kind:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_operator_labels_are_set() {
        let mut engine = build_engine(single_operator(MutationKind::Parameters));
        let out = engine.mutate_population(population(52, 4)).unwrap();
        for individual in &out {
            assert_eq!(individual.last_mutation, MutationLabel::Parameters);
        }

        let mut engine = build_engine(single_operator(MutationKind::Architecture));
        let out = engine.mutate_population(population(53, 4)).unwrap();
        for individual in &out {
            assert_eq!(individual.last_mutation, MutationLabel::Architecture);
        }
    }

    #[test]
    fn test_order_and_length_preserved() {
        let mut engine = build_engine(MutationConfig::default());
        let population = population(54, 9);
        let batch_sizes: Vec<u32> = population.iter().map(|i| i.batch_size).collect();

        let out = engine.mutate_population(population).unwrap();

        assert_eq!(out.len(), 9);
        // Batch-size mutation can rescale values but order is recognizable:
        // only individuals mutated with the bs label may differ.
        for (individual, before) in out.iter().zip(&batch_sizes) {
            if individual.last_mutation != MutationLabel::BatchSize {
                assert_eq!(individual.batch_size, *before);
            }
        }
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let run = |seed: u64| {
            let mut engine = MutationEngine::new(MutationConfig {
                random_seed: Some(seed),
                ..Default::default()
            })
            .unwrap();
            engine.mutate_population(population(55, 8)).unwrap()
        };

        let a = run(77);
        let b = run(77);

        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.last_mutation, y.last_mutation);
            assert_eq!(x.lr, y.lr);
            assert_eq!(x.batch_size, y.batch_size);
            assert_eq!(
                x.actor.eval.export_params(),
                y.actor.eval.export_params()
            );
        }
    }

    #[test]
    fn test_critic_count_mismatch_fails_fast() {
        let mut engine = build_engine(single_operator(MutationKind::NoMutation));
        let mut population = population(56, 1);
        // A DQN individual must not carry critics.
        population[0].critics = {
            let mut rng = MutationRng::new(0);
            vec![
                crate::agent::NetRole::new(
                    &descriptor(),
                    OptimizerKind::Adam,
                    1e-3,
                    rng.inner(),
                )
                .unwrap(),
            ]
        };

        let err = engine.mutate_population(population).unwrap_err();
        assert!(matches!(
            err,
            MutationError::Topology(TopologyError::CriticCountMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let result = MutationEngine::new(MutationConfig {
            parameters: -1.0,
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
