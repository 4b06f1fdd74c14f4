//! Schema module - configuration and topology types for the mutation engine.

mod config;
mod topology;

pub use config::{
    ConfigError, HYPERPARAM_SCALE_DOWN, HYPERPARAM_SCALE_UP, MAX_BATCH_SIZE, MAX_LEARNING_RATE,
    MIN_BATCH_SIZE, MIN_LEARNING_RATE, MUTATION_FRACTION, MutationConfig, RESET_PROB,
    SUPER_MUTATION_PROB, SUPER_MUTATION_STRENGTH, TunableHyperparam, WEIGHT_CLAMP,
};
pub use topology::{AlgoTopology, Algorithm, RoleSpec, TopologyError};
