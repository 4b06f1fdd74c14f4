//! Configuration types for the mutation engine.

use serde::{Deserialize, Serialize};

/// Hard symmetric bound every mutated weight is clamped to.
pub const WEIGHT_CLAMP: f32 = 1_000_000.0;
/// Probability a mutation instance is a super mutation.
pub const SUPER_MUTATION_PROB: f32 = 0.05;
/// Probability threshold below which a (non-super) instance resets the weight.
pub const RESET_PROB: f32 = 0.10;
/// Noise scale multiplier for super mutations.
pub const SUPER_MUTATION_STRENGTH: f32 = 10.0;
/// Fraction of a matrix's cells bounding the per-matrix mutation count.
pub const MUTATION_FRACTION: f32 = 0.1;

/// Batch-size clamp range.
pub const MIN_BATCH_SIZE: u32 = 8;
pub const MAX_BATCH_SIZE: u32 = 128;
/// Learning-rate clamp range.
pub const MIN_LEARNING_RATE: f32 = 0.00001;
pub const MAX_LEARNING_RATE: f32 = 0.005;
/// Hyperparameter scale factors (draw above 0.5 scales up).
pub const HYPERPARAM_SCALE_UP: f32 = 1.2;
pub const HYPERPARAM_SCALE_DOWN: f32 = 0.8;

/// Scalar training hyperparameters the hyperparameter mutation may perturb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TunableHyperparam {
    BatchSize,
    /// Serialized as `lr`, matching the mutation label.
    #[serde(rename = "lr")]
    LearningRate,
}

/// Top-level mutation engine configuration.
///
/// Operator weights are relative, not probabilities: they are normalized
/// over the strictly positive entries. All-zero weights disable mutation
/// entirely (the population passes through unchanged).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Weight of the no-op operator.
    #[serde(default)]
    pub no_mutation: f32,
    /// Weight of architecture (layer/node growth) mutation.
    #[serde(default)]
    pub architecture: f32,
    /// Weight of network parameter (weight-level) mutation.
    #[serde(default)]
    pub parameters: f32,
    /// Weight of activation-swap mutation.
    #[serde(default)]
    pub activation: f32,
    /// Weight of RL hyperparameter mutation.
    #[serde(default)]
    pub rl_hp: f32,
    /// Probability an architecture mutation adds a layer rather than a node.
    #[serde(default = "default_new_layer_prob")]
    pub new_layer_prob: f32,
    /// Standard-deviation scale of the normal weight-mutation regime.
    #[serde(default = "default_mutation_sd")]
    pub mutation_sd: f32,
    /// Hyperparameters the RL hyperparameter mutation may choose from.
    #[serde(default = "default_tunable_hyperparams")]
    pub tunable_hyperparams: Vec<TunableHyperparam>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            no_mutation: 0.2,
            architecture: 0.2,
            parameters: 0.2,
            activation: 0.2,
            rl_hp: 0.2,
            new_layer_prob: default_new_layer_prob(),
            mutation_sd: default_mutation_sd(),
            tunable_hyperparams: default_tunable_hyperparams(),
            random_seed: None,
        }
    }
}

fn default_new_layer_prob() -> f32 {
    0.2
}
fn default_mutation_sd() -> f32 {
    0.1
}
fn default_tunable_hyperparams() -> Vec<TunableHyperparam> {
    vec![TunableHyperparam::BatchSize, TunableHyperparam::LearningRate]
}

impl MutationConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, weight) in [
            ("no_mutation", self.no_mutation),
            ("architecture", self.architecture),
            ("parameters", self.parameters),
            ("activation", self.activation),
            ("rl_hp", self.rl_hp),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidOperatorWeight {
                    operator: name,
                    weight,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.new_layer_prob) {
            return Err(ConfigError::InvalidNewLayerProb(self.new_layer_prob));
        }
        if !self.mutation_sd.is_finite() || self.mutation_sd < 0.0 {
            return Err(ConfigError::InvalidMutationSd(self.mutation_sd));
        }
        if self.rl_hp > 0.0 && self.tunable_hyperparams.is_empty() {
            return Err(ConfigError::NoTunableHyperparams);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("mutation weight for {operator} must be finite and non-negative, got {weight}")]
    InvalidOperatorWeight { operator: &'static str, weight: f32 },
    #[error("new_layer_prob must be within [0, 1], got {0}")]
    InvalidNewLayerProb(f32),
    #[error("mutation_sd must be finite and non-negative, got {0}")]
    InvalidMutationSd(f32),
    #[error("rl_hp weight is positive but no tunable hyperparameters are configured")]
    NoTunableHyperparams,
    #[error("mutation weights could not form a sampling distribution")]
    UnsampleableWeights,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MutationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_all_zero_weights_are_valid() {
        let config = MutationConfig {
            no_mutation: 0.0,
            architecture: 0.0,
            parameters: 0.0,
            activation: 0.0,
            rl_hp: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = MutationConfig {
            parameters: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOperatorWeight {
                operator: "parameters",
                ..
            })
        ));
    }

    #[test]
    fn test_new_layer_prob_out_of_range_rejected() {
        let config = MutationConfig {
            new_layer_prob: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNewLayerProb(_))
        ));
    }

    #[test]
    fn test_empty_tunables_with_positive_rl_hp_rejected() {
        let config = MutationConfig {
            rl_hp: 0.5,
            tunable_hyperparams: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoTunableHyperparams)
        ));

        // Without rl_hp weight the empty list is fine.
        let config = MutationConfig {
            rl_hp: 0.0,
            tunable_hyperparams: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = MutationConfig {
            random_seed: Some(42),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: MutationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.random_seed, Some(42));
        assert_eq!(back.tunable_hyperparams, config.tunable_hyperparams);
    }
}
