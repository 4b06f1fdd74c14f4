//! Individuals: the agents a mutation pass operates on.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::net::{EvolvableNetwork, NetworkError, Optimizer, OptimizerKind};
use crate::schema::Algorithm;

/// Label of the last mutation applied to an individual, kept for
/// logging and analysis by the surrounding training system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationLabel {
    #[default]
    None,
    #[serde(rename = "arch")]
    Architecture,
    #[serde(rename = "param")]
    Parameters,
    #[serde(rename = "act")]
    Activation,
    #[serde(rename = "lr")]
    LearningRate,
    #[serde(rename = "bs")]
    BatchSize,
}

impl MutationLabel {
    pub fn tag(self) -> &'static str {
        match self {
            MutationLabel::None => "none",
            MutationLabel::Architecture => "arch",
            MutationLabel::Parameters => "param",
            MutationLabel::Activation => "act",
            MutationLabel::LearningRate => "lr",
            MutationLabel::BatchSize => "bs",
        }
    }
}

impl std::fmt::Display for MutationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One network role: the eval network, its target copy, and the optimizer
/// bound to the eval network's parameters.
///
/// The target is a structurally independent instance kept value-synchronized
/// to the eval network by the resynchronizer, never a live reference.
#[derive(Debug, Clone)]
pub struct NetRole<N> {
    pub eval: N,
    pub target: N,
    pub optimizer: Optimizer,
}

impl<N: EvolvableNetwork> NetRole<N> {
    /// Build a role from a descriptor: fresh eval network, target
    /// hard-copied from it, optimizer over the eval parameters.
    pub fn new<R: Rng + ?Sized>(
        descriptor: &N::Descriptor,
        optimizer_kind: OptimizerKind,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let eval = N::build(descriptor, rng);
        let mut target = N::build(descriptor, rng);
        let params = eval.export_params();
        target.import_params(&params)?;
        let optimizer = Optimizer::new(optimizer_kind, &params, learning_rate);
        Ok(Self {
            eval,
            target,
            optimizer,
        })
    }
}

/// One agent in the evolving population.
///
/// Owns its actor and critic roles exclusively; no network is shared
/// between individuals. Mutated in place by exactly one operator per
/// generation.
#[derive(Debug, Clone)]
pub struct Individual<N> {
    pub algo: Algorithm,
    pub actor: NetRole<N>,
    pub critics: Vec<NetRole<N>>,
    pub lr: f32,
    pub batch_size: u32,
    pub last_mutation: MutationLabel,
}

impl<N: EvolvableNetwork> Individual<N> {
    /// Build an individual with one role per slot the algorithm's topology
    /// names, all critics sharing `critic_descriptor`.
    pub fn new<R: Rng + ?Sized>(
        algo: Algorithm,
        actor_descriptor: &N::Descriptor,
        critic_descriptor: &N::Descriptor,
        optimizer_kind: OptimizerKind,
        lr: f32,
        batch_size: u32,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let topology = algo.topology();
        let actor = NetRole::new(actor_descriptor, optimizer_kind, lr, rng)?;
        let critics = topology
            .critics
            .iter()
            .map(|_| NetRole::new(critic_descriptor, optimizer_kind, lr, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            algo,
            actor,
            critics,
            lr,
            batch_size,
            last_mutation: MutationLabel::None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Activation, Mlp, MlpDescriptor};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn descriptor(inputs: usize, outputs: usize) -> MlpDescriptor {
        MlpDescriptor {
            num_inputs: inputs,
            num_outputs: outputs,
            hidden_sizes: vec![8],
            activation: Activation::Relu,
            layer_norm: false,
        }
    }

    #[test]
    fn test_new_role_targets_match_eval() {
        let mut rng = StdRng::seed_from_u64(3);
        let role =
            NetRole::<Mlp>::new(&descriptor(4, 2), OptimizerKind::Adam, 1e-3, &mut rng).unwrap();
        assert_eq!(role.eval.export_params(), role.target.export_params());
    }

    #[test]
    fn test_individual_critic_count_follows_topology() {
        let mut rng = StdRng::seed_from_u64(3);
        let td3 = Individual::<Mlp>::new(
            Algorithm::Td3,
            &descriptor(4, 2),
            &descriptor(6, 1),
            OptimizerKind::Adam,
            1e-3,
            64,
            &mut rng,
        )
        .unwrap();
        assert_eq!(td3.critics.len(), 2);
        assert_eq!(td3.last_mutation, MutationLabel::None);

        let dqn = Individual::<Mlp>::new(
            Algorithm::Dqn,
            &descriptor(4, 2),
            &descriptor(6, 1),
            OptimizerKind::Adam,
            1e-3,
            64,
            &mut rng,
        )
        .unwrap();
        assert!(dqn.critics.is_empty());
    }

    #[test]
    fn test_label_tags() {
        assert_eq!(MutationLabel::Architecture.tag(), "arch");
        assert_eq!(MutationLabel::default().tag(), "none");
    }
}
