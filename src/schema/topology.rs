//! Topology resolution: which network roles an algorithm owns.
//!
//! Every supported RL algorithm maps to one static [`AlgoTopology`]: an
//! actor role plus an ordered list of critic roles, each naming its
//! eval/target/optimizer slots. This is the single place encoding how many
//! critics an algorithm has; adding an algorithm means adding one variant
//! and one descriptor here, never touching operator logic.

use serde::{Deserialize, Serialize};

use crate::agent::Individual;
use crate::net::EvolvableNetwork;

/// Supported RL algorithm families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "DQN")]
    Dqn,
    #[serde(rename = "DDPG")]
    Ddpg,
    #[serde(rename = "TD3")]
    Td3,
}

/// Slot names for one network role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub eval: &'static str,
    pub target: &'static str,
    pub optimizer: &'static str,
}

/// Role descriptor for one algorithm: one actor, zero or more critics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgoTopology {
    pub actor: RoleSpec,
    pub critics: &'static [RoleSpec],
}

static DQN: AlgoTopology = AlgoTopology {
    actor: RoleSpec {
        eval: "net_eval",
        target: "net_target",
        optimizer: "optimizer",
    },
    critics: &[],
};

static DDPG: AlgoTopology = AlgoTopology {
    actor: RoleSpec {
        eval: "actor",
        target: "actor_target",
        optimizer: "actor_optimizer",
    },
    critics: &[RoleSpec {
        eval: "critic",
        target: "critic_target",
        optimizer: "critic_optimizer",
    }],
};

static TD3: AlgoTopology = AlgoTopology {
    actor: RoleSpec {
        eval: "actor",
        target: "actor_target",
        optimizer: "actor_optimizer",
    },
    critics: &[
        RoleSpec {
            eval: "critic_1",
            target: "critic_1_target",
            optimizer: "critic_1_optimizer",
        },
        RoleSpec {
            eval: "critic_2",
            target: "critic_2_target",
            optimizer: "critic_2_optimizer",
        },
    ],
};

impl Algorithm {
    /// Parse an algorithm tag. Unknown tags are a configuration error.
    pub fn from_tag(tag: &str) -> Result<Self, TopologyError> {
        match tag {
            "DQN" => Ok(Algorithm::Dqn),
            "DDPG" => Ok(Algorithm::Ddpg),
            "TD3" => Ok(Algorithm::Td3),
            other => Err(TopologyError::UnknownAlgorithm(other.to_string())),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Algorithm::Dqn => "DQN",
            Algorithm::Ddpg => "DDPG",
            Algorithm::Td3 => "TD3",
        }
    }

    /// Role descriptor for this algorithm. Pure lookup.
    pub fn topology(self) -> &'static AlgoTopology {
        match self {
            Algorithm::Dqn => &DQN,
            Algorithm::Ddpg => &DDPG,
            Algorithm::Td3 => &TD3,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl AlgoTopology {
    /// Check an individual's critic roles against this descriptor.
    pub fn check<N: EvolvableNetwork>(
        &self,
        individual: &Individual<N>,
    ) -> Result<(), TopologyError> {
        if individual.critics.len() != self.critics.len() {
            return Err(TopologyError::CriticCountMismatch {
                algo: individual.algo,
                expected: self.critics.len(),
                found: individual.critics.len(),
            });
        }
        Ok(())
    }
}

/// Topology resolution errors. All fatal; no silent fallback.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("unknown algorithm tag: {0}")]
    UnknownAlgorithm(String),
    #[error("{algo} expects {expected} critic role(s), individual carries {found}")]
    CriticCountMismatch {
        algo: Algorithm,
        expected: usize,
        found: usize,
    },
}
