//! Optimizer capability bound to a network's parameters.
//!
//! The training loop itself lives outside this crate; the engine only needs
//! to rebuild an optimizer of the same kind against the same parameters when
//! a learning-rate mutation lands. Rebuilding intentionally resets the
//! accumulated moment state.

use serde::{Deserialize, Serialize};

use super::ParamSnapshot;

/// Optimizer family; a rebuild always keeps the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    Adam,
    Sgd,
}

impl OptimizerKind {
    /// Moment buffers per parameter scalar (Adam keeps first and second).
    fn moment_slots(self) -> usize {
        match self {
            OptimizerKind::Adam => 2,
            OptimizerKind::Sgd => 1,
        }
    }
}

/// Optimizer state container for one network's parameter set.
#[derive(Debug, Clone)]
pub struct Optimizer {
    kind: OptimizerKind,
    learning_rate: f32,
    /// Update steps recorded by the training loop.
    pub step_count: u64,
    /// Flat moment accumulators, zeroed at construction.
    pub moments: Vec<f32>,
}

impl Optimizer {
    /// Build a fresh optimizer over `params` with zeroed state.
    pub fn new(kind: OptimizerKind, params: &ParamSnapshot, learning_rate: f32) -> Self {
        Self {
            kind,
            learning_rate,
            step_count: 0,
            moments: vec![0.0; params.scalar_count() * kind.moment_slots()],
        }
    }

    pub fn kind(&self) -> OptimizerKind {
        self.kind
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}
