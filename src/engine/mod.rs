//! Mutation engine: operator selection, the five mutation operators, and
//! target resynchronization.
//!
//! # Overview
//!
//! Once per generation the [`MutationEngine`] draws one operator per
//! individual from the configured weighted distribution and applies it:
//!
//! - **No-op**: label only, nothing changes.
//! - **Architecture** (`structure`): grow actor and critics by one layer or
//!   one node unit, identical decision mirrored across the coupled networks.
//! - **Parameters** (`weights`): bounded stochastic perturbation of a random
//!   subset of weight matrices.
//! - **Activation** (`activation`): swap the nonlinearity, keep the weights.
//! - **RL hyperparameter** (`hyperparams`): rescale batch size or learning
//!   rate, rebuilding optimizers when the rate changes.
//!
//! After any operator the resynchronizer rebuilds every target network from
//! its eval network's configuration and hard-copies the weights, so the
//! eval/target pairing invariant holds unconditionally.

pub mod activation;
pub mod hyperparams;
mod rng;
pub mod structure;
pub mod weights;

mod resync;
mod selector;

pub use resync::resync_targets;
pub use rng::MutationRng;
pub use selector::{MutationEngine, MutationKind};

use crate::net::NetworkError;
use crate::schema::TopologyError;

/// Errors a mutation pass can surface. All fatal: the engine never falls
/// back silently.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Network(#[from] NetworkError),
}
