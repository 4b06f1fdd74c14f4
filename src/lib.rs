//! Neuroevo - population-based mutation engine for neuroevolution of
//! reinforcement-learning agents.
//!
//! Each generation, every agent in a population receives one stochastic
//! mutation drawn from a weighted distribution over five operators
//! (no-op, architecture growth, weight perturbation, activation swap,
//! hyperparameter rescale). Coupled networks (actor/critic, eval/target)
//! stay mutually consistent: structural decisions are mirrored across an
//! individual's networks, and target networks are rebuilt and hard-copied
//! from their eval networks after every operator.
//!
//! # Architecture
//!
//! The crate is split into four modules:
//!
//! - `schema`: engine configuration and algorithm topology descriptors
//! - `net`: the network/optimizer capability surface and a reference MLP
//! - `agent`: the individuals a mutation pass operates on
//! - `engine`: operator selection, the mutation operators, target resync
//!
//! # Example
//!
//! ```rust,no_run
//! use neuroevo::{
//!     agent::Individual,
//!     engine::{MutationEngine, MutationRng},
//!     net::{Activation, Mlp, MlpDescriptor, OptimizerKind},
//!     schema::{Algorithm, MutationConfig},
//! };
//!
//! let config = MutationConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let mut engine = MutationEngine::new(config).expect("valid config");
//!
//! // Build a small DDPG population.
//! let descriptor = MlpDescriptor {
//!     num_inputs: 8,
//!     num_outputs: 2,
//!     hidden_sizes: vec![64, 64],
//!     activation: Activation::Relu,
//!     layer_norm: false,
//! };
//! let mut rng = MutationRng::new(7);
//! let population: Vec<Individual<Mlp>> = (0..4)
//!     .map(|_| {
//!         Individual::new(
//!             Algorithm::Ddpg,
//!             &descriptor,
//!             &descriptor,
//!             OptimizerKind::Adam,
//!             1e-3,
//!             64,
//!             rng.inner(),
//!         )
//!         .expect("buildable individual")
//!     })
//!     .collect();
//!
//! let mutated = engine.mutate_population(population).expect("mutation pass");
//! for individual in &mutated {
//!     println!("{}: {}", individual.algo, individual.last_mutation);
//! }
//! ```

pub mod agent;
pub mod engine;
pub mod net;
pub mod schema;

// Re-export commonly used types
pub use agent::{Individual, MutationLabel, NetRole};
pub use engine::{MutationEngine, MutationError, MutationRng};
pub use net::{Activation, EvolvableNetwork, Mlp, MlpDescriptor, Optimizer, OptimizerKind};
pub use schema::{Algorithm, MutationConfig};
