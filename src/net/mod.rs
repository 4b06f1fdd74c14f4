//! Network and optimizer capability surface consumed by the mutation engine.
//!
//! The engine never builds layers itself: it talks to networks through
//! [`EvolvableNetwork`], a narrow interface covering reconstruction
//! descriptors, parameter export/import, and the two growth operations.
//! [`Mlp`] is the reference implementation used by the tests, the benchmark,
//! and the CLI.

mod activation;
mod mlp;
mod optimizer;
mod params;

pub use activation::Activation;
pub use mlp::{Mlp, MlpDescriptor};
pub use optimizer::{Optimizer, OptimizerKind};
pub use params::{NamedParam, ParamSnapshot, ParamTensor};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Placement decision for a node-growth mutation.
///
/// Returned by the actor's `add_node` call and replayed verbatim on every
/// critic so coupled networks widen the same hidden layer by the same amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePlacement {
    /// Index of the hidden layer to widen.
    pub hidden_layer: usize,
    /// Number of nodes added to that layer.
    pub num_new_nodes: usize,
}

/// Errors surfaced at the network capability boundary.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("snapshot is missing parameter {name}")]
    MissingParam { name: String },
    #[error("snapshot carries {found} parameters, network expects {expected}")]
    ParamCountMismatch { expected: usize, found: usize },
    #[error("parameter {name} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("cannot widen hidden layer {requested}: network has {available} hidden layers")]
    StructuralMismatch { requested: usize, available: usize },
}

/// Capability surface a network must expose to be mutated by this engine.
///
/// `Clone` must produce a structurally independent deep copy; mutating a
/// clone never affects the original.
pub trait EvolvableNetwork: Clone {
    /// Reconstruction descriptor: enough configuration to build an
    /// equivalent-architecture instance.
    type Descriptor: Clone + std::fmt::Debug;

    /// Build a fresh instance from a descriptor, parameters initialized
    /// from `rng`.
    fn build<R: Rng + ?Sized>(descriptor: &Self::Descriptor, rng: &mut R) -> Self;

    /// Descriptor reflecting the network's current architecture.
    fn descriptor(&self) -> Self::Descriptor;

    /// Current descriptor with the nonlinearity replaced.
    fn descriptor_with_activation(&self, activation: Activation) -> Self::Descriptor;

    /// The network's current nonlinearity.
    fn activation(&self) -> Activation;

    /// Export every learnable parameter, in declaration order.
    fn export_params(&self) -> ParamSnapshot;

    /// Import a snapshot previously exported from an architecture-compatible
    /// network. Strict: unknown names or shape mismatches are errors.
    fn import_params(&mut self, snapshot: &ParamSnapshot) -> Result<(), NetworkError>;

    /// Grow the network by one hidden layer.
    fn add_layer<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// Grow the network by a node-equivalent unit.
    ///
    /// With `placement: None` the network chooses where to grow and returns
    /// the decision; with `Some(p)` it replays a decision made elsewhere.
    /// A placement the current shape cannot accept is a fatal
    /// [`NetworkError::StructuralMismatch`].
    fn add_node<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        placement: Option<NodePlacement>,
    ) -> Result<NodePlacement, NetworkError>;
}
