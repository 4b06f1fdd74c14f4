//! Reference evolvable multi-layer perceptron.
//!
//! Backs the capability surface with a concrete network the tests and the
//! CLI can exercise: dense layers on `ndarray`, optional layer
//! normalization on hidden layers, and the two growth operations
//! (`add_layer`, `add_node`) that preserve every already-learned weight.

use ndarray::{Array1, Array2, s};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::{Activation, EvolvableNetwork, NetworkError, NodePlacement, ParamSnapshot, ParamTensor};

/// Node counts an unconstrained `add_node` call may pick from.
const NEW_NODE_CHOICES: [usize; 3] = [16, 32, 64];

/// Reconstruction descriptor for [`Mlp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MlpDescriptor {
    /// Input feature count.
    pub num_inputs: usize,
    /// Output feature count.
    pub num_outputs: usize,
    /// Width of each hidden layer, in order.
    pub hidden_sizes: Vec<usize>,
    /// Nonlinearity applied after each hidden layer.
    pub activation: Activation,
    /// Whether hidden layers carry layer normalization.
    #[serde(default)]
    pub layer_norm: bool,
}

/// Layer normalization parameters (gain initialized to 1, bias to 0).
#[derive(Debug, Clone)]
struct LayerNorm {
    weight: Array1<f32>,
    bias: Array1<f32>,
}

impl LayerNorm {
    fn new(size: usize) -> Self {
        Self {
            weight: Array1::ones(size),
            bias: Array1::zeros(size),
        }
    }

    fn forward(&self, x: &Array1<f32>) -> Array1<f32> {
        let mean = x.mean().unwrap_or(0.0);
        let var = x.mapv(|v| (v - mean).powi(2)).mean().unwrap_or(0.0);
        let inv_std = 1.0 / (var + 1e-5).sqrt();
        (x - mean) * inv_std * &self.weight + &self.bias
    }

    /// Extend by `n` nodes; new gains are 1 and new biases 0, so freshly
    /// added nodes start un-normalized.
    fn widen(&mut self, n: usize) {
        let mut weight = Array1::ones(self.weight.len() + n);
        weight.slice_mut(s![..self.weight.len()]).assign(&self.weight);
        let mut bias = Array1::zeros(self.bias.len() + n);
        bias.slice_mut(s![..self.bias.len()]).assign(&self.bias);
        self.weight = weight;
        self.bias = bias;
    }
}

/// One dense layer: `weight` is (out × in).
#[derive(Debug, Clone)]
struct Layer {
    weight: Array2<f32>,
    bias: Array1<f32>,
    norm: Option<LayerNorm>,
}

impl Layer {
    fn new<R: Rng + ?Sized>(inputs: usize, outputs: usize, norm: bool, rng: &mut R) -> Self {
        let limit = init_limit(inputs);
        Self {
            weight: Array2::random_using((outputs, inputs), Uniform::new(-limit, limit), rng),
            bias: Array1::random_using(outputs, Uniform::new(-limit, limit), rng),
            norm: norm.then(|| LayerNorm::new(outputs)),
        }
    }
}

fn init_limit(fan_in: usize) -> f32 {
    1.0 / (fan_in.max(1) as f32).sqrt()
}

/// Evolvable multi-layer perceptron.
#[derive(Debug, Clone)]
pub struct Mlp {
    descriptor: MlpDescriptor,
    layers: Vec<Layer>,
}

impl Mlp {
    /// Build with parameters initialized from `rng`.
    pub fn new<R: Rng + ?Sized>(descriptor: MlpDescriptor, rng: &mut R) -> Self {
        let mut layers = Vec::with_capacity(descriptor.hidden_sizes.len() + 1);
        let mut inputs = descriptor.num_inputs;
        for &width in &descriptor.hidden_sizes {
            layers.push(Layer::new(inputs, width, descriptor.layer_norm, rng));
            inputs = width;
        }
        // Output layer: linear only, never normalized.
        layers.push(Layer::new(inputs, descriptor.num_outputs, false, rng));
        Self { descriptor, layers }
    }

    /// Forward pass for a single input vector.
    ///
    /// Panics if `input` does not match `num_inputs`; shape compatibility
    /// between coupled networks is exactly what the structural mutator
    /// maintains.
    pub fn forward(&self, input: &Array1<f32>) -> Array1<f32> {
        let hidden_count = self.hidden_count();
        let mut x = input.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            let mut z = layer.weight.dot(&x) + &layer.bias;
            if i < hidden_count {
                if let Some(norm) = &layer.norm {
                    z = norm.forward(&z);
                }
                z.mapv_inplace(|v| self.descriptor.activation.apply(v));
            }
            x = z;
        }
        x
    }

    fn hidden_count(&self) -> usize {
        self.descriptor.hidden_sizes.len()
    }

    /// Widen hidden layer `index` by `n` nodes, preserving existing weights.
    fn widen_hidden_layer<R: Rng + ?Sized>(&mut self, index: usize, n: usize, rng: &mut R) {
        let (old_out, inputs) = self.layers[index].weight.dim();
        let limit = init_limit(inputs);
        let mut weight =
            Array2::random_using((old_out + n, inputs), Uniform::new(-limit, limit), rng);
        weight
            .slice_mut(s![..old_out, ..])
            .assign(&self.layers[index].weight);
        let mut bias = Array1::random_using(old_out + n, Uniform::new(-limit, limit), rng);
        bias.slice_mut(s![..old_out])
            .assign(&self.layers[index].bias);
        self.layers[index].weight = weight;
        self.layers[index].bias = bias;
        if let Some(norm) = &mut self.layers[index].norm {
            norm.widen(n);
        }

        // The next layer reads n more inputs.
        let next = index + 1;
        let (next_out, old_in) = self.layers[next].weight.dim();
        let next_limit = init_limit(old_in + n);
        let mut next_weight = Array2::random_using(
            (next_out, old_in + n),
            Uniform::new(-next_limit, next_limit),
            rng,
        );
        next_weight
            .slice_mut(s![.., ..old_in])
            .assign(&self.layers[next].weight);
        self.layers[next].weight = next_weight;

        self.descriptor.hidden_sizes[index] += n;
    }
}

impl EvolvableNetwork for Mlp {
    type Descriptor = MlpDescriptor;

    fn build<R: Rng + ?Sized>(descriptor: &MlpDescriptor, rng: &mut R) -> Self {
        Mlp::new(descriptor.clone(), rng)
    }

    fn descriptor(&self) -> MlpDescriptor {
        self.descriptor.clone()
    }

    fn descriptor_with_activation(&self, activation: Activation) -> MlpDescriptor {
        MlpDescriptor {
            activation,
            ..self.descriptor.clone()
        }
    }

    fn activation(&self) -> Activation {
        self.descriptor.activation
    }

    fn export_params(&self) -> ParamSnapshot {
        let mut snapshot = ParamSnapshot::new();
        for (i, layer) in self.layers.iter().enumerate() {
            snapshot.push(
                format!("linear_{i}.weight"),
                ParamTensor::Matrix(layer.weight.clone()),
            );
            snapshot.push(
                format!("linear_{i}.bias"),
                ParamTensor::Vector(layer.bias.clone()),
            );
            if let Some(norm) = &layer.norm {
                snapshot.push(
                    format!("norm_{i}.weight"),
                    ParamTensor::Vector(norm.weight.clone()),
                );
                snapshot.push(
                    format!("norm_{i}.bias"),
                    ParamTensor::Vector(norm.bias.clone()),
                );
            }
        }
        snapshot
    }

    fn import_params(&mut self, snapshot: &ParamSnapshot) -> Result<(), NetworkError> {
        let expected: usize = self
            .layers
            .iter()
            .map(|l| if l.norm.is_some() { 4 } else { 2 })
            .sum();
        if snapshot.len() != expected {
            return Err(NetworkError::ParamCountMismatch {
                expected,
                found: snapshot.len(),
            });
        }

        for i in 0..self.layers.len() {
            let weight_name = format!("linear_{i}.weight");
            let weight = lookup_matrix(snapshot, &weight_name)?;
            assign_matrix(&mut self.layers[i].weight, weight, &weight_name)?;

            let bias_name = format!("linear_{i}.bias");
            let bias = lookup_vector(snapshot, &bias_name)?;
            assign_vector(&mut self.layers[i].bias, bias, &bias_name)?;

            if self.layers[i].norm.is_some() {
                let gain_name = format!("norm_{i}.weight");
                let gain = lookup_vector(snapshot, &gain_name)?.clone();
                let shift_name = format!("norm_{i}.bias");
                let shift = lookup_vector(snapshot, &shift_name)?.clone();
                if let Some(norm) = &mut self.layers[i].norm {
                    assign_vector(&mut norm.weight, &gain, &gain_name)?;
                    assign_vector(&mut norm.bias, &shift, &shift_name)?;
                }
            }
        }
        Ok(())
    }

    fn add_layer<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        // New hidden layer duplicates the last hidden width and slots in
        // just before the output layer, which keeps the output layer's
        // input dimension unchanged.
        let width = self
            .descriptor
            .hidden_sizes
            .last()
            .copied()
            .unwrap_or(self.descriptor.num_outputs);
        let layer = Layer::new(width, width, self.descriptor.layer_norm, rng);
        let output_index = self.layers.len() - 1;
        self.layers.insert(output_index, layer);
        self.descriptor.hidden_sizes.push(width);
    }

    fn add_node<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        placement: Option<NodePlacement>,
    ) -> Result<NodePlacement, NetworkError> {
        let available = self.hidden_count();
        let placement = match placement {
            Some(p) => p,
            None => {
                if available == 0 {
                    return Err(NetworkError::StructuralMismatch {
                        requested: 0,
                        available,
                    });
                }
                NodePlacement {
                    hidden_layer: rng.gen_range(0..available),
                    num_new_nodes: *NEW_NODE_CHOICES
                        .choose(rng)
                        .unwrap_or(&NEW_NODE_CHOICES[0]),
                }
            }
        };

        if placement.hidden_layer >= available {
            return Err(NetworkError::StructuralMismatch {
                requested: placement.hidden_layer,
                available,
            });
        }

        self.widen_hidden_layer(placement.hidden_layer, placement.num_new_nodes, rng);
        Ok(placement)
    }
}

fn lookup_matrix<'a>(
    snapshot: &'a ParamSnapshot,
    name: &str,
) -> Result<&'a Array2<f32>, NetworkError> {
    match snapshot.get(name) {
        Some(ParamTensor::Matrix(m)) => Ok(m),
        Some(other) => Err(NetworkError::ShapeMismatch {
            name: name.to_string(),
            expected: vec![0, 0],
            found: other.shape(),
        }),
        None => Err(NetworkError::MissingParam {
            name: name.to_string(),
        }),
    }
}

fn lookup_vector<'a>(
    snapshot: &'a ParamSnapshot,
    name: &str,
) -> Result<&'a Array1<f32>, NetworkError> {
    match snapshot.get(name) {
        Some(ParamTensor::Vector(v)) => Ok(v),
        Some(other) => Err(NetworkError::ShapeMismatch {
            name: name.to_string(),
            expected: vec![0],
            found: other.shape(),
        }),
        None => Err(NetworkError::MissingParam {
            name: name.to_string(),
        }),
    }
}

fn assign_matrix(
    dst: &mut Array2<f32>,
    src: &Array2<f32>,
    name: &str,
) -> Result<(), NetworkError> {
    if dst.dim() != src.dim() {
        return Err(NetworkError::ShapeMismatch {
            name: name.to_string(),
            expected: dst.shape().to_vec(),
            found: src.shape().to_vec(),
        });
    }
    dst.assign(src);
    Ok(())
}

fn assign_vector(
    dst: &mut Array1<f32>,
    src: &Array1<f32>,
    name: &str,
) -> Result<(), NetworkError> {
    if dst.len() != src.len() {
        return Err(NetworkError::ShapeMismatch {
            name: name.to_string(),
            expected: dst.shape().to_vec(),
            found: src.shape().to_vec(),
        });
    }
    dst.assign(src);
    Ok(())
}
