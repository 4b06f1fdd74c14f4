//! Named parameter snapshots exported from and imported into networks.
//!
//! A snapshot is the value-level interface between the mutation engine and a
//! network: the weight mutator perturbs an exported snapshot and imports it
//! back, and the target resynchronizer copies an eval snapshot into a freshly
//! built target. Parameter order is the network's own declaration order, so
//! enumeration is deterministic.

use ndarray::{Array1, Array2};

/// A single learnable tensor, tagged with its dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamTensor {
    /// Two-dimensional weight matrix (rows × cols).
    Matrix(Array2<f32>),
    /// One-dimensional vector (bias or normalization parameter).
    Vector(Array1<f32>),
}

impl ParamTensor {
    /// Shape as a plain vec, for error reporting.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            ParamTensor::Matrix(m) => m.shape().to_vec(),
            ParamTensor::Vector(v) => v.shape().to_vec(),
        }
    }

    /// Number of scalar values in the tensor.
    pub fn len(&self) -> usize {
        match self {
            ParamTensor::Matrix(m) => m.len(),
            ParamTensor::Vector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_matrix(&self) -> Option<&Array2<f32>> {
        match self {
            ParamTensor::Matrix(m) => Some(m),
            ParamTensor::Vector(_) => None,
        }
    }

    pub fn as_matrix_mut(&mut self) -> Option<&mut Array2<f32>> {
        match self {
            ParamTensor::Matrix(m) => Some(m),
            ParamTensor::Vector(_) => None,
        }
    }
}

/// A named parameter within a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParam {
    /// Slot name, e.g. `linear_0.weight` or `norm_1.bias`.
    pub name: String,
    pub tensor: ParamTensor,
}

/// Ordered collection of every learnable parameter of one network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSnapshot {
    params: Vec<NamedParam>,
}

impl ParamSnapshot {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    pub fn push(&mut self, name: impl Into<String>, tensor: ParamTensor) {
        self.params.push(NamedParam {
            name: name.into(),
            tensor,
        });
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Total scalar count across all tensors.
    pub fn scalar_count(&self) -> usize {
        self.params.iter().map(|p| p.tensor.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedParam> {
        self.params.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NamedParam> {
        self.params.iter_mut()
    }

    /// Look up a tensor by slot name.
    pub fn get(&self, name: &str) -> Option<&ParamTensor> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.tensor)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParamTensor> {
        self.params
            .iter_mut()
            .find(|p| p.name == name)
            .map(|p| &mut p.tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_snapshot_preserves_order() {
        let mut snap = ParamSnapshot::new();
        snap.push("linear_0.weight", ParamTensor::Matrix(Array2::zeros((2, 3))));
        snap.push("linear_0.bias", ParamTensor::Vector(Array1::zeros(2)));
        snap.push("linear_1.weight", ParamTensor::Matrix(Array2::zeros((1, 2))));

        let names: Vec<&str> = snap.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["linear_0.weight", "linear_0.bias", "linear_1.weight"]
        );
        assert_eq!(snap.scalar_count(), 6 + 2 + 2);
    }

    #[test]
    fn test_lookup_by_name() {
        let mut snap = ParamSnapshot::new();
        snap.push(
            "linear_0.weight",
            ParamTensor::Matrix(arr2(&[[1.0, 2.0], [3.0, 4.0]])),
        );

        let tensor = snap.get("linear_0.weight").unwrap();
        assert_eq!(tensor.shape(), vec![2, 2]);
        assert!(snap.get("linear_9.weight").is_none());
    }
}
