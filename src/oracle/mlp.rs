//! Multilayer-perceptron link oracle.
//!
//! Inference-only port of the trained multilabel link classifier:
//! `[emb_u ‖ emb_v] -> Linear -> BatchNorm -> ReLU -> Linear -> BatchNorm -> ReLU -> Linear -> sigmoid`.
//! BatchNorm runs in evaluation mode with the exported running statistics.

use ndarray::{concatenate, Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::EdgeOracle;
use crate::error::{ClassforgeError, Result};

fn default_bn_eps() -> f32 {
    1e-5
}

/// Exported `nn.Linear` parameters; `weight` is `out x in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseWeights {
    pub weight: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

/// Exported `nn.BatchNorm1d` parameters and running statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchNormWeights {
    pub gamma: Vec<f32>,
    pub beta: Vec<f32>,
    pub running_mean: Vec<f32>,
    pub running_var: Vec<f32>,
    #[serde(default = "default_bn_eps")]
    pub eps: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpWeights {
    pub fc1: DenseWeights,
    pub bn1: BatchNormWeights,
    pub fc2: DenseWeights,
    pub bn2: BatchNormWeights,
    pub out: DenseWeights,
}

#[derive(Debug, Clone)]
struct Dense {
    weight: Array2<f32>,
    bias: Array1<f32>,
}

impl Dense {
    fn from_weights(name: &str, w: &DenseWeights) -> Result<Self> {
        let out_dim = w.weight.len();
        let in_dim = w.weight.first().map(|r| r.len()).unwrap_or(0);
        if w.bias.len() != out_dim {
            return Err(layer_error(name, out_dim, w.bias.len()));
        }
        let mut flat = Vec::with_capacity(out_dim * in_dim);
        for row in &w.weight {
            if row.len() != in_dim {
                return Err(layer_error(name, in_dim, row.len()));
            }
            flat.extend_from_slice(row);
        }
        let weight = Array2::from_shape_vec((out_dim, in_dim), flat)
            .map_err(|e| ClassforgeError::Oracle(format!("{}: {}", name, e)))?;
        Ok(Self {
            weight,
            bias: Array1::from(w.bias.clone()),
        })
    }

    fn in_dim(&self) -> usize {
        self.weight.ncols()
    }

    fn out_dim(&self) -> usize {
        self.weight.nrows()
    }

    fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        x.dot(&self.weight.t()) + &self.bias
    }
}

/// BatchNorm folded into a per-feature affine map.
#[derive(Debug, Clone)]
struct Norm {
    scale: Array1<f32>,
    shift: Array1<f32>,
}

impl Norm {
    fn from_weights(name: &str, w: &BatchNormWeights, dim: usize) -> Result<Self> {
        for len in [w.gamma.len(), w.beta.len(), w.running_mean.len(), w.running_var.len()] {
            if len != dim {
                return Err(layer_error(name, dim, len));
            }
        }
        let scale: Array1<f32> = w
            .gamma
            .iter()
            .zip(&w.running_var)
            .map(|(g, var)| g / (var + w.eps).sqrt())
            .collect();
        let shift: Array1<f32> = w
            .beta
            .iter()
            .zip(&w.running_mean)
            .zip(scale.iter())
            .map(|((b, mean), s)| b - mean * s)
            .collect();
        Ok(Self { scale, shift })
    }

    fn forward(&self, x: Array2<f32>) -> Array2<f32> {
        x * &self.scale + &self.shift
    }
}

fn layer_error(name: &str, expected: usize, actual: usize) -> ClassforgeError {
    ClassforgeError::Oracle(format!(
        "layer {}: dimension mismatch (expected {}, got {})",
        name, expected, actual
    ))
}

fn relu(mut x: Array2<f32>) -> Array2<f32> {
    x.mapv_inplace(|v| v.max(0.0));
    x
}

fn sigmoid(mut x: Array2<f32>) -> Array2<f32> {
    x.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp()));
    x
}

/// Trained link classifier over concatenated pair embeddings.
#[derive(Debug, Clone)]
pub struct MlpLinkOracle {
    fc1: Dense,
    bn1: Norm,
    fc2: Dense,
    bn2: Norm,
    out: Dense,
}

impl MlpLinkOracle {
    pub fn from_weights(weights: &MlpWeights) -> Result<Self> {
        let fc1 = Dense::from_weights("fc1", &weights.fc1)?;
        let bn1 = Norm::from_weights("bn1", &weights.bn1, fc1.out_dim())?;
        let fc2 = Dense::from_weights("fc2", &weights.fc2)?;
        if fc2.in_dim() != fc1.out_dim() {
            return Err(layer_error("fc2", fc1.out_dim(), fc2.in_dim()));
        }
        let bn2 = Norm::from_weights("bn2", &weights.bn2, fc2.out_dim())?;
        let out = Dense::from_weights("out", &weights.out)?;
        if out.in_dim() != fc2.out_dim() {
            return Err(layer_error("out", fc2.out_dim(), out.in_dim()));
        }
        if fc1.in_dim() % 2 != 0 {
            return Err(ClassforgeError::Oracle(format!(
                "input width {} is not a concatenated pair",
                fc1.in_dim()
            )));
        }
        Ok(Self { fc1, bn1, fc2, bn2, out })
    }

    /// Loads exported weights from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let weights: MlpWeights = serde_json::from_str(&content)?;
        let oracle = Self::from_weights(&weights)?;
        info!(
            "Loaded link oracle from {:?} (embedding dim {}, {} relations)",
            path,
            oracle.embedding_dim(),
            oracle.output_dim()
        );
        Ok(oracle)
    }

    pub fn embedding_dim(&self) -> usize {
        self.fc1.in_dim() / 2
    }

    pub fn output_dim(&self) -> usize {
        self.out.out_dim()
    }

    fn check_dim(&self, actual: usize) -> Result<()> {
        if actual != self.embedding_dim() {
            return Err(ClassforgeError::DimensionMismatch {
                expected: self.embedding_dim(),
                actual,
            });
        }
        Ok(())
    }

    fn forward(&self, input: &Array2<f32>) -> Array2<f32> {
        let h = relu(self.bn1.forward(self.fc1.forward(input)));
        let h = relu(self.bn2.forward(self.fc2.forward(&h)));
        sigmoid(self.out.forward(&h))
    }
}

impl EdgeOracle for MlpLinkOracle {
    fn probabilities(&self, u: ArrayView1<'_, f32>, v: ArrayView1<'_, f32>) -> Result<Vec<f32>> {
        self.check_dim(u.len())?;
        self.check_dim(v.len())?;
        let input = concatenate(Axis(0), &[u.view(), v.view()])
            .map_err(|e| ClassforgeError::Oracle(e.to_string()))?
            .insert_axis(Axis(0));
        Ok(self.forward(&input).row(0).to_vec())
    }

    fn probabilities_batch(&self, source: ArrayView1<'_, f32>, targets: ArrayView2<'_, f32>) -> Result<Vec<Vec<f32>>> {
        self.check_dim(source.len())?;
        self.check_dim(targets.ncols())?;
        let n = targets.nrows();
        let repeated = source
            .broadcast((n, source.len()))
            .ok_or_else(|| ClassforgeError::Oracle("cannot broadcast source embedding".to_string()))?;
        let input = concatenate(Axis(1), &[repeated.view(), targets.view()])
            .map_err(|e| ClassforgeError::Oracle(e.to_string()))?;
        Ok(self.forward(&input).outer_iter().map(|row| row.to_vec()).collect())
    }
}
