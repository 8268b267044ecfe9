//! Sparse fixed-dimension vectors used as classifier inputs.

use serde::{Deserialize, Serialize};

/// Fixed-length numeric vector stored as sorted `(index, value)` pairs.
///
/// Indices are strictly increasing and below `dim`; absent indices are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// All-zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from unsorted `(index, value)` pairs, summing duplicates.
    ///
    /// Entries outside `dim` and explicit zeros are dropped.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.retain(|&(idx, value)| (idx as usize) < dim && value != 0.0);
        pairs.sort_unstable_by_key(|&(idx, _)| idx);
        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            if indices.last() == Some(&idx) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(idx);
                values.push(value);
            }
        }
        Self {
            dim,
            indices,
            values,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices
            .iter()
            .zip(self.values.iter())
            .map(|(&idx, &value)| (idx as usize, value))
    }

    /// Dot product with a dense vector of the same dimension.
    pub fn dot(&self, dense: &[f32]) -> f32 {
        self.iter()
            .map(|(idx, value)| dense.get(idx).copied().unwrap_or(0.0) * value)
            .sum()
    }

    pub fn to_dense(&self) -> Vec<f32> {
        let mut out = vec![0.0f32; self.dim];
        for (idx, value) in self.iter() {
            out[idx] = value;
        }
        out
    }

    pub fn l1_norm(&self) -> f32 {
        self.values.iter().map(|v| v.abs()).sum()
    }

    pub fn l2_norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    pub fn max_abs(&self) -> f32 {
        self.values.iter().fold(0.0f32, |acc, v| acc.max(v.abs()))
    }

    /// Multiply every entry by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for value in &mut self.values {
            *value *= factor;
        }
    }
}
