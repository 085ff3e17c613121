//! Precomputed symmetric distance matrix between items.

use ndarray::Array2;

use crate::error::{CoreselError, Result};
use crate::identity::ItemHeader;
use crate::named::{NamedData, NamedDataset};

pub const DEFAULT_DISTANCE_DATASET_NAME: &str = "Precomputed distance matrix";

/// Symmetric n×n distance matrix with a zero diagonal and non-negative entries.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrixData {
    named: NamedData,
    /// shape: (n_items, n_items)
    distances: Array2<f64>,
}

impl DistanceMatrixData {
    /// Create a distance matrix dataset.
    ///
    /// The matrix must be square, non-empty, symmetric, have a zero diagonal
    /// and non-negative off-diagonal values. Headers are optional; if given,
    /// there must be one per item.
    pub fn new(
        name: impl Into<String>,
        headers: Option<Vec<ItemHeader>>,
        distances: Array2<f64>,
    ) -> Result<Self> {
        let (n, cols) = distances.dim();
        if n != cols {
            return Err(CoreselError::validation(format!(
                "distance matrix is not square: {} rows, {} columns",
                n, cols
            )));
        }
        let named = NamedData::new(name, n, headers)?;

        for i in 0..n {
            let d = distances[(i, i)];
            if d != 0.0 {
                return Err(CoreselError::validation(format!(
                    "non-zero diagonal value {} for item {}",
                    d, i
                )));
            }
            for j in 0..i {
                let d = distances[(i, j)];
                if !d.is_finite() || d < 0.0 {
                    return Err(CoreselError::validation(format!(
                        "invalid distance {} between items {} and {} (must be finite and non-negative)",
                        d, i, j
                    )));
                }
                if distances[(j, i)] != d {
                    return Err(CoreselError::validation(format!(
                        "non-symmetric distances between items {} and {}: {} vs {}",
                        i,
                        j,
                        d,
                        distances[(j, i)]
                    )));
                }
            }
        }

        Ok(Self { named, distances })
    }

    /// Create a dataset with the default name and no headers.
    pub fn from_matrix(distances: Array2<f64>) -> Result<Self> {
        Self::new(DEFAULT_DISTANCE_DATASET_NAME, None, distances)
    }

    /// Distance between items `i` and `j`. Panics if either index is out of range.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances[(i, j)]
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.distances
    }
}

impl NamedDataset for DistanceMatrixData {
    fn named(&self) -> &NamedData {
        &self.named
    }
}
