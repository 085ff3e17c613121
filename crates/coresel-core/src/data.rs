//! Combined dataset handed to objectives: distances and/or genotypes for the
//! same collection of items.

use std::sync::Arc;

use crate::distance::DistanceMatrixData;
use crate::error::{CoreselError, Result};
use crate::genotype::Genotypes;
use crate::named::{NamedData, NamedDataset};

/// All data available for one germplasm collection.
///
/// Immutable once built; clones share the underlying datasets.
#[derive(Clone, Debug)]
pub struct CoreData {
    distances: Option<Arc<DistanceMatrixData>>,
    genotypes: Option<Arc<Genotypes>>,
}

impl CoreData {
    /// Combine the available data modalities.
    ///
    /// At least one modality is required and all given datasets must
    /// describe the same number of items. If both carry item headers, their
    /// ids must agree item by item.
    pub fn new(
        distances: Option<DistanceMatrixData>,
        genotypes: Option<Genotypes>,
    ) -> Result<Self> {
        match (&distances, &genotypes) {
            (None, None) => {
                return Err(CoreselError::validation(
                    "core data needs distances, genotypes or both",
                ));
            }
            (Some(d), Some(g)) if d.size() != g.size() => {
                return Err(CoreselError::validation(format!(
                    "distance matrix has {} items but genotype data has {}",
                    d.size(),
                    g.size()
                )));
            }
            (Some(d), Some(g)) if d.named().has_headers() && g.named().has_headers() => {
                if let Some(i) = (0..d.size()).find(|&i| d.ids()[i] != g.ids()[i]) {
                    return Err(CoreselError::validation(format!(
                        "item {} is '{}' in the distance matrix but '{}' in the genotype data",
                        i,
                        d.ids()[i],
                        g.ids()[i]
                    )));
                }
            }
            _ => {}
        }
        Ok(Self {
            distances: distances.map(Arc::new),
            genotypes: genotypes.map(Arc::new),
        })
    }

    pub fn with_distances(distances: DistanceMatrixData) -> Self {
        Self {
            distances: Some(Arc::new(distances)),
            genotypes: None,
        }
    }

    pub fn with_genotypes(genotypes: impl Into<Genotypes>) -> Self {
        Self {
            distances: None,
            genotypes: Some(Arc::new(genotypes.into())),
        }
    }

    pub fn distances(&self) -> Option<&DistanceMatrixData> {
        self.distances.as_deref()
    }

    pub fn genotypes(&self) -> Option<&Genotypes> {
        self.genotypes.as_deref()
    }

    /// Distances, or a domain error naming the objective that needs them.
    pub fn require_distances(&self, objective: &str) -> Result<&DistanceMatrixData> {
        self.distances().ok_or_else(|| {
            CoreselError::domain(format!("distances are required for {}", objective))
        })
    }

    /// Genotypes, or a domain error naming the objective that needs them.
    pub fn require_genotypes(&self, objective: &str) -> Result<&Genotypes> {
        self.genotypes().ok_or_else(|| {
            CoreselError::domain(format!("genotypes are required for {}", objective))
        })
    }
}

/// Identity of the combined data: the dataset with item headers, distances
/// first.
impl NamedDataset for CoreData {
    fn named(&self) -> &NamedData {
        match (&self.distances, &self.genotypes) {
            (Some(d), Some(g)) if !d.named().has_headers() && g.named().has_headers() => {
                g.named()
            }
            (Some(d), _) => d.named(),
            (None, Some(g)) => g.named(),
            (None, None) => unreachable!("core data without any modality"),
        }
    }
}
