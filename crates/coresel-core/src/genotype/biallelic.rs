//! Biallelic genotypes stored as 0/1/2 allele scores.

use ndarray::Array2;

use super::GenotypeData;
use crate::error::{CoreselError, Result};
use crate::identity::ItemHeader;
use crate::named::{NamedData, NamedDataset};

pub const DEFAULT_BIALLELIC_DATASET_NAME: &str = "Biallelic marker data";

const ALLELE_NAMES: [&str; 2] = ["0", "1"];

/// Biallelic allele score matrix: items × markers, entries 0, 1, 2 or missing.
///
/// A score counts copies of allele 1, so the frequency of allele 1 is
/// `score / 2` and that of allele 0 is `1 - score / 2`.
#[derive(Clone, Debug, PartialEq)]
pub struct BiallelicGenotypeData {
    named: NamedData,
    /// shape: (n_items, n_markers)
    scores: Array2<Option<u8>>,
    marker_names: Vec<Option<String>>,
}

impl BiallelicGenotypeData {
    /// Create biallelic genotype data.
    ///
    /// `scores` must have at least one row and one column, with every
    /// present value in {0, 1, 2}. `marker_names`, if given, needs one entry
    /// per marker; individual entries may be `None`.
    pub fn new(
        name: impl Into<String>,
        headers: Option<Vec<ItemHeader>>,
        marker_names: Option<Vec<Option<String>>>,
        scores: Array2<Option<u8>>,
    ) -> Result<Self> {
        let (n, m) = scores.dim();
        if n == 0 {
            return Err(CoreselError::validation("no data (zero rows)"));
        }
        if m == 0 {
            return Err(CoreselError::validation("no markers (zero columns)"));
        }
        let named = NamedData::new(name, n, headers)?;

        if let Some(((i, j), s)) = scores
            .indexed_iter()
            .find_map(|(ij, s)| s.filter(|&v| v > 2).map(|v| (ij, v)))
        {
            return Err(CoreselError::validation(format!(
                "unexpected allele score {} for item {} and marker {} (allowed: 0, 1, 2)",
                s, i, j
            )));
        }

        let marker_names = match marker_names {
            Some(names) if names.len() != m => {
                return Err(CoreselError::validation(format!(
                    "incorrect number of marker names: expected {}, got {}",
                    m,
                    names.len()
                )));
            }
            Some(names) => names,
            None => vec![None; m],
        };

        Ok(Self {
            named,
            scores,
            marker_names,
        })
    }

    /// Allele score of `item` at `marker`; `None` if missing.
    pub fn allele_score(&self, item: usize, marker: usize) -> Option<u8> {
        self.scores[(item, marker)]
    }

    pub fn scores(&self) -> &Array2<Option<u8>> {
        &self.scores
    }
}

impl NamedDataset for BiallelicGenotypeData {
    fn named(&self) -> &NamedData {
        &self.named
    }
}

impl GenotypeData for BiallelicGenotypeData {
    fn number_of_markers(&self) -> usize {
        self.scores.ncols()
    }

    fn number_of_alleles(&self, marker: usize) -> usize {
        assert!(marker < self.number_of_markers(), "invalid marker index: {}", marker);
        2
    }

    fn total_number_of_alleles(&self) -> usize {
        2 * self.number_of_markers()
    }

    fn marker_name(&self, marker: usize) -> Option<&str> {
        self.marker_names[marker].as_deref()
    }

    fn allele_name(&self, marker: usize, allele: usize) -> Option<&str> {
        assert!(marker < self.number_of_markers(), "invalid marker index: {}", marker);
        ALLELE_NAMES.get(allele).copied()
    }

    fn allele_frequency(&self, item: usize, marker: usize, allele: usize) -> Option<f64> {
        assert!(allele < 2, "invalid allele index: {}", allele);
        let f = f64::from(self.scores[(item, marker)]?) / 2.0;
        Some(if allele == 1 { f } else { 1.0 - f })
    }
}
