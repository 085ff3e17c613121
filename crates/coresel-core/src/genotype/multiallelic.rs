//! Multiallelic genotypes stored as per-marker allele frequency matrices.
//!
//! Each marker has its own allele count; an item is either observed at a
//! marker (a full frequency vector summing to one) or missing there.

use ndarray::Array2;

use super::{GenotypeData, FREQUENCY_SUM_TOLERANCE};
use crate::error::{CoreselError, Result};
use crate::identity::ItemHeader;
use crate::named::{NamedData, NamedDataset};

pub const DEFAULT_MULTIALLELIC_DATASET_NAME: &str = "Multiallelic marker data";

/// Per-item allele frequency vectors for markers with any number of alleles.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiAllelicGenotypeData {
    named: NamedData,
    /// One matrix per marker, shape (n_items, n_alleles(marker)).
    /// A missing observation is a row of `None`.
    frequencies: Vec<Array2<Option<f64>>>,
    marker_names: Vec<Option<String>>,
    allele_names: Vec<Vec<Option<String>>>,
}

impl MultiAllelicGenotypeData {
    /// Create multiallelic genotype data.
    ///
    /// `frequencies[i][m]` is the allele frequency vector of item `i` at
    /// marker `m`, or `None` if missing. Present vectors hold values in [0, 1]
    /// summing to one, and all vectors of a marker have the same length.
    /// The number of alleles of a marker comes from `allele_names` when given,
    /// otherwise from its first observed vector.
    pub fn new(
        name: impl Into<String>,
        headers: Option<Vec<ItemHeader>>,
        marker_names: Option<Vec<Option<String>>>,
        allele_names: Option<Vec<Vec<Option<String>>>>,
        frequencies: Vec<Vec<Option<Vec<f64>>>>,
    ) -> Result<Self> {
        let n = frequencies.len();
        if n == 0 {
            return Err(CoreselError::validation("no data (zero rows)"));
        }
        let m = frequencies[0].len();
        if m == 0 {
            return Err(CoreselError::validation("no markers (zero columns)"));
        }
        if let Some(i) = frequencies.iter().position(|row| row.len() != m) {
            return Err(CoreselError::validation(format!(
                "incorrect number of markers for item {}: expected {}, got {}",
                i,
                m,
                frequencies[i].len()
            )));
        }
        let named = NamedData::new(name, n, headers)?;

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

        if let Some(names) = &allele_names {
            if names.len() != m {
                return Err(CoreselError::validation(format!(
                    "incorrect number of allele name lists: expected {}, got {}",
                    m,
                    names.len()
                )));
            }
        }

        let mut marker_freqs = Vec::with_capacity(m);
        let mut resolved_allele_names = Vec::with_capacity(m);
        for j in 0..m {
            let n_alleles = match &allele_names {
                Some(names) => names[j].len(),
                None => frequencies
                    .iter()
                    .find_map(|row| row[j].as_ref().map(Vec::len))
                    .ok_or_else(|| {
                        CoreselError::validation(format!(
                            "cannot infer number of alleles for marker {}: no observed values and no allele names",
                            j
                        ))
                    })?,
            };
            if n_alleles == 0 {
                return Err(CoreselError::validation(format!(
                    "marker {} has no alleles",
                    j
                )));
            }

            let mut freqs = Array2::from_elem((n, n_alleles), None);
            for (i, row) in frequencies.iter().enumerate() {
                if let Some(values) = &row[j] {
                    validate_frequencies(i, j, n_alleles, values)?;
                    for (a, &f) in values.iter().enumerate() {
                        freqs[(i, a)] = Some(f);
                    }
                }
            }
            marker_freqs.push(freqs);
            resolved_allele_names.push(match &allele_names {
                Some(names) => names[j].clone(),
                None => vec![None; n_alleles],
            });
        }

        Ok(Self {
            named,
            frequencies: marker_freqs,
            marker_names,
            allele_names: resolved_allele_names,
        })
    }
}

fn validate_frequencies(item: usize, marker: usize, expected: usize, values: &[f64]) -> Result<()> {
    if values.len() != expected {
        return Err(CoreselError::validation(format!(
            "incorrect number of alleles for item {} at marker {}: expected {}, got {}",
            item,
            marker,
            expected,
            values.len()
        )));
    }
    if let Some(f) = values
        .iter()
        .find(|f| !f.is_finite() || **f < 0.0 || **f > 1.0)
    {
        return Err(CoreselError::validation(format!(
            "allele frequency {} for item {} at marker {} is outside [0, 1]",
            f, item, marker
        )));
    }
    let sum: f64 = values.iter().sum();
    if (sum - 1.0).abs() > FREQUENCY_SUM_TOLERANCE {
        return Err(CoreselError::validation(format!(
            "allele frequencies for item {} at marker {} sum to {} instead of 1",
            item, marker, sum
        )));
    }
    Ok(())
}

impl NamedDataset for MultiAllelicGenotypeData {
    fn named(&self) -> &NamedData {
        &self.named
    }
}

impl GenotypeData for MultiAllelicGenotypeData {
    fn number_of_markers(&self) -> usize {
        self.frequencies.len()
    }

    fn number_of_alleles(&self, marker: usize) -> usize {
        self.frequencies[marker].ncols()
    }

    fn marker_name(&self, marker: usize) -> Option<&str> {
        self.marker_names[marker].as_deref()
    }

    fn allele_name(&self, marker: usize, allele: usize) -> Option<&str> {
        self.allele_names[marker].get(allele)?.as_deref()
    }

    fn allele_frequency(&self, item: usize, marker: usize, allele: usize) -> Option<f64> {
        self.frequencies[marker][(item, allele)]
    }

    fn is_observed(&self, item: usize, marker: usize) -> bool {
        self.frequencies[marker][(item, 0)].is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn example() -> MultiAllelicGenotypeData {
        MultiAllelicGenotypeData::new(
            DEFAULT_MULTIALLELIC_DATASET_NAME,
            None,
            Some(vec![Some("mk1".into()), Some("mk2".into())]),
            Some(vec![
                vec![Some("A".into()), Some("C".into()), Some("G".into())],
                vec![Some("x".into()), None],
            ]),
            vec![
                vec![Some(vec![0.5, 0.5, 0.0]), Some(vec![1.0, 0.0])],
                vec![None, Some(vec![0.3, 0.7])],
            ],
        )
        .unwrap()
    }

    #[test]
    fn allele_counts_vary_per_marker() {
        let geno = example();
        assert_eq!(geno.number_of_markers(), 2);
        assert_eq!(geno.number_of_alleles(0), 3);
        assert_eq!(geno.number_of_alleles(1), 2);
        assert_eq!(geno.total_number_of_alleles(), 5);
        assert_eq!(geno.allele_name(0, 2), Some("G"));
        assert_eq!(geno.allele_name(1, 1), None);
        assert_eq!(geno.marker_name(1), Some("mk2"));
    }

    #[test]
    fn missing_cells_are_none() {
        let geno = example();
        assert!(!geno.is_observed(1, 0));
        for a in 0..3 {
            assert_eq!(geno.allele_frequency(1, 0, a), None);
        }
        assert_relative_eq!(geno.allele_frequency(1, 1, 1).unwrap(), 0.7);
    }

    #[test]
    fn infers_allele_count_from_observations() {
        let geno = MultiAllelicGenotypeData::new(
            "g",
            None,
            None,
            None,
            vec![vec![None], vec![Some(vec![0.25, 0.25, 0.5])]],
        )
        .unwrap();
        assert_eq!(geno.number_of_alleles(0), 3);
        assert_eq!(geno.allele_name(0, 0), None);
    }

    #[test]
    fn rejects_invalid_frequencies() {
        let bad_sum = vec![vec![Some(vec![0.5, 0.4])]];
        assert!(MultiAllelicGenotypeData::new("g", None, None, None, bad_sum).is_err());

        let out_of_range = vec![vec![Some(vec![1.5, -0.5])]];
        assert!(MultiAllelicGenotypeData::new("g", None, None, None, out_of_range).is_err());

        let ragged_alleles = vec![vec![Some(vec![1.0, 0.0])], vec![Some(vec![1.0])]];
        assert!(MultiAllelicGenotypeData::new("g", None, None, None, ragged_alleles).is_err());

        let ragged_markers = vec![vec![Some(vec![1.0])], vec![]];
        assert!(MultiAllelicGenotypeData::new("g", None, None, None, ragged_markers).is_err());

        let unobserved = vec![vec![None], vec![None]];
        let err = MultiAllelicGenotypeData::new("g", None, None, None, unobserved).unwrap_err();
        assert!(err.is_validation());
    }
}
