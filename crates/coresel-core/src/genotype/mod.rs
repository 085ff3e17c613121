//! Marker-based genotype panels.
//!
//! - `biallelic`: 0/1/2 allele scores, two alleles per marker.
//! - `multiallelic`: per-marker allele frequency vectors, any number of alleles.
//!
//! Both expose allele frequencies through [`GenotypeData`]; a missing
//! observation is `None`, never a sentinel number.

pub mod biallelic;
pub mod multiallelic;

pub use biallelic::BiallelicGenotypeData;
pub use multiallelic::MultiAllelicGenotypeData;

use crate::named::{NamedData, NamedDataset};

/// Frequencies within this distance of 1.0 are accepted as summing to one.
pub const FREQUENCY_SUM_TOLERANCE: f64 = 1e-6;

/// Allele frequency access shared by both genotype representations.
pub trait GenotypeData: NamedDataset {
    fn number_of_markers(&self) -> usize;

    /// Panics if `marker` is out of range.
    fn number_of_alleles(&self, marker: usize) -> usize;

    fn total_number_of_alleles(&self) -> usize {
        (0..self.number_of_markers())
            .map(|m| self.number_of_alleles(m))
            .sum()
    }

    fn marker_name(&self, marker: usize) -> Option<&str>;

    fn allele_name(&self, marker: usize, allele: usize) -> Option<&str>;

    /// Frequency of `allele` at `marker` in item `item`; `None` if missing.
    fn allele_frequency(&self, item: usize, marker: usize, allele: usize) -> Option<f64>;

    /// Whether `item` has an observation at `marker`. Missing observations
    /// cover every allele of the marker at once.
    fn is_observed(&self, item: usize, marker: usize) -> bool {
        self.allele_frequency(item, marker, 0).is_some()
    }
}

/// Either genotype representation, as held by a combined dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum Genotypes {
    Biallelic(BiallelicGenotypeData),
    MultiAllelic(MultiAllelicGenotypeData),
}

impl Genotypes {
    fn inner(&self) -> &dyn GenotypeData {
        match self {
            Self::Biallelic(g) => g,
            Self::MultiAllelic(g) => g,
        }
    }
}

impl From<BiallelicGenotypeData> for Genotypes {
    fn from(data: BiallelicGenotypeData) -> Self {
        Self::Biallelic(data)
    }
}

impl From<MultiAllelicGenotypeData> for Genotypes {
    fn from(data: MultiAllelicGenotypeData) -> Self {
        Self::MultiAllelic(data)
    }
}

impl NamedDataset for Genotypes {
    fn named(&self) -> &NamedData {
        self.inner().named()
    }
}

impl GenotypeData for Genotypes {
    fn number_of_markers(&self) -> usize {
        self.inner().number_of_markers()
    }

    fn number_of_alleles(&self, marker: usize) -> usize {
        self.inner().number_of_alleles(marker)
    }

    fn total_number_of_alleles(&self) -> usize {
        self.inner().total_number_of_alleles()
    }

    fn marker_name(&self, marker: usize) -> Option<&str> {
        self.inner().marker_name(marker)
    }

    fn allele_name(&self, marker: usize, allele: usize) -> Option<&str> {
        self.inner().allele_name(marker, allele)
    }

    fn allele_frequency(&self, item: usize, marker: usize, allele: usize) -> Option<f64> {
        self.inner().allele_frequency(item, marker, allele)
    }

    fn is_observed(&self, item: usize, marker: usize) -> bool {
        self.inner().is_observed(item, marker)
    }
}
