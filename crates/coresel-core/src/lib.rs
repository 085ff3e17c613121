//! coresel-core: shared data structures for core collection selection.
//!
//! ## Module Organization
//! - `error`: error tiers (validation, format, domain)
//! - `identity`: per-item headers and id-set keys
//! - `named`: dataset name, size and headers shared by every dataset kind
//! - `distance`: symmetric distance matrix
//! - `genotype`: biallelic and multiallelic genotype panels
//! - `data`: combined dataset evaluated by objectives
//! - `selection`: candidate subset capability

pub mod data;
pub mod distance;
pub mod error;
pub mod genotype;
pub mod identity;
pub mod named;
pub mod selection;

pub use data::CoreData;
pub use distance::{DistanceMatrixData, DEFAULT_DISTANCE_DATASET_NAME};
pub use error::{CoreselError, Location, Result};
pub use genotype::{
    biallelic::DEFAULT_BIALLELIC_DATASET_NAME, multiallelic::DEFAULT_MULTIALLELIC_DATASET_NAME,
    BiallelicGenotypeData, GenotypeData, Genotypes, MultiAllelicGenotypeData,
    FREQUENCY_SUM_TOLERANCE,
};
pub use identity::{ItemHeader, ItemKey};
pub use named::{NamedData, NamedDataset};
pub use selection::{sorted_indices, Selection};
