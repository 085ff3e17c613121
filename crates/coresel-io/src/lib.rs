//! coresel-io: text file I/O for coresel datasets.
//!
//! - `reader`: delimited text rows with trimmed, unquoted, padded cells
//! - `header`: `NAME`/`ID` header detection and item identity resolution
//! - `distance`: distance matrices in full, lower and lower-with-diagonal layout
//! - `genotype`: biallelic score matrices and multiallelic frequency tables
//! - `writer`: cell encoding that the reader reads back unchanged
//!
//! Every loader either returns a fully validated dataset or a format error;
//! partially built datasets are never exposed.

pub mod distance;
pub mod genotype;
pub mod header;
pub mod reader;
mod writer;

use std::path::Path;

pub use distance::{load_distance_matrix, write_distance_matrix, SymmetricMatrixFormat};
pub use genotype::{load_biallelic, load_multiallelic, write_biallelic};
pub use header::{HeaderLayout, IdentityPolicy, IDENTIFIERS_HEADER, NAMES_HEADER};
pub use reader::{read_rows, Delimiter, Row};

/// Datasets read from a file are named after the file.
pub(crate) fn dataset_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
