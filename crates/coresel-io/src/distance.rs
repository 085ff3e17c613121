//! Reading and writing precomputed distance matrices.

use std::path::Path;

use coresel_core::{CoreselError, DistanceMatrixData, Location, NamedDataset, Result};
use log::{debug, info};
use ndarray::Array2;

use crate::header::{resolve_headers, HeaderLayout, IdentityPolicy, IDENTIFIERS_HEADER, NAMES_HEADER};
use crate::reader::{read_rows, Delimiter, Row};
use crate::dataset_name;
use crate::writer::{check_reloadable, encode_optional, text_writer, write_error};

/// Text encoding of a symmetric matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymmetricMatrixFormat {
    /// Every row holds all n values; the matrix must be symmetric with a zero diagonal.
    Full,
    /// Row i holds the i values strictly below the diagonal.
    Lower,
    /// Row i holds i + 1 values including the diagonal, which must be 0.
    LowerDiag,
}

impl SymmetricMatrixFormat {
    fn values_in_row(self, i: usize, n: usize) -> usize {
        match self {
            Self::Full => n,
            Self::Lower => i,
            Self::LowerDiag => i + 1,
        }
    }
}

/// Distance matrices require an id or a unique name for every item once
/// any header is present.
pub const DISTANCE_IDENTITY_POLICY: IdentityPolicy = IdentityPolicy::Strict;

/// Load a distance matrix from a delimited text file.
///
/// Layout: an optional header row starting with `NAME` (with `ID` in the
/// second cell when an identifier column is present), then one row per item
/// with its name, identifier and distance values as dictated by `format`.
/// Cells of the header row after the header columns are column labels and
/// are not interpreted. The dataset is named after the file.
pub fn load_distance_matrix<P: AsRef<Path>>(
    path: P,
    delimiter: Delimiter,
    format: SymmetricMatrixFormat,
) -> Result<DistanceMatrixData> {
    let path = path.as_ref();
    let rows = read_rows(path, delimiter)?;
    let layout = HeaderLayout::detect(&rows)?;
    let hr = layout.header_rows();
    let hc = layout.header_columns();
    let width = rows[0].len();

    let data_rows = &rows[hr..];
    if data_rows.is_empty() {
        return Err(CoreselError::format("no data rows"));
    }

    let n = match format {
        SymmetricMatrixFormat::Full => {
            if width <= hc {
                return Err(CoreselError::format("no data columns"));
            }
            let n = width - hc;
            if data_rows.len() != n {
                return Err(CoreselError::format(format!(
                    "full matrix with {} columns needs {} data rows, found {}",
                    n,
                    n,
                    data_rows.len()
                )));
            }
            n
        }
        SymmetricMatrixFormat::Lower | SymmetricMatrixFormat::LowerDiag => {
            let n = data_rows.len();
            if layout.name_row {
                if let Some(last) = rows[0].iter().rposition(Option::is_some) {
                    if last >= hc + n {
                        return Err(CoreselError::format_at(
                            Location::cell(0, last),
                            format!("header row has more column labels than the {} items", n),
                        ));
                    }
                }
            }
            n
        }
    };

    let mut distances = Array2::<f64>::zeros((n, n));
    for (i, row) in data_rows.iter().enumerate() {
        let r = hr + i;
        let values = parse_distance_row(row, r, hc, format.values_in_row(i, n))?;
        for (j, d) in values.into_iter().enumerate() {
            let c = hc + j;
            if i == j {
                if d != 0.0 {
                    return Err(CoreselError::format_at(
                        Location::cell(r, c),
                        format!("non-zero diagonal value {}", d),
                    ));
                }
                continue;
            }
            if d < 0.0 {
                return Err(CoreselError::format_at(
                    Location::cell(r, c),
                    format!("negative distance {}", d),
                ));
            }
            match format {
                SymmetricMatrixFormat::Full => distances[(i, j)] = d,
                SymmetricMatrixFormat::Lower | SymmetricMatrixFormat::LowerDiag => {
                    distances[(i, j)] = d;
                    distances[(j, i)] = d;
                }
            }
        }
    }

    if format == SymmetricMatrixFormat::Full {
        for i in 0..n {
            for j in 0..i {
                if distances[(i, j)] != distances[(j, i)] {
                    return Err(CoreselError::format_at(
                        Location::cell(hr + i, hc + j),
                        format!(
                            "non-symmetric distances: d[{}][{}] = {} but d[{}][{}] = {}",
                            i,
                            j,
                            distances[(i, j)],
                            j,
                            i,
                            distances[(j, i)]
                        ),
                    ));
                }
            }
        }
    }

    let headers = resolve_headers(data_rows, hr, layout, DISTANCE_IDENTITY_POLICY)?;
    let data = DistanceMatrixData::new(dataset_name(path), headers, distances)
        .map_err(CoreselError::into_format)?;
    info!(
        "loaded distance matrix '{}' with {} items ({:?})",
        data.dataset_name(),
        n,
        format
    );
    Ok(data)
}

/// Parse the value cells of one data row: exactly `expected` present
/// numbers followed only by blank cells.
fn parse_distance_row(row: &Row, r: usize, hc: usize, expected: usize) -> Result<Vec<f64>> {
    let cells = &row[hc.min(row.len())..];
    if let Some(extra) = cells.iter().skip(expected).position(Option::is_some) {
        return Err(CoreselError::format_at(
            Location::cell(r, hc + expected + extra),
            format!("too many values in row: expected {}", expected),
        ));
    }
    if cells.len() < expected {
        return Err(CoreselError::format_at(
            Location::row(r),
            format!("expected {} values, found {}", expected, cells.len()),
        ));
    }
    cells[..expected]
        .iter()
        .enumerate()
        .map(|(j, cell)| {
            let loc = Location::cell(r, hc + j);
            let s = cell.as_deref().ok_or_else(|| {
                CoreselError::format_at(loc, format!("missing value: expected {} values", expected))
            })?;
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(CoreselError::format_at(
                    loc,
                    format!("invalid distance '{}'", s),
                )),
            }
        })
        .collect()
}

/// Write a distance matrix in full layout.
///
/// When the dataset has headers, `NAME` and `ID` header columns are written
/// and the header row labels each column with the item's identifier. Items
/// without an explicit identifier get a blank id cell, so a uniquely named
/// item reloads with its name doubling as its id. Fails before writing if
/// the headers would not load back (an item with neither name nor id, or
/// duplicate names without ids) or if a name or id contains the delimiter.
pub fn write_distance_matrix<P: AsRef<Path>>(
    path: P,
    data: &DistanceMatrixData,
    delimiter: Delimiter,
) -> Result<()> {
    let path = path.as_ref();
    let n = data.size();
    let with_headers = data.named().has_headers();

    let mut records: Vec<Vec<String>> = Vec::with_capacity(n + 1);
    if with_headers {
        check_reloadable(data.named().headers(), DISTANCE_IDENTITY_POLICY)?;
        let mut header = Vec::with_capacity(n + 2);
        header.push(NAMES_HEADER.to_string());
        header.push(IDENTIFIERS_HEADER.to_string());
        for h in data.named().headers() {
            header.push(encode_optional(h.id(), delimiter)?);
        }
        records.push(header);
    }
    for i in 0..n {
        let mut row = Vec::with_capacity(n + 2);
        if with_headers {
            let h = data.header(i);
            row.push(encode_optional(h.name(), delimiter)?);
            row.push(encode_optional(h.id(), delimiter)?);
        }
        row.extend((0..n).map(|j| data.distance(i, j).to_string()));
        records.push(row);
    }

    let mut wtr = text_writer(path, delimiter)?;
    for record in &records {
        wtr.write_record(record).map_err(|e| write_error(path, e))?;
    }
    wtr.flush().map_err(|e| write_error(path, e))?;
    debug!("wrote distance matrix with {} items to {}", n, path.display());
    Ok(())
}
