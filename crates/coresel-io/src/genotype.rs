//! Reading and writing genotype panels.
//!
//! Biallelic files hold one row per item and one column per marker with
//! allele scores 0, 1 or 2 (blank for missing). Multiallelic files hold one
//! column per allele; consecutive columns sharing a marker name in the `NAME`
//! header row belong to the same marker, and an optional second header row
//! starting with `ALLELE` names the alleles.

use std::path::Path;

use coresel_core::{
    BiallelicGenotypeData, CoreselError, GenotypeData, ItemHeader, Location,
    MultiAllelicGenotypeData, NamedDataset, Result,
};
use log::{debug, info};
use ndarray::Array2;

use crate::dataset_name;
use crate::header::{resolve_headers, HeaderLayout, IdentityPolicy, IDENTIFIERS_HEADER, NAMES_HEADER};
use crate::reader::{read_rows, Delimiter, Row};
use crate::writer::{check_reloadable, encode_optional, text_writer, write_error};

pub const ALLELE_HEADER: &str = "ALLELE";

/// Genotype panels tolerate items with neither name nor id.
pub const GENOTYPE_IDENTITY_POLICY: IdentityPolicy = IdentityPolicy::Lenient;

/// Load a biallelic 0/1/2 allele score matrix.
///
/// An optional `NAME` header row provides marker names (blank for unnamed
/// markers) and an optional `ID` column provides item identifiers.
pub fn load_biallelic<P: AsRef<Path>>(path: P, delimiter: Delimiter) -> Result<BiallelicGenotypeData> {
    let path = path.as_ref();
    let rows = read_rows(path, delimiter)?;
    let layout = HeaderLayout::detect(&rows)?;
    let hr = layout.header_rows();
    let hc = layout.header_columns();

    let data_rows = &rows[hr..];
    let n = data_rows.len();
    if n == 0 {
        return Err(CoreselError::format("no data rows"));
    }
    let width = rows[0].len();
    if width <= hc {
        return Err(CoreselError::format("no data columns"));
    }
    let m = width - hc;

    let marker_names = layout.name_row.then(|| rows[0][hc..].to_vec());

    let mut scores = Array2::<Option<u8>>::from_elem((n, m), None);
    for (i, row) in data_rows.iter().enumerate() {
        for (j, cell) in row[hc..].iter().enumerate() {
            if let Some(s) = cell {
                let loc = Location::cell(hr + i, hc + j);
                let score = s.parse::<i64>().map_err(|_| {
                    CoreselError::format_at(
                        loc,
                        format!("invalid allele score '{}': expected 0, 1 or 2", s),
                    )
                })?;
                if !(0..=2).contains(&score) {
                    return Err(CoreselError::format_at(
                        loc,
                        format!("unexpected allele score {} (allowed: 0, 1, 2)", score),
                    ));
                }
                scores[(i, j)] = Some(score as u8);
            }
        }
    }

    let headers = resolve_headers(data_rows, hr, layout, GENOTYPE_IDENTITY_POLICY)?;
    let data = BiallelicGenotypeData::new(dataset_name(path), headers, marker_names, scores)
        .map_err(CoreselError::into_format)?;
    info!(
        "loaded biallelic genotypes '{}': {} items x {} markers",
        data.dataset_name(),
        n,
        m
    );
    Ok(data)
}

/// Column span of one marker in a multiallelic file.
struct MarkerColumns {
    name: String,
    start: usize,
    len: usize,
}

fn group_marker_columns(header: &Row, hc: usize) -> Result<Vec<MarkerColumns>> {
    let mut markers: Vec<MarkerColumns> = Vec::new();
    for (c, cell) in header.iter().enumerate().skip(hc) {
        let name = cell.as_deref().ok_or_else(|| {
            CoreselError::format_at(Location::cell(0, c), "missing marker name for allele column")
        })?;
        match markers.last_mut() {
            Some(last) if last.name == name => last.len += 1,
            _ => markers.push(MarkerColumns {
                name: name.to_string(),
                start: c,
                len: 1,
            }),
        }
    }
    Ok(markers)
}

/// Load multiallelic allele frequency data.
///
/// The `NAME` header row is mandatory since it assigns allele columns to
/// markers. Per item and marker, either all allele cells are blank (missing)
/// or all hold frequencies that sum to one.
pub fn load_multiallelic<P: AsRef<Path>>(
    path: P,
    delimiter: Delimiter,
) -> Result<MultiAllelicGenotypeData> {
    let path = path.as_ref();
    let rows = read_rows(path, delimiter)?;
    let layout = HeaderLayout::detect(&rows)?;
    if !layout.name_row {
        return Err(CoreselError::format_at(
            Location::cell(0, 0),
            format!(
                "multiallelic data needs a '{}' header row with marker names",
                NAMES_HEADER
            ),
        ));
    }
    let hc = layout.header_columns();
    let markers = group_marker_columns(&rows[0], hc)?;
    if markers.is_empty() {
        return Err(CoreselError::format("no data columns"));
    }

    let with_allele_row =
        rows.get(1).and_then(|r| r.first()).and_then(|c| c.as_deref()) == Some(ALLELE_HEADER);
    let hr = if with_allele_row { 2 } else { 1 };
    debug!(
        "multiallelic layout: {} markers, allele name row: {}",
        markers.len(),
        with_allele_row
    );

    let data_rows = &rows[hr..];
    if data_rows.is_empty() {
        return Err(CoreselError::format("no data rows"));
    }

    let allele_names = if with_allele_row {
        Some(
            markers
                .iter()
                .map(|mk| rows[1][mk.start..mk.start + mk.len].to_vec())
                .collect::<Vec<_>>(),
        )
    } else {
        // allele count per marker is fixed by the header, even for unobserved markers
        Some(markers.iter().map(|mk| vec![None; mk.len]).collect::<Vec<_>>())
    };

    let mut frequencies = Vec::with_capacity(data_rows.len());
    for (i, row) in data_rows.iter().enumerate() {
        let r = hr + i;
        let mut item = Vec::with_capacity(markers.len());
        for mk in &markers {
            let cells = &row[mk.start..mk.start + mk.len];
            if cells.iter().all(Option::is_none) {
                item.push(None);
                continue;
            }
            if let Some(k) = cells.iter().position(Option::is_none) {
                return Err(CoreselError::format_at(
                    Location::cell(r, mk.start + k),
                    format!(
                        "incomplete allele frequencies for marker '{}': blank cells are only allowed for all alleles at once",
                        mk.name
                    ),
                ));
            }
            let values = cells
                .iter()
                .enumerate()
                .map(|(k, cell)| {
                    let s = cell.as_deref().unwrap_or_default();
                    s.parse::<f64>().map_err(|_| {
                        CoreselError::format_at(
                            Location::cell(r, mk.start + k),
                            format!("invalid allele frequency '{}'", s),
                        )
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            item.push(Some(values));
        }
        frequencies.push(item);
    }

    let headers = resolve_headers(data_rows, hr, layout, GENOTYPE_IDENTITY_POLICY)?;
    let marker_names = markers.iter().map(|mk| Some(mk.name.clone())).collect();
    let data = MultiAllelicGenotypeData::new(
        dataset_name(path),
        headers,
        Some(marker_names),
        allele_names,
        frequencies,
    )
    .map_err(CoreselError::into_format)?;
    info!(
        "loaded multiallelic genotypes '{}': {} items x {} markers ({} alleles)",
        data.dataset_name(),
        data.size(),
        data.number_of_markers(),
        data.total_number_of_alleles()
    );
    Ok(data)
}

/// Write biallelic data with `NAME` and `ID` header columns and a header row
/// of marker names.
///
/// Items without an explicit identifier get a blank id cell. Fails before
/// writing if the item headers would not load back (duplicate names without
/// ids) or if a name, id or marker name contains the delimiter.
pub fn write_biallelic<P: AsRef<Path>>(
    path: P,
    data: &BiallelicGenotypeData,
    delimiter: Delimiter,
) -> Result<()> {
    let path = path.as_ref();
    check_reloadable(data.named().headers(), GENOTYPE_IDENTITY_POLICY)?;

    let m = data.number_of_markers();
    let mut records: Vec<Vec<String>> = Vec::with_capacity(data.size() + 1);
    let mut header = Vec::with_capacity(m + 2);
    header.push(NAMES_HEADER.to_string());
    header.push(IDENTIFIERS_HEADER.to_string());
    for j in 0..m {
        header.push(encode_optional(data.marker_name(j), delimiter)?);
    }
    records.push(header);

    for i in 0..data.size() {
        let h: &ItemHeader = data.header(i);
        let mut row = Vec::with_capacity(m + 2);
        row.push(encode_optional(h.name(), delimiter)?);
        row.push(encode_optional(h.id(), delimiter)?);
        row.extend((0..m).map(|j| {
            data.allele_score(i, j)
                .map(|s| s.to_string())
                .unwrap_or_default()
        }));
        records.push(row);
    }

    let mut wtr = text_writer(path, delimiter)?;
    for record in &records {
        wtr.write_record(record).map_err(|e| write_error(path, e))?;
    }
    wtr.flush().map_err(|e| write_error(path, e))?;
    debug!(
        "wrote biallelic genotypes with {} items x {} markers to {}",
        data.size(),
        m,
        path.display()
    );
    Ok(())
}
