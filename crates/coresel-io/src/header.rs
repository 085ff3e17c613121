//! Detection of the optional name header row and identifier header column,
//! and resolution of per-item headers from them.
//!
//! Detection uses exact sentinel tokens: the first row is a header row only
//! if its first cell is exactly `NAME`, and an identifier column is present
//! only if the second cell of that row is exactly `ID`. Data that genuinely
//! starts with these literal tokens is read as a header.

use std::collections::HashMap;

use coresel_core::{CoreselError, ItemHeader, Location, Result};
use log::{debug, warn};

use crate::reader::Row;

pub const NAMES_HEADER: &str = "NAME";
pub const IDENTIFIERS_HEADER: &str = "ID";

/// Which optional header row/columns a file carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderLayout {
    pub name_row: bool,
    pub id_column: bool,
}

impl HeaderLayout {
    /// Detect the header layout from the first row.
    ///
    /// An `ID` sentinel without the `NAME` sentinel is rejected.
    pub fn detect(rows: &[Row]) -> Result<Self> {
        let first = rows.first().map(Vec::as_slice).unwrap_or(&[]);
        let name_row = first.first().and_then(|c| c.as_deref()) == Some(NAMES_HEADER);
        let id_column = first.get(1).and_then(|c| c.as_deref()) == Some(IDENTIFIERS_HEADER);
        // Both sentinels are matched independently, so a headerless file whose
        // second cell happens to read `ID` lands here and is rejected rather
        // than loaded as data.
        if id_column && !name_row {
            return Err(CoreselError::format_at(
                Location::cell(0, 1),
                format!(
                    "identifier header '{}' requires the name header '{}' in the first cell",
                    IDENTIFIERS_HEADER, NAMES_HEADER
                ),
            ));
        }

        for (r, row) in rows.iter().enumerate().skip(1) {
            if row.first().and_then(|c| c.as_deref()) == Some(NAMES_HEADER) {
                warn!(
                    "row {} starts with '{}'; only the first row can be a header row",
                    r, NAMES_HEADER
                );
            }
        }

        let layout = Self { name_row, id_column };
        debug!("detected header layout: {:?}", layout);
        Ok(layout)
    }

    pub fn header_rows(&self) -> usize {
        usize::from(self.name_row)
    }

    pub fn header_columns(&self) -> usize {
        usize::from(self.name_row) + usize::from(self.id_column)
    }
}

/// How a dataset kind treats items that carry neither a name nor an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityPolicy {
    /// Every item needs an id, or a name that is unique in the file.
    Strict,
    /// Items with neither fall back to positional identity.
    Lenient,
}

/// Build item headers from the name/id columns of the data rows.
///
/// An explicit id is always used. A name without id doubles as the id, but
/// only if no other item has the same name. Returns `None` when the file has
/// no header columns or no item ended up with a name or id.
pub fn resolve_headers(
    data_rows: &[Row],
    first_data_row: usize,
    layout: HeaderLayout,
    policy: IdentityPolicy,
) -> Result<Option<Vec<ItemHeader>>> {
    if !layout.name_row && !layout.id_column {
        return Ok(None);
    }
    let id_col = usize::from(layout.name_row);
    let name_of = |row: &Row| -> Option<String> {
        if layout.name_row {
            row.first().cloned().flatten()
        } else {
            None
        }
    };
    let id_of = |row: &Row| -> Option<String> {
        if layout.id_column {
            row.get(id_col).cloned().flatten()
        } else {
            None
        }
    };

    let mut name_counts: HashMap<String, usize> = HashMap::new();
    for row in data_rows {
        if let Some(name) = name_of(row) {
            *name_counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut seen: HashMap<String, usize> = HashMap::with_capacity(data_rows.len());
    let mut headers = Vec::with_capacity(data_rows.len());
    for (i, row) in data_rows.iter().enumerate() {
        let r = first_data_row + i;
        let header = match (id_of(row), name_of(row)) {
            (Some(id), name) => ItemHeader::from_parts(Some(id), name),
            (None, Some(name)) if name_counts.get(&name) == Some(&1) => ItemHeader::Full {
                id: name.clone(),
                name,
            },
            (None, Some(name)) => {
                return Err(CoreselError::format_at(
                    Location::cell(r, 0),
                    format!("duplicate names without ids: '{}'", name),
                ));
            }
            (None, None) => match policy {
                IdentityPolicy::Strict => {
                    return Err(CoreselError::format_at(
                        Location::row(r),
                        "missing names without ids: item has neither a name nor an identifier",
                    ));
                }
                IdentityPolicy::Lenient => ItemHeader::Unidentified,
            },
        };

        if let Some(id) = header.id() {
            if let Some(prev) = seen.insert(id.to_string(), r) {
                return Err(CoreselError::format_at(
                    Location::cell(r, id_col),
                    format!("duplicate identifier '{}' (also used at row {})", id, prev),
                ));
            }
        }
        headers.push(header);
    }

    if headers.iter().all(|h| *h == ItemHeader::Unidentified) {
        return Ok(None);
    }
    Ok(Some(headers))
}
