//! Cell encoding and identity checks shared by the dataset writers.
//!
//! Written cells are read back by [`crate::reader::read_rows`], which trims
//! every cell and strips one layer of matching quotes. Values that would be
//! altered by that normalization are wrapped in one layer of double quotes;
//! values containing the delimiter or a line break cannot be represented.

use std::fs::File;
use std::path::Path;

use coresel_core::{CoreselError, ItemHeader, Result};

use crate::header::{resolve_headers, HeaderLayout, IdentityPolicy};
use crate::reader::{unquote, Delimiter, Row};

/// Encode one cell so that the reader returns exactly `value`.
pub(crate) fn encode_cell(value: &str, delimiter: Delimiter) -> Result<String> {
    if value.contains(delimiter.as_char()) || value.contains(|c: char| c == '\n' || c == '\r') {
        return Err(CoreselError::format(format!(
            "value '{}' contains the delimiter or a line break and cannot be written",
            value.escape_debug()
        )));
    }
    if value.is_empty() || value.trim() != value || unquote(value) != value {
        Ok(format!("\"{}\"", value))
    } else {
        Ok(value.to_string())
    }
}

/// Encode an optional cell; `None` is written as a blank cell.
pub(crate) fn encode_optional(value: Option<&str>, delimiter: Delimiter) -> Result<String> {
    value.map_or(Ok(String::new()), |v| encode_cell(v, delimiter))
}

/// Fail unless the name and id columns written for `headers` load back
/// under `policy`. Error coordinates refer to the written file, whose first
/// row is the header row.
pub(crate) fn check_reloadable(headers: &[ItemHeader], policy: IdentityPolicy) -> Result<()> {
    let rows: Vec<Row> = headers
        .iter()
        .map(|h| vec![h.name().map(str::to_string), h.id().map(str::to_string)])
        .collect();
    let layout = HeaderLayout {
        name_row: true,
        id_column: true,
    };
    resolve_headers(&rows, 1, layout, policy)
        .map(|_| ())
        .map_err(|e| match e {
            CoreselError::Format { location, message } => CoreselError::format_at(
                location,
                format!("item headers cannot be written so that they reload: {}", message),
            ),
            other => other,
        })
}

/// Open a delimited writer that emits pre-encoded cells verbatim.
pub(crate) fn text_writer(path: &Path, delimiter: Delimiter) -> Result<csv::Writer<File>> {
    csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .quote_style(csv::QuoteStyle::Never)
        .from_path(path)
        .map_err(|e| write_error(path, e))
}

pub(crate) fn write_error(path: &Path, e: impl std::fmt::Display) -> CoreselError {
    CoreselError::format(format!("failed to write {}: {}", path.display(), e))
}
