//! Delimited text reader producing normalized rows of optional cells.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use coresel_core::{CoreselError, Result};
use flate2::read::MultiGzDecoder;

/// A row of cells; `None` marks a blank (missing) cell.
pub type Row = Vec<Option<String>>;

/// Cell separator of a text file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Self::Tab => '\t',
            Self::Comma => ',',
        }
    }

    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }

    /// Infer the delimiter from the file extension, looking through `.gz`.
    /// `.txt` and `.tsv` are tab-delimited, `.csv` is comma-delimited.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?.to_ascii_lowercase();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        if name.ends_with(".csv") {
            Some(Self::Comma)
        } else if name.ends_with(".txt") || name.ends_with(".tsv") {
            Some(Self::Tab)
        } else {
            None
        }
    }
}

fn open_text(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| {
        CoreselError::format(format!("cannot open file {}: {}", path.display(), e))
    })?;
    let gzipped = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);
    if gzipped {
        Ok(Box::new(BufReader::with_capacity(64 * 1024, MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::with_capacity(64 * 1024, file)))
    }
}

/// Normalize a raw cell: trim, treat empty as missing, then strip one layer
/// of matching single or double quotes. Whitespace inside the quotes is kept.
pub fn parse_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(unquote(trimmed).to_string())
}

pub(crate) fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Read all rows of a delimited text file (gzip-compressed if the name ends
/// in `.gz`).
///
/// Cells are normalized with [`parse_cell`]. Rows shorter than the widest row
/// are right-padded with missing cells. Blank lines inside the file are kept
/// as rows; blank lines at the end are dropped. Fails if the file cannot be
/// read or holds no rows.
pub fn read_rows<P: AsRef<Path>>(path: P, delimiter: Delimiter) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let reader = open_text(path)?;
    let sep = delimiter.as_char();

    let mut rows: Vec<Row> = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            CoreselError::format(format!(
                "failed to read line {} of {}: {}",
                idx,
                path.display(),
                e
            ))
        })?;
        let line = if idx == 0 {
            line.trim_start_matches('\u{feff}')
        } else {
            line.as_str()
        };
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() && !line.contains(sep) {
            rows.push(vec![None]);
        } else {
            rows.push(line.split(sep).map(parse_cell).collect());
        }
    }

    while rows
        .last()
        .map(|r| r.len() == 1 && r[0].is_none())
        .unwrap_or(false)
    {
        rows.pop();
    }
    if rows.is_empty() {
        return Err(CoreselError::format(format!(
            "file {} is empty",
            path.display()
        )));
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, None);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cells(row: &Row) -> Vec<Option<&str>> {
        row.iter().map(|c| c.as_deref()).collect()
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("  a b  "), Some("a b".to_string()));
        assert_eq!(parse_cell("   "), None);
        assert_eq!(parse_cell(" ' padded ' "), Some(" padded ".to_string()));
        assert_eq!(parse_cell("\"\"x\"\""), Some("\"x\"".to_string()));
        assert_eq!(parse_cell("'mixed\""), Some("'mixed\"".to_string()));
        assert_eq!(parse_cell("\"\""), Some(String::new()));
        assert_eq!(parse_cell("'"), Some("'".to_string()));
    }

    #[test]
    fn test_delimiter_from_path() {
        assert_eq!(Delimiter::from_path("dist.csv"), Some(Delimiter::Comma));
        assert_eq!(Delimiter::from_path("dist.TXT"), Some(Delimiter::Tab));
        assert_eq!(Delimiter::from_path("geno.tsv.gz"), Some(Delimiter::Tab));
        assert_eq!(Delimiter::from_path("geno.dat"), None);
    }

    #[test]
    fn test_read_rows_pads_ragged_rows() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "NAME,ID,m1,m2").unwrap();
        writeln!(f, "a, \"x \" ,1").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "b,,2,0").unwrap();
        writeln!(f).unwrap();
        writeln!(f).unwrap();
        f.flush().unwrap();

        let rows = read_rows(f.path(), Delimiter::Comma).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == 4));
        assert_eq!(cells(&rows[1]), vec![Some("a"), Some("x "), Some("1"), None]);
        assert_eq!(cells(&rows[2]), vec![None, None, None, None]);
        assert_eq!(cells(&rows[3]), vec![Some("b"), None, Some("2"), Some("0")]);
    }

    #[test]
    fn test_read_rows_keeps_delimiter_only_rows() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "1\t2\r\n\t\n").unwrap();
        f.flush().unwrap();
        let rows = read_rows(f.path(), Delimiter::Tab).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(cells(&rows[0]), vec![Some("1"), Some("2")]);
        assert_eq!(cells(&rows[1]), vec![None, None]);
    }

    #[test]
    fn test_read_rows_gzip() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let f = tempfile::Builder::new().suffix(".csv.gz").tempfile().unwrap();
        let mut enc = GzEncoder::new(f.reopen().unwrap(), Compression::default());
        writeln!(enc, "0,1").unwrap();
        writeln!(enc, "1,0").unwrap();
        enc.finish().unwrap();

        let rows = read_rows(f.path(), Delimiter::Comma).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(cells(&rows[1]), vec![Some("1"), Some("0")]);
    }

    #[test]
    fn test_read_rows_failures() {
        let f = NamedTempFile::new().unwrap();
        assert!(read_rows(f.path(), Delimiter::Tab).unwrap_err().is_format());
        let err = read_rows("/nonexistent/coresel/file.txt", Delimiter::Tab).unwrap_err();
        assert!(err.is_format());
    }
}
