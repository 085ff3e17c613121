//! Loading distance matrices from files in every supported layout, and
//! rejection of malformed files.

use coresel_core::{ItemHeader, ItemKey, NamedDataset};
use coresel_io::{load_distance_matrix, Delimiter, SymmetricMatrixFormat};
use std::io::Write;
use tempfile::NamedTempFile;

const DISTANCES: [[f64; 5]; 5] = [
    [0.0, 0.2, 0.4, 0.6, 0.8],
    [0.2, 0.0, 0.5, 0.7, 0.9],
    [0.4, 0.5, 0.0, 0.3, 0.1],
    [0.6, 0.7, 0.3, 0.0, 1.0],
    [0.8, 0.9, 0.1, 1.0, 0.0],
];

const NAMES: [&str; 5] = ["Alice", "Dave", "Bob", "Bob", "Carol"];
const UNIQUE_NAMES: [&str; 5] = ["Alice", "Dave", "Bob", "Bobby", "Carol"];
const IDS: [&str; 5] = ["Alice", "Dave", "Bob1", "Bob2", "Carol"];

fn write_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

fn full_text(sep: &str, names: Option<&[&str]>, ids: Option<&[&str]>) -> String {
    let mut out = String::new();
    if names.is_some() {
        out.push_str("NAME");
        if ids.is_some() {
            out.push_str(sep);
            out.push_str("ID");
        }
        out.push('\n');
    }
    for (i, row) in DISTANCES.iter().enumerate() {
        let mut cells: Vec<String> = Vec::new();
        if let Some(names) = names {
            cells.push(names[i].to_string());
        }
        if let Some(ids) = ids {
            cells.push(ids[i].to_string());
        }
        cells.extend(row.iter().map(|d| d.to_string()));
        out.push_str(&cells.join(sep));
        out.push('\n');
    }
    out
}

fn lower_text(sep: &str, with_diagonal: bool, names: Option<&[&str]>) -> String {
    let mut out = String::new();
    if names.is_some() {
        out.push_str("NAME\n");
    }
    for (i, row) in DISTANCES.iter().enumerate() {
        let mut cells: Vec<String> = Vec::new();
        if let Some(names) = names {
            cells.push(names[i].to_string());
        }
        let end = if with_diagonal { i + 1 } else { i };
        cells.extend(row[..end].iter().map(|d| d.to_string()));
        out.push_str(&cells.join(sep));
        out.push('\n');
    }
    out
}

fn assert_distances(data: &coresel_core::DistanceMatrixData) {
    assert_eq!(data.size(), 5);
    for i in 0..5 {
        for j in 0..5 {
            assert_eq!(data.distance(i, j), DISTANCES[i][j], "d[{}][{}]", i, j);
            assert_eq!(data.distance(i, j), data.distance(j, i));
        }
    }
}

#[test]
fn full_without_headers() {
    let f = write_file(".txt", &full_text("\t", None, None));
    let data = load_distance_matrix(f.path(), Delimiter::Tab, SymmetricMatrixFormat::Full).unwrap();
    assert_distances(&data);
    assert_eq!(
        data.ids(),
        &(0..5).map(ItemKey::Positional).collect::<Vec<_>>()[..]
    );
}

#[test]
fn full_with_unique_names() {
    let f = write_file(".txt", &full_text("\t", Some(&UNIQUE_NAMES), None));
    let data = load_distance_matrix(f.path(), Delimiter::Tab, SymmetricMatrixFormat::Full).unwrap();
    assert_distances(&data);
    for (i, name) in UNIQUE_NAMES.iter().enumerate() {
        assert_eq!(
            data.header(i),
            &ItemHeader::Full {
                id: name.to_string(),
                name: name.to_string()
            }
        );
    }
}

#[test]
fn full_with_names_and_ids() {
    let f = write_file(".txt", &full_text("\t", Some(&NAMES), Some(&IDS)));
    let data = load_distance_matrix(f.path(), Delimiter::Tab, SymmetricMatrixFormat::Full).unwrap();
    assert_distances(&data);
    assert_eq!(data.header(3).name(), Some("Bob"));
    assert_eq!(data.header(3).id(), Some("Bob2"));
    assert_eq!(data.named().find_by_id("Bob1"), Some(2));
}

#[test]
fn lower_csv() {
    let f = write_file(".csv", &lower_text(",", false, None));
    let data =
        load_distance_matrix(f.path(), Delimiter::Comma, SymmetricMatrixFormat::Lower).unwrap();
    assert_distances(&data);
}

#[test]
fn lower_diag_with_names_matches_full() {
    let lower = write_file(".csv", &lower_text(",", true, Some(&UNIQUE_NAMES)));
    let full = write_file(".csv", &full_text(",", Some(&UNIQUE_NAMES), None));
    let a = load_distance_matrix(lower.path(), Delimiter::Comma, SymmetricMatrixFormat::LowerDiag)
        .unwrap();
    let b = load_distance_matrix(full.path(), Delimiter::Comma, SymmetricMatrixFormat::Full).unwrap();
    assert_distances(&a);
    assert_eq!(a.matrix(), b.matrix());
    assert_eq!(a.named().headers(), b.named().headers());
}

#[test]
fn quoted_names_keep_inner_whitespace() {
    let f = write_file(".csv", "NAME,ID\n\" Alice \",'a',0,1\n Bob ,b,1,0\n");
    let data =
        load_distance_matrix(f.path(), Delimiter::Comma, SymmetricMatrixFormat::Full).unwrap();
    assert_eq!(data.header(0).name(), Some(" Alice "));
    assert_eq!(data.header(0).id(), Some("a"));
    assert_eq!(data.header(1).name(), Some("Bob"));
}

#[test]
fn duplicate_names_load_once_ids_are_added() {
    let f = write_file(".txt", &full_text("\t", Some(&NAMES), None));
    let err = load_distance_matrix(f.path(), Delimiter::Tab, SymmetricMatrixFormat::Full)
        .unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("duplicate names without ids"));

    // ids only for the ambiguous rows
    let partial_ids = ["", "", "Bob1", "Bob2", ""];
    let f = write_file(".txt", &full_text("\t", Some(&NAMES), Some(&partial_ids)));
    let data = load_distance_matrix(f.path(), Delimiter::Tab, SymmetricMatrixFormat::Full).unwrap();
    assert_eq!(data.header(0).id(), Some("Alice"));
    assert_eq!(data.header(2).id(), Some("Bob1"));
}

#[test]
fn erroneous_files_fail_to_load() {
    use SymmetricMatrixFormat::{Full, Lower, LowerDiag};

    let cases: &[(&str, &str, SymmetricMatrixFormat)] = &[
        ("empty", "", Full),
        ("blank lines only", "\n\n", Full),
        ("excessive names", "NAME\tAlice\tBob\tCarol\nAlice\t0\t1\nBob\t1\t0\n", Full),
        ("excessive ids", "NAME\tID\nAlice\ta\t0\t1\nBob\tb\t1\t0\nCarol\tc\n", Full),
        ("too few ids", "NAME\tID\nBob\tb1\t0\t1\nBob\t\t1\t0\n", Full),
        ("incorrect row length", "\n1\n2,3,4\n", Lower),
        ("incorrect row length 2", "\n1,2\n3,4\n", Lower),
        ("incorrect row length full", "0\t1\t2\n1\t0\n2\t3\t0\n", Full),
        ("names only", "NAME\tAlice\tBob\n", LowerDiag),
        ("excessive labels lower", "NAME,a,b,c\na\nb,1\n", Lower),
        ("negative values", "\n-1\n", Lower),
        ("non-symmetric", "0\t1\n2\t0\n", Full),
        ("non-zero diagonal lower", "0\n1,0.5\n", LowerDiag),
        ("non-zero diagonal full", "0\t1\n1\t1\n", Full),
        ("missing rows", "0\t1\t2\n1\t0\t3\n", Full),
        ("names after data", "0\t1\nNAME\t0\n", Full),
        ("ids after data", "0\t1\t2\n1\tID\t3\n2\t3\t0\n", Full),
        ("id without name header", "x\tID\t0\t1\ny\tb\t1\t0\n", Full),
        ("duplicate ids", "NAME\tID\nAlice\ta\t0\t1\nBob\ta\t1\t0\n", Full),
        ("duplicate names without ids", "NAME\nBob\t0\t1\nBob\t1\t0\n", Full),
        ("missing names without ids", "NAME\nAlice\t0\t1\n\t1\t0\n", Full),
        ("missing ids", "NAME\tID\nAlice\ta\t0\t1\n\t\t1\t0\n", Full),
        ("unparsable value", "0\tx\nx\t0\n", Full),
        ("missing value", "0\t\n1\t0\n", Full),
    ];

    for (label, contents, format) in cases {
        let suffix = if contents.contains('\t') { ".txt" } else { ".csv" };
        let delimiter = if suffix == ".txt" {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        };
        let f = write_file(suffix, contents);
        let result = load_distance_matrix(f.path(), delimiter, *format);
        match result {
            Ok(_) => panic!("file '{}' should fail to load", label),
            Err(e) => assert!(e.is_format(), "'{}' gave a non-format error: {}", label, e),
        }
    }
}

#[test]
fn missing_file_is_format_error() {
    let err = load_distance_matrix(
        "/nonexistent/coresel/distances.txt",
        Delimiter::Tab,
        SymmetricMatrixFormat::Full,
    )
    .unwrap_err();
    assert!(err.is_format());
}
