//! Writing datasets and loading them back.

use coresel_core::{BiallelicGenotypeData, DistanceMatrixData, ItemHeader, NamedDataset};
use coresel_io::{
    load_biallelic, load_distance_matrix, write_biallelic, write_distance_matrix, Delimiter,
    SymmetricMatrixFormat,
};
use ndarray::array;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

fn output(suffix: &str) -> NamedTempFile {
    tempfile::Builder::new().suffix(suffix).tempfile().unwrap()
}

fn distances(headers: Option<Vec<ItemHeader>>) -> DistanceMatrixData {
    DistanceMatrixData::new(
        "d",
        headers,
        array![[0.0, 1.5, 2.0], [1.5, 0.0, 0.25], [2.0, 0.25, 0.0]],
    )
    .unwrap()
}

fn reload_distances(data: &DistanceMatrixData, delimiter: Delimiter) -> DistanceMatrixData {
    let suffix = if delimiter == Delimiter::Comma { ".csv" } else { ".txt" };
    let out = output(suffix);
    write_distance_matrix(out.path(), data, delimiter).unwrap();
    load_distance_matrix(out.path(), delimiter, SymmetricMatrixFormat::Full).unwrap()
}

#[test]
fn quoted_and_padded_names_survive() {
    let f = write_file(
        ".csv",
        "NAME,ID\n\" Alice \",a,0,1,2\nsay \"hi\",b,1,0,3\n'\"x\"',c,2,3,0\n",
    );
    let data = load_distance_matrix(f.path(), Delimiter::Comma, SymmetricMatrixFormat::Full)
        .unwrap();
    assert_eq!(data.header(0).name(), Some(" Alice "));
    assert_eq!(data.header(1).name(), Some("say \"hi\""));
    assert_eq!(data.header(2).name(), Some("\"x\""));

    let reloaded = reload_distances(&data, Delimiter::Comma);
    assert_eq!(reloaded.named().headers(), data.named().headers());
    assert_eq!(reloaded.matrix(), data.matrix());
}

#[test]
fn in_memory_headers_reload() {
    let headers = vec![
        ItemHeader::Full {
            id: "a".into(),
            name: "".into(),
        },
        ItemHeader::IdOnly("b".into()),
        ItemHeader::NamedOnly("Carol".into()),
    ];
    let reloaded = reload_distances(&distances(Some(headers)), Delimiter::Tab);
    assert_eq!(reloaded.header(0).name(), Some(""));
    assert_eq!(reloaded.header(0).id(), Some("a"));
    assert_eq!(reloaded.header(1), &ItemHeader::IdOnly("b".into()));
    // a unique name without id doubles as the id once loaded
    assert_eq!(
        reloaded.header(2),
        &ItemHeader::Full {
            id: "Carol".into(),
            name: "Carol".into()
        }
    );
    assert_eq!(reloaded.named().find_by_id("#2"), None);
}

#[test]
fn unidentified_matrix_reloads_without_headers() {
    let data = distances(None);
    let reloaded = reload_distances(&data, Delimiter::Comma);
    assert!(!reloaded.named().has_headers());
    assert_eq!(reloaded.matrix(), data.matrix());
}

#[test]
fn unloadable_distance_headers_are_rejected() {
    let out = output(".txt");

    let partial = distances(Some(vec![
        ItemHeader::NamedOnly("Bob".into()),
        ItemHeader::Unidentified,
        ItemHeader::IdOnly("c".into()),
    ]));
    let err = write_distance_matrix(out.path(), &partial, Delimiter::Tab).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("missing names without ids"));

    let comma_name = distances(Some(vec![
        ItemHeader::IdOnly("a".into()),
        ItemHeader::IdOnly("b".into()),
        ItemHeader::Full {
            id: "c".into(),
            name: "Smith, J".into(),
        },
    ]));
    assert!(write_distance_matrix(out.path(), &comma_name, Delimiter::Comma).is_err());
    let reloaded = reload_distances(&comma_name, Delimiter::Tab);
    assert_eq!(reloaded.header(2).name(), Some("Smith, J"));
}

#[test]
fn biallelic_headers_reload() {
    let headers = vec![
        ItemHeader::NamedOnly("Bob".into()),
        ItemHeader::Unidentified,
        ItemHeader::Full {
            id: "c".into(),
            name: " Carol ".into(),
        },
    ];
    let geno = BiallelicGenotypeData::new(
        "g",
        Some(headers),
        Some(vec![Some(" mk 1 ".into()), None]),
        array![[Some(0), None], [Some(1), Some(2)], [None, Some(0)]],
    )
    .unwrap();

    let out = output(".csv");
    write_biallelic(out.path(), &geno, Delimiter::Comma).unwrap();
    let reloaded = load_biallelic(out.path(), Delimiter::Comma).unwrap();
    assert_eq!(reloaded.scores(), geno.scores());
    assert_eq!(
        reloaded.header(0),
        &ItemHeader::Full {
            id: "Bob".into(),
            name: "Bob".into()
        }
    );
    assert_eq!(reloaded.header(1), &ItemHeader::Unidentified);
    assert_eq!(reloaded.header(2), geno.header(2));
    assert_eq!(
        coresel_core::GenotypeData::marker_name(&reloaded, 0),
        Some(" mk 1 ")
    );
}

#[test]
fn biallelic_duplicate_names_without_ids_are_rejected() {
    let geno = BiallelicGenotypeData::new(
        "g",
        Some(vec![
            ItemHeader::NamedOnly("Bob".into()),
            ItemHeader::NamedOnly("Bob".into()),
        ]),
        None,
        array![[Some(0)], [Some(2)]],
    )
    .unwrap();
    let out = output(".txt");
    let err = write_biallelic(out.path(), &geno, Delimiter::Tab).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("duplicate names without ids"));
}
