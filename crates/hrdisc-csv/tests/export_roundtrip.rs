//! End-to-end tests for CSV export -> re-parse

use hrdisc_core::{field_names, ClientRecord, ClientTable, FIELD_COUNT};
use hrdisc_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use pretty_assertions::assert_eq;

fn narrative_client() -> ClientRecord {
    ClientRecord::from_pairs([
        ("first_name", "Grace"),
        ("last_name", "Hopper"),
        ("email", "grace@navy.mil"),
        (
            "discprofile",
            "High D, high C.\n\nPrefers \"direct\" feedback, dislikes \"fluff\".\r\nThird line, with commas.",
        ),
        ("hiring_and_recruitment", "Hire for \"curiosity\""),
    ])
}

/// Re-parsing the export with a plain csv reader yields the original strings
#[test]
fn test_narrative_roundtrip_with_csv_crate() {
    let original = narrative_client();
    let out = CsvWriter::records_to_string(&[original.clone()], &CsvWriteOptions::default()).unwrap();

    let mut reader = csv::Reader::from_reader(out.as_bytes());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, field_names().map(String::from).collect::<Vec<_>>());

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), FIELD_COUNT);
    assert_eq!(&rows[0][16], original.value("discprofile"));
    assert_eq!(&rows[0][25], original.value("hiring_and_recruitment"));
}

/// A file written by the exporter imports back to the same table
#[test]
fn test_file_roundtrip_through_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clients.csv");

    let table = ClientTable::from_records(vec![
        narrative_client(),
        ClientRecord::from_pairs([("first_name", "Alan"), ("last_name", "Turing")]),
    ]);
    CsvWriter::write_file(&table, &path, &CsvWriteOptions::default()).unwrap();

    let imported = CsvReader::import_file(&path, &CsvReadOptions::default()).unwrap();
    assert_eq!(imported, table);
}
