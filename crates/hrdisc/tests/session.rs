//! Session behaviour over an in-memory worksheet store

use std::io::Write;

use hrdisc::prelude::*;
use hrdisc::{Error, FIELD_COUNT};
use pretty_assertions::assert_eq;

fn seeded_store() -> MemoryStore {
    let clients = [
        ClientRecord::from_pairs([
            ("first_name", "grace"),
            ("last_name", "hopper"),
            ("email", "GRACE@navy.mil "),
            ("phone", "12345"),
            ("company_id", "NAVY"),
        ]),
        ClientRecord::from_pairs([
            ("first_name", "ada"),
            ("last_name", "lovelace"),
            ("email", "ada@example.com"),
            ("phone", "+44 20 7946 0000"),
        ]),
    ];
    let mut rows = vec![ClientTable::headers()];
    rows.extend(clients.iter().map(|c| c.values().to_vec()));
    MemoryStore::new().with_worksheet("Client Data", rows)
}

fn session_over(store: MemoryStore) -> Session {
    let mut session = Session::new(Some(Box::new(store)), &CrmConfig::default());
    session.ensure_loaded();
    session
}

fn submission(first: &str, last: &str, email: &str) -> ClientRecord {
    ClientRecord::from_pairs([("first_name", first), ("last_name", last), ("email", email)])
}

#[test]
fn load_resolves_fallback_and_cleans() {
    let session = session_over(seeded_store());

    assert_eq!(session.status(), &LoadStatus::Success);
    assert_eq!(session.worksheet().unwrap().title, "Client Data");
    assert_eq!(session.table().len(), 2);

    let grace = session.record(0).unwrap();
    assert_eq!(grace.value("first_name"), "Grace");
    assert_eq!(grace.value("email"), "grace@navy.mil");
    assert_eq!(grace.value("phone"), "");
    assert_eq!(session.record(1).unwrap().value("phone"), "+44 20 7946 0000");
}

#[test]
fn add_client_appends_to_resolved_worksheet() {
    let mut session = session_over(seeded_store());

    let outcome = session
        .add_client(submission("katherine", "johnson", "kj@nasa.gov"))
        .unwrap();
    assert!(outcome.ok, "{outcome}");

    assert!(session.ensure_loaded());
    assert_eq!(session.table().len(), 3);
    let added = session.record(2).unwrap();
    assert_eq!(added.value("first_name"), "Katherine");
    assert_eq!(added.value("full_name"), "Katherine Johnson");
}

#[test]
fn invalid_submission_writes_nothing() {
    let mut session = session_over(seeded_store());

    let err = session.add_client(submission("", "Doe", "not-an-email")).unwrap_err();
    match err {
        Error::Validation(issues) => assert_eq!(issues.len(), 2),
        other => panic!("unexpected error: {other}"),
    }

    session.reload();
    assert_eq!(session.table().len(), 2);
}

#[test]
fn edit_client_overwrites_its_row() {
    let mut session = session_over(seeded_store());

    let mut edited = session.record(1).unwrap().clone();
    edited.set("city", "london").unwrap();
    let outcome = session.edit_client(1, edited).unwrap();
    assert!(outcome.ok);

    session.ensure_loaded();
    assert_eq!(session.record(1).unwrap().value("city"), "london");
    assert_eq!(session.record(0).unwrap().value("city"), "");

    assert!(session.edit_client(9, ClientRecord::new()).is_err());
}

#[test]
fn edit_after_blank_row_targets_its_own_row() {
    let ada = submission("Ada", "Lovelace", "ada@example.com");
    let grace = submission("Grace", "Hopper", "grace@navy.mil");
    let store = MemoryStore::new().with_worksheet(
        "Clients",
        vec![
            ClientTable::headers(),
            vec![String::new(); FIELD_COUNT],
            ada.values().to_vec(),
            grace.values().to_vec(),
        ],
    );
    let mut session = session_over(store);
    assert_eq!(session.sheet_row(0), Some(3));
    assert_eq!(session.sheet_row(1), Some(4));

    let mut edited = session.record(1).unwrap().clone();
    edited.set("city", "Arlington").unwrap();
    assert!(session.edit_client(1, edited).unwrap().ok);

    session.ensure_loaded();
    let rows: Vec<String> = session
        .table()
        .iter()
        .map(|r| format!("{}|{}", r.full_name(), r.value("city")))
        .collect();
    assert_eq!(rows, vec!["Ada Lovelace|", "Grace Hopper|Arlington"]);
}

#[test]
fn edit_after_local_delete_keeps_row_mapping() {
    let mut session = session_over(seeded_store());

    session.delete_client(0, false).unwrap();
    let mut edited = session.record(0).unwrap().clone();
    edited.set("city", "London").unwrap();
    assert!(session.edit_client(0, edited).unwrap().ok);

    session.reload();
    assert_eq!(session.table().len(), 2);
    assert_eq!(session.record(0).unwrap().value("city"), "");
    assert_eq!(session.record(1).unwrap().value("city"), "London");
}

#[test]
fn imported_client_needs_sync_before_edit() {
    let mut session = session_over(seeded_store());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "first_name,last_name,email").unwrap();
    writeln!(file, "alan,turing,alan@example.com").unwrap();
    file.flush().unwrap();
    session.import_csv(file.path()).unwrap();

    let alan = session.record(2).unwrap().clone();
    assert!(matches!(session.edit_client(2, alan.clone()), Err(Error::NotOnWorksheet(2))));

    assert!(session.sync().unwrap().ok);
    assert_eq!(session.sheet_row(2), Some(4));
    assert!(session.edit_client(2, alan).unwrap().ok);
}

#[test]
fn sync_succeeds_when_client_tab_is_the_only_one() {
    let mut session = session_over(seeded_store());
    assert_eq!(session.worksheet_titles().unwrap(), vec!["Client Data".to_string()]);

    let outcome = session.sync().unwrap();
    assert!(outcome.ok, "{outcome}");
    assert_eq!(session.worksheet_titles().unwrap(), vec!["Client Data".to_string()]);

    session.reload();
    assert_eq!(session.table().len(), 2);
}

#[test]
fn delete_with_sync_rewrites_worksheet() {
    let mut session = session_over(seeded_store());

    let (removed, outcome) = session.delete_client(0, true).unwrap();
    assert_eq!(removed.value("first_name"), "Grace");
    assert!(outcome.unwrap().ok);

    session.reload();
    assert_eq!(session.table().len(), 1);
    assert_eq!(session.record(0).unwrap().value("first_name"), "Ada");
}

#[test]
fn failed_write_is_reported_not_raised() {
    let mut store = seeded_store();
    store.set_read_only(true);
    let mut session = session_over(store);

    let outcome = session.add_client(submission("Ada", "Byron", "ab@example.com")).unwrap();
    assert!(!outcome.ok);
    assert!(outcome.message.contains("read-only"));

    let outcome = session.sync().unwrap();
    assert!(!outcome.ok);
}

#[test]
fn import_merges_without_duplicates() {
    let mut session = session_over(seeded_store());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "first_name,last_name,email,phone,company_id").unwrap();
    writeln!(file, "ada,lovelace,ada@example.com,+44 20 7946 0000,").unwrap();
    writeln!(file, "alan,turing,alan@example.com,,").unwrap();
    file.flush().unwrap();

    let added = session.import_csv(file.path()).unwrap();
    assert_eq!(added, 1);
    assert_eq!(session.table().len(), 3);
}

#[test]
fn exports_cover_table_or_one_client() {
    let session = session_over(seeded_store());

    let text = session.export_csv(None).unwrap();
    let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
    assert_eq!(reader.headers().unwrap().len(), FIELD_COUNT);
    assert_eq!(reader.records().count(), 2);

    let json = session.export_json(Some(1)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["first_name"], "Ada");

    assert!(session.export_json(Some(5)).is_err());
}

#[test]
fn list_search_sort_and_stats() {
    let session = session_over(seeded_store());

    let names: Vec<String> = session
        .list(None, Some("first_name"))
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper"]);

    let hits = session.list(Some("NAVY"), None).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].index, 0);

    assert!(session.list(None, Some("discprofile")).is_err());

    let stats = session.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.valid_emails, 2);
}

#[test]
fn missing_worksheets_degrade_to_empty_table() {
    let session = session_over(MemoryStore::new());
    assert_eq!(session.status(), &LoadStatus::NoWorksheets);
    assert!(session.table().is_empty());
}
