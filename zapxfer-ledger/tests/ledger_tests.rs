use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;
use zapxfer_ledger::{HistoryLedger, LedgerError};
use zapxfer_types::{Direction, TransferRecord};

fn sent(name: &str) -> TransferRecord {
    TransferRecord::sent(name, format!("/data/Sent/{name}"), "Device B")
}

fn received(name: &str) -> TransferRecord {
    TransferRecord::received(name, format!("/data/Received/{name}"))
}

// ── Load ─────────────────────────────────────────────────────────

#[test]
fn first_run_is_empty() {
    let dir = tempdir().unwrap();
    let ledger = HistoryLedger::open(dir.path().join("history.json")).unwrap();
    assert!(ledger.is_empty());
}

#[test]
fn corrupt_file_is_reported_not_swallowed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, b"{ not json").unwrap();

    assert!(matches!(
        HistoryLedger::open(&path),
        Err(LedgerError::Corrupt(_))
    ));
}

#[test]
fn corrupt_recovery_starts_empty_at_same_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, b"garbage").unwrap();

    let mut ledger = HistoryLedger::empty(&path);
    assert!(ledger.is_empty());

    // The recovered ledger can persist over the corrupt file.
    ledger.append(sent("a.txt")).unwrap();
    let reloaded = HistoryLedger::open(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
}

// ── Append / durability ──────────────────────────────────────────

#[test]
fn append_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    let record = sent("a.txt");
    {
        let mut ledger = HistoryLedger::open(&path).unwrap();
        ledger.append(record.clone()).unwrap();
    }

    let reloaded = HistoryLedger::open(&path).unwrap();
    assert_eq!(reloaded.records(), &[record]);
}

#[test]
fn append_returns_updated_sequence_most_recent_first() {
    let dir = tempdir().unwrap();
    let mut ledger = HistoryLedger::open(dir.path().join("history.json")).unwrap();

    let r1 = sent("one.txt");
    let r2 = received("two.txt");
    let r3 = sent("three.txt");

    ledger.append(r1.clone()).unwrap();
    ledger.append(r2.clone()).unwrap();
    let sequence = ledger.append(r3.clone()).unwrap();

    assert_eq!(sequence, &[r3, r2, r1]);
}

#[test]
fn ordering_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    {
        let mut ledger = HistoryLedger::open(&path).unwrap();
        for name in ["one.txt", "two.txt", "three.txt"] {
            ledger.append(sent(name)).unwrap();
        }
    }

    let reloaded = HistoryLedger::open(&path).unwrap();
    let names: Vec<&str> = reloaded.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["three.txt", "two.txt", "one.txt"]);
}

#[test]
fn failed_persist_rolls_back_memory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut ledger = HistoryLedger::open(&path).unwrap();
    ledger.append(sent("kept.txt")).unwrap();

    // Occupy the ledger path with a non-empty directory so the publishing
    // rename fails.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    fs::write(path.join("occupant"), b"x").unwrap();

    let result = ledger.append(sent("lost.txt"));
    assert!(matches!(result, Err(LedgerError::PersistFailed(_))));

    // In-memory state rolled back; nothing replaced the occupant.
    let names: Vec<&str> = ledger.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["kept.txt"]);
    assert!(path.is_dir());
}

#[test]
fn no_staging_leftovers_after_append() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut ledger = HistoryLedger::open(&path).unwrap();
    ledger.append(sent("a.txt")).unwrap();
    ledger.append(received("b.txt")).unwrap();

    let leftovers: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "staging leftovers: {leftovers:?}");
}

// ── Query ────────────────────────────────────────────────────────

#[test]
fn query_filters_by_direction_in_ledger_order() {
    let dir = tempdir().unwrap();
    let mut ledger = HistoryLedger::open(dir.path().join("history.json")).unwrap();

    let a = sent("a.txt");
    let b = received("b.txt");
    ledger.append(a.clone()).unwrap();
    ledger.append(b.clone()).unwrap();

    let sent_records: Vec<_> = ledger.query(Direction::Sent).cloned().collect();
    let received_records: Vec<_> = ledger.query(Direction::Received).cloned().collect();

    assert_eq!(sent_records, vec![a]);
    assert_eq!(received_records, vec![b]);
}

#[test]
fn query_is_restartable() {
    let dir = tempdir().unwrap();
    let mut ledger = HistoryLedger::open(dir.path().join("history.json")).unwrap();
    ledger.append(sent("a.txt")).unwrap();
    ledger.append(sent("b.txt")).unwrap();

    assert_eq!(ledger.query(Direction::Sent).count(), 2);
    // Second pass over a fresh iterator sees the same records.
    assert_eq!(ledger.query(Direction::Sent).count(), 2);
    assert_eq!(ledger.query(Direction::Received).count(), 0);
}

#[test]
fn persisted_form_is_a_json_array_of_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut ledger = HistoryLedger::open(&path).unwrap();
    ledger.append(sent("a.txt")).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let array = value.as_array().expect("top-level JSON array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["name"], "a.txt");
    assert_eq!(array[0]["direction"], "Sent");
    assert_eq!(array[0]["peer_device"], "Device B");
}
