use std::io::Write;
use v2m_ingest::{IngestError, count_records, read_jsonl_file};

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create");
    file.write_all(content.as_bytes()).expect("write");
    path
}

#[test]
fn reads_valid_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(
        &dir,
        "valid.jsonl",
        "{\"metric\":{\"name\":\"test1\"}}\n{\"metric\":{\"name\":\"test2\"}}\n{\"metric\":{\"name\":\"test3\"}}\n",
    );

    let records: Vec<_> = read_jsonl_file(&path)
        .expect("open")
        .map(|item| item.expect("record"))
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].value["metric"]["name"], "test1");
    assert_eq!(records[2].value["metric"]["name"], "test3");
    assert_eq!(records[2].line, 3);
    assert_eq!(records[0].resource, path.display().to_string());
}

#[test]
fn invalid_lines_are_reported_and_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(
        &dir,
        "mixed.jsonl",
        "{\"valid\": \"json\"}\ninvalid json line\n\n{\"another\": \"valid\"}\n",
    );

    let items: Vec<_> = read_jsonl_file(&path).expect("open").collect();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_ref().expect("first").value["valid"], "json");
    match &items[1] {
        Err(IngestError::MalformedLine { line, message, .. }) => {
            assert_eq!(*line, 2);
            assert!(!message.is_empty());
        }
        other => panic!("unexpected item: {:?}", other),
    }
    let last = items[2].as_ref().expect("last");
    assert_eq!(last.value["another"], "valid");
    assert_eq!(last.line, 4);
}

#[test]
fn missing_file_is_fatal_for_resource() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = read_jsonl_file(&dir.path().join("nonexistent.jsonl"))
        .err()
        .expect("not found");
    assert!(matches!(err, IngestError::NotFound(_)));
    assert!(err.is_fatal());
}

#[test]
fn count_skips_blank_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "count.jsonl", "{}\n\n  \nnot json\n{}");
    assert_eq!(count_records(&path).expect("count"), 3);
}
