use prost::Message;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use v2m_pipeline::{ConvertOptions, PipelineError, convert_files};
use v2m_storage::proto::{self, event_wrapper, metric};
use v2m_telemetry::{MemoryDiagnostics, Severity};

const COUNTER: &str =
    r#"{"metric":{"name":"c1","timestamp":"2025-01-01T00:00:00Z","counter":{"value":3}}}"#;
const GAUGE: &str = r#"{"metric":{"name":"g1","namespace":"vector","tags":{"host":"h1"},"timestamp":"2025-07-16T14:20:07.666956352Z","kind":"incremental","gauge":{"value":100.5}}}"#;
const SET: &str = r#"{"metric":{"name":"s1","timestamp":"2025-07-16T14:20:08Z","set":{"values":["value1","value2"]}}}"#;

fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create");
    for line in lines {
        writeln!(file, "{}", line).expect("write");
    }
    path
}

struct Written {
    log_time: u64,
    publish_time: u64,
    payload: Vec<u8>,
}

fn read_messages(path: &Path) -> Vec<Written> {
    let bytes = std::fs::read(path).expect("read");
    mcap::MessageStream::new(&bytes)
        .expect("stream")
        .map(|message| {
            let message = message.expect("message");
            assert_eq!(message.channel.topic, "vector_event");
            Written {
                log_time: message.log_time,
                publish_time: message.publish_time,
                payload: message.data.to_vec(),
            }
        })
        .collect()
}

fn decode_metric(payload: &[u8]) -> proto::Metric {
    let wrapper = proto::EventWrapper::decode(payload).expect("decode");
    match wrapper.event {
        Some(event_wrapper::Event::Metric(metric)) => metric,
        None => panic!("empty wrapper"),
    }
}

fn convert(
    resources: Vec<PathBuf>,
    out: &Path,
) -> (v2m_pipeline::ConversionStats, Arc<MemoryDiagnostics>) {
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let stats = convert_files(resources, out, &ConvertOptions::default(), diagnostics.clone())
        .expect("convert");
    (stats, diagnostics)
}

#[test]
fn counter_defaults_are_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_lines(dir.path(), "in.jsonl", &[COUNTER]);
    let out = dir.path().join("out.mcap");
    let (stats, _) = convert(vec![input], &out);

    assert_eq!(stats.written, 1);
    assert_eq!(stats.errored, 0);
    let messages = read_messages(&out);
    assert_eq!(messages.len(), 1);
    let metric = decode_metric(&messages[0].payload);
    assert_eq!(metric.name, "c1");
    assert_eq!(metric.kind, metric::Kind::Absolute as i32);
    assert_eq!(metric.namespace, "");
    assert!(metric.tags_v1.is_empty());
    match metric.value {
        Some(metric::Value::Counter(counter)) => assert_eq!(counter.value, 3.0),
        other => panic!("unexpected value: {:?}", other),
    }
}

#[test]
fn missing_name_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_lines(
        dir.path(),
        "in.jsonl",
        &[r#"{"metric":{"timestamp":"2025-01-01T00:00:00Z","counter":{"value":1}}}"#],
    );
    let out = dir.path().join("out.mcap");
    let (stats, diagnostics) = convert(vec![input], &out);

    assert_eq!(stats.observed, 1);
    assert_eq!(stats.errored, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.written, 0);
    assert_eq!(diagnostics.count(Severity::Warning), 1);
    assert!(read_messages(&out).is_empty());
}

#[test]
fn missing_sibling_resource_does_not_fail_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_lines(dir.path(), "a.jsonl", &[COUNTER, GAUGE]);
    let missing = dir.path().join("b.jsonl");
    let out = dir.path().join("out.mcap");
    let (stats, diagnostics) = convert(vec![missing.clone(), input], &out);

    assert_eq!(stats.written, 2);
    assert_eq!(stats.resources, 2);
    assert_eq!(stats.resources_failed, 1);
    let errors: Vec<_> = diagnostics
        .entries()
        .into_iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].context.resource.as_deref(),
        Some(missing.display().to_string().as_str())
    );
    assert_eq!(read_messages(&out).len(), 2);
}

#[test]
fn invalid_line_is_counted_and_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_lines(dir.path(), "in.jsonl", &[GAUGE, "not json"]);
    let out = dir.path().join("out.mcap");
    let (stats, diagnostics) = convert(vec![input], &out);

    assert_eq!(stats.written, 1);
    assert_eq!(stats.errored, 1);
    assert_eq!(stats.malformed_lines, 1);
    assert!(stats.is_reconciled());
    let warning = &diagnostics.entries()[0];
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.context.line, Some(2));
}

#[test]
fn invalid_lines_do_not_stop_sibling_resources() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = write_lines(dir.path(), "a.jsonl", &["{broken", COUNTER, "", "[1,2", SET]);
    let second = write_lines(dir.path(), "b.jsonl", &[r#"{"log":{"message":"hi"}}"#, GAUGE]);
    let out = dir.path().join("out.mcap");
    let (stats, _) = convert(vec![second, first], &out);

    assert_eq!(stats.observed, 6);
    assert_eq!(stats.written, 3);
    assert_eq!(stats.errored, 3);
    assert!(stats.is_reconciled());

    // 输入按路径排序：a.jsonl 先于 b.jsonl
    let names: Vec<String> = read_messages(&out)
        .iter()
        .map(|message| decode_metric(&message.payload).name)
        .collect();
    assert_eq!(names, vec!["c1", "s1", "g1"]);
}

#[test]
fn timestamps_follow_event_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_lines(dir.path(), "in.jsonl", &[GAUGE, SET]);
    let out = dir.path().join("out.mcap");
    convert(vec![input], &out);

    for message in read_messages(&out) {
        let metric = decode_metric(&message.payload);
        let timestamp = metric.timestamp.expect("timestamp");
        let nanos = timestamp.seconds as u64 * 1_000_000_000 + timestamp.nanos as u64;
        assert_eq!(message.log_time, nanos);
        assert_eq!(message.publish_time, nanos);
    }
}

#[test]
fn rerun_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_lines(dir.path(), "in.jsonl", &[COUNTER, GAUGE, "oops", SET]);
    let out = dir.path().join("out.mcap");

    let (first_stats, _) = convert(vec![input.clone()], &out);
    let first: Vec<Vec<u8>> = read_messages(&out).into_iter().map(|m| m.payload).collect();
    let (second_stats, _) = convert(vec![input.clone(), input], &out);
    let second: Vec<Vec<u8>> = read_messages(&out).into_iter().map(|m| m.payload).collect();

    assert_eq!(first_stats, second_stats);
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn progress_does_not_change_results() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_lines(dir.path(), "in.jsonl", &[COUNTER, "nope", GAUGE]);
    let plain = dir.path().join("plain.mcap");
    let reported = dir.path().join("reported.mcap");

    let (plain_stats, _) = convert(vec![input.clone()], &plain);
    let options = ConvertOptions {
        progress_interval: Some(1),
        ..ConvertOptions::default()
    };
    let reported_stats = convert_files(
        vec![input],
        &reported,
        &options,
        Arc::new(MemoryDiagnostics::new()),
    )
    .expect("convert");

    assert_eq!(plain_stats, reported_stats);
    let plain: Vec<Vec<u8>> = read_messages(&plain).into_iter().map(|m| m.payload).collect();
    let reported: Vec<Vec<u8>> = read_messages(&reported).into_iter().map(|m| m.payload).collect();
    assert_eq!(plain, reported);
}

#[test]
fn empty_input_set_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out.mcap");
    let err = convert_files(
        Vec::new(),
        &out,
        &ConvertOptions::default(),
        Arc::new(MemoryDiagnostics::new()),
    )
    .expect_err("no inputs");
    assert!(matches!(err, PipelineError::NoInputs));
    assert!(!out.exists());
}

#[test]
fn uncreatable_destination_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_lines(dir.path(), "in.jsonl", &[COUNTER]);
    let blocker = write_lines(dir.path(), "blocker", &[]);
    let err = convert_files(
        vec![input],
        &blocker.join("out.mcap"),
        &ConvertOptions::default(),
        Arc::new(MemoryDiagnostics::new()),
    )
    .expect_err("destination");
    assert!(matches!(err, PipelineError::Destination(_)));
}
