// tests/router_tests.rs - Destination selection, handle reuse and JSON output

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use warcsplit::{FaultKind, OutputRouter, Record, RouterConfig};

const LANGUAGE_FIELD: &str = "WARC-Identified-Content-Language";

fn record(language: Option<&str>, body: &str) -> Record {
    let mut record = Record::new();
    if let Some(language) = language {
        record.set_field(LANGUAGE_FIELD, language);
    }
    record.append_body(body);
    record
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_missing_language_routes_to_default() {
    let dir = TempDir::new().unwrap();
    let mut router = OutputRouter::new(RouterConfig::new(dir.path()));

    router.route(&record(None, "hello\n")).unwrap();
    router.close().unwrap();

    let lines = read_lines(&dir.path().join("eng").join("output.jsonl"));
    assert_eq!(lines, vec![r#"{"data":"hello\n"}"#]);
}

#[test]
fn test_language_list_is_joined_with_underscores() {
    let dir = TempDir::new().unwrap();
    let mut router = OutputRouter::new(RouterConfig::new(dir.path()));

    router.route(&record(Some("eng,fra"), "bonjour\n")).unwrap();
    let summary = router.close().unwrap();

    let expected = dir.path().join("eng_fra").join("output.jsonl");
    assert!(expected.exists());
    assert_eq!(summary.destinations, vec![(expected, 1)]);
}

#[test]
fn test_language_field_lookup_ignores_case() {
    let dir = TempDir::new().unwrap();
    let mut router = OutputRouter::new(RouterConfig::new(dir.path()));

    let mut rec = Record::new();
    rec.set_field("warc-identified-content-language", "deu");
    router.route(&rec).unwrap();
    router.close().unwrap();

    assert!(dir.path().join("deu").join("output.jsonl").exists());
}

#[test]
fn test_same_language_reuses_one_handle_in_order() {
    let dir = TempDir::new().unwrap();
    let mut router = OutputRouter::new(RouterConfig::new(dir.path()));

    for i in 0..1000 {
        router
            .route(&record(Some("spa"), &format!("line {}\n", i)))
            .unwrap();
        assert_eq!(router.open_destinations(), 1);
    }
    let summary = router.close().unwrap();
    assert_eq!(summary.total_records(), 1000);

    let lines = read_lines(&dir.path().join("spa").join("output.jsonl"));
    assert_eq!(lines.len(), 1000);
    for (i, line) in lines.iter().enumerate() {
        let decoded: Record = serde_json::from_str(line).unwrap();
        assert_eq!(decoded.body(), format!("line {}\n", i));
    }
}

#[test]
fn test_records_round_trip_without_html_escaping() {
    let dir = TempDir::new().unwrap();
    let mut router = OutputRouter::new(RouterConfig::new(dir.path()));

    let mut original = record(Some("eng"), "<b>Tom & \"Jerry\"</b>\n\ttab\n");
    original.set_field("WARC-Target-URI", "http://example.com/?a=1&b=<2>");
    router.route(&original).unwrap();
    router.close().unwrap();

    let lines = read_lines(&dir.path().join("eng").join("output.jsonl"));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("<b>Tom & \\\"Jerry\\\"</b>"));
    assert!(lines[0].contains("a=1&b=<2>"));

    let decoded: Record = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_existing_output_is_appended() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("eng").join("output.jsonl");
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, "{\"data\":\"earlier\"}\n").unwrap();

    let mut router = OutputRouter::new(RouterConfig::new(dir.path()));
    router.route(&record(None, "later")).unwrap();
    router.close().unwrap();

    assert_eq!(
        read_lines(&target),
        vec![r#"{"data":"earlier"}"#, r#"{"data":"later"}"#]
    );
}

#[test]
fn test_custom_file_name_and_default_language() {
    let dir = TempDir::new().unwrap();
    let mut config = RouterConfig::new(dir.path());
    config.file_name = "sample.jsonl".to_string();
    config.default_language = "und".to_string();

    let mut router = OutputRouter::new(config);
    router.route(&record(None, "x")).unwrap();
    router.close().unwrap();

    assert!(dir.path().join("und").join("sample.jsonl").exists());
}

#[test]
fn test_unwritable_root_is_output_fault() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();

    let mut router = OutputRouter::new(RouterConfig::new(&blocker));
    let err = router.route(&record(None, "x")).unwrap_err();

    assert_eq!(err.fault_kind(), FaultKind::Output);
    assert_eq!(router.open_destinations(), 0);
}

#[test]
fn test_dropping_router_flushes_partial_output() {
    let dir = TempDir::new().unwrap();
    {
        let mut router = OutputRouter::new(RouterConfig::new(dir.path()));
        router.route(&record(Some("ita"), "ciao")).unwrap();
    }

    let lines = read_lines(&dir.path().join("ita").join("output.jsonl"));
    assert_eq!(lines.len(), 1);
}
