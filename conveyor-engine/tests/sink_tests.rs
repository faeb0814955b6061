use conveyor_engine::sink::mock::MemorySink;
use conveyor_engine::{ConsoleSink, FileSink, ResultSink};

// ── FileSink ─────────────────────────────────────────────────────

#[tokio::test]
async fn file_sink_writes_one_file_per_result() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FileSink::new(dir.path());

    sink.write_result("lang_1", "lang : rust\n").await.unwrap();
    sink.write_result("allItems_2", "lang : rust\n").await.unwrap();

    let first = std::fs::read_to_string(dir.path().join("lang_1")).unwrap();
    let second = std::fs::read_to_string(dir.path().join("allItems_2")).unwrap();
    assert_eq!(first, "lang : rust\n");
    assert_eq!(second, "lang : rust\n");
}

#[tokio::test]
async fn file_sink_appends_on_name_reuse() {
    // Names never collide in practice; append keeps reuse harmless.
    let dir = tempfile::tempdir().unwrap();
    let sink = FileSink::new(dir.path());

    sink.write_result("a_1", "one\n").await.unwrap();
    sink.write_result("a_1", "two\n").await.unwrap();

    let content = std::fs::read_to_string(dir.path().join("a_1")).unwrap();
    assert_eq!(content, "one\ntwo\n");
}

#[tokio::test]
async fn file_sink_missing_directory_errors() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FileSink::new(dir.path().join("does-not-exist"));
    assert!(sink.write_result("a_1", "x\n").await.is_err());
}

#[tokio::test]
async fn file_sink_empty_content() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FileSink::new(dir.path());

    sink.write_result("allItems_1", "").await.unwrap();
    let content = std::fs::read_to_string(dir.path().join("allItems_1")).unwrap();
    assert!(content.is_empty());
}

// ── ConsoleSink ──────────────────────────────────────────────────

#[tokio::test]
async fn console_sink_accepts_writes() {
    let sink = ConsoleSink::new();
    sink.write_result("a_1", "a : 1\n").await.unwrap();
}

// ── MemorySink ───────────────────────────────────────────────────

#[tokio::test]
async fn memory_sink_records_in_order() {
    let sink = MemorySink::new();
    assert!(sink.is_empty());

    sink.write_result("a_1", "a : 1\n").await.unwrap();
    sink.write_result("b_2", "b : 2\n").await.unwrap();

    assert_eq!(sink.len(), 2);
    assert_eq!(
        sink.results(),
        vec![
            ("a_1".to_string(), "a : 1\n".to_string()),
            ("b_2".to_string(), "b : 2\n".to_string()),
        ]
    );
}
