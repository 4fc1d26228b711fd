use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;
use BookBlaster::data_model::BatchSummary;
use BookBlaster::executor::PipelineContext;
use BookBlaster::pipeline::language::{DetectorBackend, DetectorConfig};
use BookBlaster::producer_logic::dispatch_batch;
use BookBlaster::utils::common::BatchProgress;

fn book(paragraph: &str) -> String {
    format!(
        "<FictionBook><description>meta</description><body><p>{}</p></body></FictionBook>",
        paragraph
    )
}

fn shallow_config(dir: &Path) -> DetectorConfig {
    DetectorConfig {
        backend: DetectorBackend::FastText,
        model_path: dir.join("models/absent.bin"),
    }
}

fn context(dir: &Path, force: bool) -> PipelineContext {
    PipelineContext {
        output_dir: dir.join("output"),
        force,
        working_dir: dir.to_path_buf(),
    }
}

fn run(files: Vec<PathBuf>, dir: &Path, force: bool, workers: usize) -> BatchSummary {
    let progress = BatchProgress::hidden(workers, files.len() as u64);
    dispatch_batch(files, context(dir, force), shallow_config(dir), workers, &progress)
        .expect("dispatch should succeed regardless of file failures")
}

#[test]
fn test_failures_are_counted_not_fatal() {
    let dir = tempdir().unwrap();
    let mut files = Vec::new();
    for i in 0..7 {
        let path = dir.path().join(format!("book{}.fb2", i));
        fs::write(&path, book(&format!("Paragraph number {}", i))).unwrap();
        files.push(path);
    }
    for i in 0..3 {
        files.push(dir.path().join(format!("missing{}.fb2", i)));
    }

    let summary = run(files, dir.path(), false, 4);

    assert_eq!(
        summary,
        BatchSummary {
            processed: 7,
            ignored: 0,
            failed: 3,
            total: 10
        }
    );
    for i in 0..7 {
        let tsv = fs::read_to_string(dir.path().join(format!("output/book{}.tsv", i))).unwrap();
        assert!(tsv.ends_with(&format!("Paragraph number {}\ttext\tbook{}.fb2\t\t0", i, i)));
    }
}

#[test]
fn test_second_run_is_ignored_unless_forced() {
    let dir = tempdir().unwrap();
    let files: Vec<PathBuf> = (0..5)
        .map(|i| {
            let path = dir.path().join(format!("b{}.fb2", i));
            fs::write(&path, book("text")).unwrap();
            path
        })
        .collect();

    let first = run(files.clone(), dir.path(), false, 2);
    assert_eq!(first.processed, 5);

    let second = run(files.clone(), dir.path(), false, 2);
    assert_eq!(second.ignored, 5);
    assert_eq!(second.processed, 0);

    let forced = run(files, dir.path(), true, 2);
    assert_eq!(forced.processed, 5);
    assert_eq!(forced.ignored, 0);
}

#[test]
fn test_unsupported_encoding_fails_only_that_file() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.fb2");
    fs::write(&good, book("fine")).unwrap();
    let bad = dir.path().join("bad.fb2");
    fs::write(
        &bad,
        r#"<?xml version="1.0" encoding="no-such-charset"?><body><p>x</p></body>"#,
    )
    .unwrap();

    let summary = run(vec![bad, good], dir.path(), false, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);
    assert!(dir.path().join("output/good.tsv").exists());
    assert!(!dir.path().join("output/bad.tsv").exists());
}

#[test]
fn test_more_workers_than_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("only.fb2");
    fs::write(&path, book("alone")).unwrap();

    let summary = run(vec![path], dir.path(), false, 16);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.total, 1);
}

#[test]
fn test_creates_output_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.fb2");
    fs::write(&path, book("y")).unwrap();
    assert!(!dir.path().join("output").exists());

    run(vec![path], dir.path(), false, 1);
    assert!(dir.path().join("output/x.xml").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("output/x.xml")).unwrap(),
        "<description>meta</description>"
    );
}
