use std::fs;
use std::path::PathBuf;

use docfence::{CheckError, Checker, Extraction, Outcome, Status, run_check};
use tempfile::TempDir;

fn write_doc(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("README.md");
    fs::write(&path, text).expect("write document");
    path
}

fn check_text(text: &str) -> Outcome {
    let dir = TempDir::new().expect("tempdir");
    let path = write_doc(&dir, text);
    run_check(&path)
}

#[test]
fn no_fenced_blocks_skips() {
    let outcome = check_text("# Title\n\nJust prose, no code.\n");
    assert_eq!(outcome.status(), Status::Skip);
    assert!(outcome.error().is_none());
}

#[test]
fn single_valid_block_passes() {
    let outcome = check_text("# Config\n\n```yaml\nkey: value\n```\n");
    assert!(matches!(outcome, Outcome::Pass { blocks: 1 }), "{outcome}");
}

#[test]
fn trailing_colon_fails_with_parser_message() {
    let outcome = check_text("```yaml\nkey: value:\n```\n");
    let Outcome::Fail(CheckError::Malformed { failures, .. }) = &outcome else {
        panic!("expected malformed block, got {outcome}");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 0);
    assert!(!failures[0].message.is_empty());
    assert!(failures[0].message.contains("mapping values"), "{}", failures[0].message);
    assert!(failures[0].message.contains("line 1"), "{}", failures[0].message);
}

#[test]
fn one_bad_block_among_good_fails() {
    let outcome = check_text("```yaml\na: 1\n```\n\nand then\n\n```yaml\n- [unterminated\n```\n");
    assert_eq!(outcome.status(), Status::Fail);
    let Some(CheckError::Malformed { failures, .. }) = outcome.error() else {
        panic!("expected malformed block, got {outcome}");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
}

#[test]
fn tagged_blocks_fail() {
    let outcome = check_text("```yaml\nx: !!python/object/apply:os.system ['ls']\n```\n```yaml\nrun: !shell 'rm -rf /'\n```\n");
    let Some(CheckError::Malformed { failures, .. }) = outcome.error() else {
        panic!("expected malformed block, got {outcome}");
    };
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|f| f.message.contains("could not determine a constructor")));
}

#[test]
fn deeply_nested_block_passes() {
    let nested = format!("{}{}", "[".repeat(200), "]".repeat(200));
    let outcome = check_text(&format!("```yaml\nroot: {}\n```\n", nested));
    assert!(matches!(outcome, Outcome::Pass { blocks: 1 }), "{outcome}");
}

#[test]
fn other_labels_are_not_checked() {
    let outcome = check_text("```json\n{ this is not : valid yaml ::: [\n```\n");
    assert_eq!(outcome.status(), Status::Skip);
}

#[test]
fn every_malformed_block_is_reported() {
    let outcome = check_text("```yaml\na: [\n```\n```yaml\nok: true\n```\n```yaml\nb: c: d\n```\n");
    let Some(CheckError::Malformed { failures, .. }) = outcome.error() else {
        panic!("expected malformed block, got {outcome}");
    };
    let indices: Vec<usize> = failures.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 2]);
    let message = outcome.error().map(ToString::to_string).unwrap_or_default();
    assert!(message.contains("2 malformed block(s)"), "{message}");
    assert!(message.contains("block #0"), "{message}");
}

#[test]
fn missing_document_is_an_io_failure() {
    let dir = TempDir::new().expect("tempdir");
    let outcome = run_check(dir.path().join("absent.md"));
    let Some(err) = outcome.error() else {
        panic!("expected failure, got {outcome}");
    };
    assert!(matches!(err, CheckError::Io { .. }));
    assert_eq!(err.kind(), "missing or unreadable document");
}

#[test]
fn missing_parser_fails_instead_of_skipping() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_doc(&dir, "```yaml\nkey: value\n```\n");
    let outcome = Checker::new().with_grammar(None).run(&path);
    assert!(
        matches!(outcome, Outcome::Fail(CheckError::CapabilityMissing { .. })),
        "{outcome}"
    );
}

#[test]
fn missing_parser_still_skips_documents_without_blocks() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_doc(&dir, "nothing fenced here\n");
    let outcome = Checker::new().with_grammar(None).run(&path);
    assert_eq!(outcome.status(), Status::Skip);
}

#[test]
fn unknown_label_has_no_parser() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_doc(&dir, "```toml\na = 1\n```\n");
    let outcome = Checker::new().with_label("toml").run(&path);
    assert!(
        matches!(outcome, Outcome::Fail(CheckError::CapabilityMissing { ref label }) if label == "toml"),
        "{outcome}"
    );
}

#[test]
fn yml_label_uses_yaml_grammar() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_doc(&dir, "```yml\nkey: value\n```\n```yaml\nkey: value:\n```\n");
    let outcome = Checker::new().with_label("yml").run(&path);
    assert!(matches!(outcome, Outcome::Pass { blocks: 1 }), "{outcome}");
}

#[test]
fn repeated_runs_agree() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_doc(&dir, "```yaml\na: 1\n```\n```yaml\nb: [\n```\n");
    let before = fs::read_to_string(&path).expect("read");
    let first = run_check(&path);
    let second = run_check(&path);
    assert_eq!(first.status(), second.status());
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(fs::read_to_string(&path).expect("read"), before);
}

#[test]
fn commonmark_mode_handles_nested_fences() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_doc(
        &dir,
        "````yaml\nexample: |\n  ```yaml\n  inner: 1\n  ```\n````\n",
    );
    let outcome = Checker::new()
        .with_extraction(Extraction::CommonMark)
        .run(&path);
    assert!(matches!(outcome, Outcome::Pass { blocks: 1 }), "{outcome}");
}

#[test]
fn failure_renders_as_diagnostic() {
    let outcome = check_text("```yaml\nkey: value:\n```\n");
    let Some(err) = outcome.error() else {
        panic!("expected failure, got {outcome}");
    };
    let diagnostic = err.to_diagnostic::<usize>();
    assert!(diagnostic.message.starts_with("malformed block"));
    assert_eq!(diagnostic.notes.len(), 1);
    assert!(diagnostic.labels.is_empty());
}
