use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use docfence::{Checker, Outcome, Status};

pub struct DocumentResult {
    pub path: PathBuf,
    pub outcome: Outcome,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Tally {
    fn record(&mut self, status: Status) {
        match status {
            Status::Pass => self.passed += 1,
            Status::Fail => self.failed += 1,
            Status::Skip => self.skipped += 1,
        }
    }
}

/// Resolve command-line targets into Markdown documents grouped by directory.
///
/// Files are taken as given, whatever their extension or existence, so a
/// missing file still reaches the checker and fails. Directories are searched
/// recursively for `*.md` files, skipping directories named in `exclude`.
pub fn discover(targets: &[PathBuf], exclude: &[String]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for target in targets {
        if target.is_dir() {
            collect_documents(target, exclude, &mut groups);
        } else {
            groups.entry(group_name(target)).or_default().push(target.clone());
        }
    }
    for files in groups.values_mut() {
        files.sort();
        files.dedup();
    }
    groups
}

fn group_name(path: &Path) -> String {
    path.parent()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default()
}

fn collect_documents(dir: &Path, exclude: &[String], out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "cannot read directory");
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_dir() {
            if !exclude.iter().any(|skip| skip == name) {
                collect_documents(&path, exclude, out);
            }
        } else if name.ends_with(".md") {
            out.entry(group_name(&path)).or_default().push(path);
        }
    }
}

fn status_label(status: Status, no_color: bool) -> String {
    if no_color {
        return status.to_string();
    }
    let color = match status {
        Status::Pass => 32,
        Status::Fail => 31,
        Status::Skip => 33,
    };
    format!("\x1b[{}m{}\x1b[0m", color, status)
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn emit_failure(writer: &StandardStream, result: &DocumentResult) {
    let Some(error) = result.outcome.error() else {
        return;
    };
    let files: SimpleFiles<String, String> = SimpleFiles::new();
    let config = term::Config::default();
    let diagnostic = error.to_diagnostic::<usize>();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
}

/// Check every document under `targets` and print a report to stderr.
/// Returns exit code: 0 = nothing failed, 1 = any failure.
pub fn run_checks(checker: &Checker, targets: &[PathBuf], exclude: &[String], no_color: bool) -> i32 {
    let groups = discover(targets, exclude);
    if groups.is_empty() {
        eprintln!("no Markdown documents found");
        return 1;
    }

    let mut tally = Tally::default();
    let mut failures: Vec<DocumentResult> = Vec::new();

    for (group, files) in &groups {
        let header = if group.is_empty() { "." } else { group.as_str() };
        eprintln!();
        eprintln!("{}", bold(header, no_color));

        for file in files {
            let outcome = checker.run(file);
            let status = outcome.status();
            tally.record(status);

            let label = file
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("?");
            match &outcome {
                Outcome::Pass { blocks } => {
                    eprintln!("  {}  {} ({} block(s))", status_label(status, no_color), label, blocks)
                }
                _ => eprintln!("  {}  {}", status_label(status, no_color), label),
            }

            if outcome.is_failure() {
                failures.push(DocumentResult {
                    path: file.clone(),
                    outcome,
                });
            }
        }
    }

    if !failures.is_empty() {
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        let writer = StandardStream::stderr(color_choice);
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            emit_failure(&writer, failure);
        }
    }

    eprintln!();
    eprintln!("{}", summary(&tally, no_color));
    if tally.failed == 0 { 0 } else { 1 }
}

fn summary(tally: &Tally, no_color: bool) -> String {
    let verdict = match (tally.failed, no_color) {
        (0, true) => "ok".to_string(),
        (0, false) => "\x1b[32mok\x1b[0m".to_string(),
        (_, true) => "FAILED".to_string(),
        (_, false) => "\x1b[31mFAILED\x1b[0m".to_string(),
    };
    format!(
        "check result: {}. {} passed, {} failed, {} skipped",
        verdict, tally.passed, tally.failed, tally.skipped
    )
}

/// Print the blocks `checker` would validate in `path`.
/// Returns exit code: 0 = document read, 1 = read error.
pub fn print_blocks(checker: &Checker, path: &Path) -> i32 {
    let document = match docfence::Document::load(path) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("error: {}", err);
            return 1;
        }
    };

    let blocks = checker.blocks(&document);
    if blocks.is_empty() {
        eprintln!("no '{}' blocks in {}", checker.label(), path.display());
        return 0;
    }
    for block in &blocks {
        println!("--- block #{} ---", block.index);
        print!("{}", block.content);
        if !block.content.ends_with('\n') {
            println!();
        }
    }
    0
}
