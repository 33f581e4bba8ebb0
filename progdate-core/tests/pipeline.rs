//! End-to-end pipeline tests.
//!
//! Most tests drive the pipeline with an in-memory history. The git-backed
//! tests build a throwaway repository and are skipped when `git` is not
//! installed.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;

use progdate_core::{
    GitHistory, HistoryError, HistoryQuery, Pipeline, PipelineConfig, ProgressUpdate, RunSummary,
};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// History backed by a map of path -> timestamp; unknown paths fail like an
/// uncommitted file would.
#[derive(Default)]
struct FakeHistory {
    timestamps: HashMap<String, String>,
}

impl FakeHistory {
    fn with(mut self, path: &str, timestamp: &str) -> Self {
        self.timestamps
            .insert(path.to_string(), timestamp.to_string());
        self
    }
}

impl HistoryQuery for FakeHistory {
    fn earliest_addition(&self, path: &str) -> Result<String, HistoryError> {
        self.timestamps
            .get(path)
            .cloned()
            .ok_or_else(|| HistoryError::QueryFailed {
                path: path.to_string(),
                message: "exit status: 128".to_string(),
            })
    }
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, "mov $0,1\n").expect("Failed to write program");
}

/// Run the pipeline and collect every progress update.
fn run(
    root: &Path,
    output: &Path,
    query: impl HistoryQuery,
) -> (RunSummary, Vec<ProgressUpdate>) {
    let config = PipelineConfig::new(root).with_output(output);
    let mut updates = Vec::new();
    let mut observer = |u: &ProgressUpdate| updates.push(u.clone());
    let summary = Pipeline::new(config, query)
        .run(&mut observer)
        .expect("pipeline should succeed");
    (summary, updates)
}

fn read_rows(output: &Path) -> Vec<String> {
    fs::read_to_string(output)
        .expect("Failed to read output")
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_single_program_resolves() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("programs");
    touch(&root, "00045.asm");
    let output = dir.path().join("data/program_creation_dates.csv");

    let query = FakeHistory::default().with("00045.asm", "1984-12-30T20:12:09+01:00");
    let (summary, _) = run(&root, &output, query);

    assert_eq!(read_rows(&output), vec!["program id;creation date", "45;19841230"]);
    assert_eq!(summary.rows_written, 1);
    assert_eq!(summary.paths_discovered, 1);
}

#[test]
fn test_bogus_name_is_skipped() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("programs");
    touch(&root, "bogus.asm");
    touch(&root, "00045.asm");
    let output = dir.path().join("out.csv");

    let query = FakeHistory::default()
        .with("00045.asm", "1984-12-30T20:12:09+01:00")
        .with("bogus.asm", "1984-12-30T20:12:09+01:00");
    let (summary, _) = run(&root, &output, query);

    assert_eq!(read_rows(&output), vec!["program id;creation date", "45;19841230"]);
    assert_eq!(summary.paths_discovered, 2);
    assert_eq!(summary.rows_written, 1);
    assert_eq!(summary.skipped.invalid_program_id, 1);
}

#[test]
fn test_failed_query_is_skipped() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("programs");
    touch(&root, "00010.asm");
    let output = dir.path().join("out.csv");

    let (summary, _) = run(&root, &output, FakeHistory::default());

    assert_eq!(read_rows(&output), vec!["program id;creation date"]);
    assert_eq!(summary.rows_written, 0);
    assert_eq!(summary.skipped.history_query_failed, 1);
}

#[test]
fn test_unparseable_timestamp_is_skipped() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("programs");
    touch(&root, "00010.asm");
    touch(&root, "00011.asm");
    let output = dir.path().join("out.csv");

    let query = FakeHistory::default()
        .with("00010.asm", "not a date")
        .with("00011.asm", "2019-07-01T10:00:00+02:00");
    let (summary, _) = run(&root, &output, query);

    assert_eq!(read_rows(&output), vec!["program id;creation date", "11;20190701"]);
    assert_eq!(summary.skipped.invalid_timestamp, 1);
}

#[test]
fn test_empty_root_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("programs");
    fs::create_dir_all(&root).unwrap();
    let output = dir.path().join("out.csv");

    let (summary, updates) = run(&root, &output, FakeHistory::default());

    assert_eq!(read_rows(&output), vec!["program id;creation date"]);
    assert_eq!(summary.rows_written, 0);
    assert_eq!(summary.paths_discovered, 0);
    assert!(updates.is_empty());
}

#[test]
fn test_progress_cadence_for_large_batch() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("programs");
    fs::create_dir_all(&root).unwrap();
    let mut query = FakeHistory::default();
    for id in 1..=2500 {
        let name = format!("{:05}.asm", id);
        fs::write(root.join(&name), "").unwrap();
        query = query.with(&name, "2020-01-01T00:00:00Z");
    }
    let output = dir.path().join("out.csv");

    let (summary, updates) = run(&root, &output, query);

    assert_eq!(summary.rows_written, 2500);
    assert_eq!(updates.len(), 1250);
    assert_eq!(updates[0].index, 0);
    assert_eq!(updates[1].index, 2);
    assert_eq!(updates[1].rows_written, 2);
    assert!(updates.iter().all(|u| u.total == 2500));
}

// ============================================================================
// Output Properties
// ============================================================================

#[test]
fn test_rows_follow_sorted_paths_and_reconcile() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("programs");
    touch(&root, "oeis/001/A001113.asm");
    touch(&root, "oeis/000/A000045.asm");
    touch(&root, "oeis/000/A000040.asm");
    touch(&root, "oeis/000/junk.asm");
    touch(&root, "oeis/000/notes.txt");
    let output = dir.path().join("out.csv");

    let query = FakeHistory::default()
        .with("oeis/000/A000040.asm", "2019-11-02T09:00:00+01:00")
        .with("oeis/000/A000045.asm", "2019-11-01T09:00:00+01:00")
        .with("oeis/001/A001113.asm", "2021-06-30T23:59:59-07:00");
    let (summary, _) = run(&root, &output, query);

    assert_eq!(
        read_rows(&output),
        vec![
            "program id;creation date",
            "40;20191102",
            "45;20191101",
            "1113;20210630",
        ]
    );
    assert_eq!(
        summary.rows_written + summary.skipped.total(),
        summary.paths_discovered
    );
    for row in read_rows(&output).iter().skip(1) {
        let (id, date) = row.split_once(';').unwrap();
        assert!(id.parse::<u64>().unwrap() > 0);
        assert_eq!(date.len(), 8);
        assert!(date.chars().all(|c| c.is_ascii_digit()));
    }
}

// ============================================================================
// Git Backend
// ============================================================================

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(repo: &Path, args: &[&str], date: Option<&str>) {
    let mut cmd = Command::new("git");
    cmd.current_dir(repo)
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args);
    if let Some(date) = date {
        cmd.env("GIT_AUTHOR_DATE", date).env("GIT_COMMITTER_DATE", date);
    }
    let output = cmd.output().expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_git_history_follows_renames() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let repo = dir.path();
    git(repo, &["init", "-q"], None);

    fs::write(repo.join("00045.asm"), "mov $0,1\nadd $0,2\n").unwrap();
    git(repo, &["add", "00045.asm"], None);
    git(
        repo,
        &["commit", "-q", "-m", "add program"],
        Some("1984-12-30T20:12:09+01:00"),
    );

    fs::create_dir_all(repo.join("oeis")).unwrap();
    git(repo, &["mv", "00045.asm", "oeis/00045.asm"], None);
    git(
        repo,
        &["commit", "-q", "-m", "move program"],
        Some("2001-05-05T12:00:00+00:00"),
    );

    fs::write(repo.join("oeis/00010.asm"), "mov $0,3\n").unwrap();

    let history = GitHistory::new(repo);
    let raw = history.earliest_addition("oeis/00045.asm").unwrap();
    assert!(raw.starts_with("1984-12-30T"), "unexpected timestamp {}", raw);

    assert!(history.earliest_addition("oeis/00010.asm").is_err());

    let output = dir.path().join("out.csv");
    let (summary, _) = run(repo, &output, GitHistory::new(repo));
    assert_eq!(read_rows(&output), vec!["program id;creation date", "45;19841230"]);
    assert_eq!(summary.paths_discovered, 2);
    assert_eq!(summary.skipped.total(), 1);
}

#[test]
fn test_git_outside_repository_fails_per_path() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("programs");
    touch(&root, "00010.asm");

    let history = GitHistory::new(&root);
    assert!(matches!(
        history.earliest_addition("00010.asm"),
        Err(HistoryError::QueryFailed { .. })
    ));
}
