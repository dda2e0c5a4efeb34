//! End-to-end tests driving the compiled `ticket-amend` binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const AB: &str = "---
id: ab-1234
status: open
deps: []
type: task
priority: 2
tags: [backend, api]
---
# Login fails

Users cannot log in.
";

struct Project {
    root: TempDir,
}

impl Project {
    /// A project with `.tickets/ab-1234.md` and `.tickets/cd-5678.md`
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let tickets = root.path().join(".tickets");
        fs::create_dir(&tickets).unwrap();
        fs::write(tickets.join("ab-1234.md"), AB).unwrap();
        fs::write(tickets.join("cd-5678.md"), "---\nid: cd-5678\n---\n# Epic\n").unwrap();
        Self { root }
    }

    fn ticket(&self, id: &str) -> PathBuf {
        self.root.path().join(".tickets").join(format!("{}.md", id))
    }

    fn read(&self, id: &str) -> String {
        fs::read_to_string(self.ticket(id)).unwrap()
    }

    fn run(&self, args: &[&str]) -> Output {
        self.run_in(self.root.path(), args)
    }

    fn run_in(&self, cwd: &Path, args: &[&str]) -> Output {
        command(cwd).args(args).output().unwrap()
    }
}

fn command(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ticket-amend"));
    cmd.current_dir(cwd)
        .env_remove("TICKETS_DIR")
        .env_remove("TICKET_AMEND_LOG");
    cmd
}

/// Compare a ticket file with the expected text, showing a line diff on mismatch
fn assert_ticket(project: &Project, id: &str, expected: impl Into<String>) {
    let expected: String = expected.into();
    similar_asserts::assert_eq!(project.read(id), expected);
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_replace_scalar_fields() {
    let project = Project::new();
    let output = project.run(&["ab-1234", "-t", "bug", "--priority", "0", "-a", "alice"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Updated ab-1234\n");
    assert_ticket(
        &project,
        "ab-1234",
        AB.replace("type: task", "type: bug")
            .replace("priority: 2", "priority: 0")
            .replace("tags: [backend, api]\n", "tags: [backend, api]\nassignee: alice\n"),
    );
}

#[test]
fn test_tag_append_skips_duplicates() {
    let project = Project::new();
    let output = project.run(&["1234", "--tags", "api,frontend"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_ticket(
        &project,
        "ab-1234",
        AB.replace("tags: [backend, api]", "tags: [backend, api, frontend]"),
    );

    // Again with only known tags: file content is unchanged
    let output = project.run(&["ab-1234", "-T", "backend"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_ticket(
        &project,
        "ab-1234",
        AB.replace("tags: [backend, api]", "tags: [backend, api, frontend]"),
    );
}

#[test]
fn test_description_appends_accumulate() {
    let project = Project::new();
    assert!(project.run(&["ab-1234", "-d", "First."]).status.success());
    assert!(project
        .run(&["ab-1234", "--description", "Second."])
        .status
        .success());

    assert_ticket(&project, "ab-1234", format!("{}\nFirst.\n\nSecond.\n", AB));
}

#[test]
fn test_parent_accepts_partial_id() {
    let project = Project::new();
    let output = project.run(&["ab-1234", "--parent", "cd"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(project.read("ab-1234").contains("\nparent: cd-5678\n---\n"));
}

#[test]
fn test_generic_set_and_append() {
    let project = Project::new();
    let output = project.run(&[
        "ab-1234",
        "--set",
        "status=in_progress",
        "--append",
        "deps=cd-5678",
        "--append",
        "deps=cd-5678,ef-1",
    ]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_ticket(
        &project,
        "ab-1234",
        AB.replace("status: open", "status: in_progress")
            .replace("deps: []", "deps: [cd-5678, ef-1]"),
    );
}

#[test]
fn test_walk_finds_tickets_from_subdirectory() {
    let project = Project::new();
    let deep = project.root.path().join("src").join("nested").join("deeper");
    fs::create_dir_all(&deep).unwrap();

    let output = project.run_in(&deep, &["ab-1234", "-p", "1"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(project.read("ab-1234").contains("\npriority: 1\n"));
}

#[test]
fn test_override_directory_takes_precedence() {
    let project = Project::new();
    let other = tempfile::tempdir().unwrap();
    fs::write(other.path().join("ab-1234.md"), "---\nid: ab-1234\n---\n").unwrap();

    let output = command(project.root.path())
        .env("TICKETS_DIR", other.path())
        .args(["ab-1234", "-p", "4"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        fs::read_to_string(other.path().join("ab-1234.md")).unwrap(),
        "---\nid: ab-1234\npriority: 4\n---\n"
    );
    assert_ticket(&project, "ab-1234", AB);
}

#[test]
fn test_nothing_to_amend_leaves_file_untouched() {
    let project = Project::new();
    let output = project.run(&["ab-1234"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("nothing to amend"), "{}", stderr(&output));
    assert_ticket(&project, "ab-1234", AB);
}

#[test]
fn test_not_found_and_ambiguous() {
    let project = Project::new();
    fs::write(project.ticket("ab-9999"), "---\nid: ab-9999\n---\n").unwrap();

    let output = project.run(&["zz", "-p", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ticket not found: zz"), "{}", stderr(&output));

    let output = project.run(&["ab", "-p", "1"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("ambiguous"), "{}", err);
    assert!(err.contains("ab-1234, ab-9999"), "{}", err);
    assert_ticket(&project, "ab-1234", AB);
}

#[test]
fn test_missing_tickets_directory() {
    let empty = tempfile::tempdir().unwrap();
    let output = command(empty.path())
        .args(["ab-1234", "-p", "1"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("no .tickets directory found"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn test_invalid_frontmatter() {
    let project = Project::new();
    fs::write(project.ticket("bad-1"), "just text\n").unwrap();

    let output = project.run(&["bad-1", "-p", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid frontmatter"), "{}", stderr(&output));
    assert_ticket(&project, "bad-1", "just text\n");
}

#[test]
fn test_unknown_option() {
    let project = Project::new();
    let output = project.run(&["ab-1234", "--frobnicate", "x"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("unknown option: --frobnicate"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn test_missing_identifier() {
    let project = Project::new();
    let output = project.run(&["-p", "1"]);

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("missing ticket identifier"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn test_usage_and_describe_exit_zero_without_tickets() {
    let empty = tempfile::tempdir().unwrap();

    let output = command(empty.path()).output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));

    let output = command(empty.path()).arg("--help").output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("--append <KEY=VALUE>"));

    let output = command(empty.path()).arg("--tk-describe").output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "tk-plugin: Amend fields on an existing ticket\n"
    );
}

#[test]
fn test_dry_run_prints_without_writing() {
    let project = Project::new();
    let output = project.run(&["ab-1234", "--dry-run", "-e", "GH-12"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        AB.replace("tags: [backend, api]\n", "tags: [backend, api]\nexternal-ref: GH-12\n")
    );
    assert_ticket(&project, "ab-1234", AB);
}

#[test]
fn test_json_report() {
    let project = Project::new();
    let output = project.run(&["ab", "--json", "-T", "ops"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["id"], "ab-1234");
    assert_eq!(report["written"], true);
    assert_eq!(report["changes"][0]["op"], "append");
    assert_eq!(report["changes"][0]["value"], "[backend, api, ops]");
}

#[test]
fn test_version_reports_build_metadata() {
    let empty = tempfile::tempdir().unwrap();
    let output = command(empty.path()).arg("--version").output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(
        out.starts_with(concat!("ticket-amend ", env!("CARGO_PKG_VERSION"), " (built ")),
        "{}",
        out
    );
    assert!(out.trim_end().ends_with(')'), "{}", out);
}

#[test]
fn test_multiline_field_value_is_rejected() {
    let project = Project::new();
    let output = project.run(&["ab-1234", "-t", "bug\n---\nstatus"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("line breaks"), "{}", stderr(&output));
    assert_ticket(&project, "ab-1234", AB);
}

#[test]
fn test_identifier_with_path_is_not_resolved() {
    let project = Project::new();
    let readme = project.root.path().join("README.md");
    fs::write(&readme, "---\nid: readme\n---\n").unwrap();

    let output = project.run_in(&project.root.path().join(".tickets"), &["../README", "-p", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("ticket not found: ../README"),
        "{}",
        stderr(&output)
    );
    assert_eq!(fs::read_to_string(readme).unwrap(), "---\nid: readme\n---\n");
}
