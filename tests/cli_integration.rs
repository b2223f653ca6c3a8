//! Integration tests for the CLI
//!
//! Drives the built binary against a throwaway workspace holding a copy of
//! the target file, and checks exit codes, console notices, and on-disk
//! results.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const MOJIBAKE: &str = "\u{f0}\u{178}\u{22}\u{201e}";

/// Helper to create a workspace containing the hard-coded target path.
fn setup_workspace(content: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let mail_dir = dir.path().join("src/mail");
    fs::create_dir_all(&mail_dir).unwrap();
    fs::write(mail_dir.join("mail.service.ts"), content).unwrap();
    dir
}

fn target_content(workspace: &TempDir) -> String {
    fs::read_to_string(workspace.path().join("src/mail/mail.service.ts")).unwrap()
}

/// Run the patcher binary with the workspace as working directory.
fn run_patcher(workspace: &Path, extra_args: &[&str]) -> Output {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--quiet", "--manifest-path"])
        .arg(&manifest)
        .arg("--")
        .args(extra_args)
        .current_dir(workspace);

    cmd.output().unwrap()
}

fn corrupted_template() -> String {
    format!(
        "const html = `\n<h1>Nueva Factura</h1>\n<p>Adjunto: {MOJIBAKE} factura.pdf</p>\n`;\n"
    )
}

const REPAIRED_TEMPLATE: &str =
    "const html = `\n<h1>&#128196; Nueva Factura</h1>\n<p>Adjunto: &#128196; factura.pdf</p>\n`;\n";

#[test]
fn test_help() {
    let output = run_patcher(Path::new("."), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Repair mis-encoded emoji sequences"));
}

#[test]
fn test_patch_corrupted_file() {
    let workspace = setup_workspace(&corrupted_template());

    let output = run_patcher(workspace.path(), &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("document-emoji"));
    assert!(stdout.contains("invoice-header"));
    assert!(stdout.contains("File patched and saved"));
    assert!(stdout.contains("Restart the mail backend"));

    assert_eq!(target_content(&workspace), REPAIRED_TEMPLATE);
}

#[test]
fn test_second_run_is_noop() {
    let workspace = setup_workspace(&corrupted_template());

    let first = run_patcher(workspace.path(), &[]);
    assert!(first.status.success());
    let after_first = target_content(&workspace);

    let second = run_patcher(workspace.path(), &[]);
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("nothing to rewrite"));

    assert_eq!(target_content(&workspace), after_first);
}

#[test]
fn test_clean_file_untouched() {
    let content = "const html = `<h1>Recordatorio</h1>`;\n";
    let workspace = setup_workspace(content);

    let output = run_patcher(workspace.path(), &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pattern not present"));
    assert_eq!(target_content(&workspace), content);
}

#[test]
fn test_dry_run_leaves_file_alone() {
    let original = corrupted_template();
    let workspace = setup_workspace(&original);

    let output = run_patcher(workspace.path(), &["--dry-run"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DRY RUN"));
    assert!(stdout.contains("would replace"));
    assert!(!stdout.contains("Restart the mail backend"));

    assert_eq!(target_content(&workspace), original);
}

#[test]
fn test_diff_output() {
    let workspace = setup_workspace(&corrupted_template());

    let output = run_patcher(workspace.path(), &["--diff"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(original)"));
    assert!(stdout.contains("(patched)"));
    assert!(stdout.contains("+<h1>&#128196; Nueva Factura</h1>"));
}

#[test]
fn test_missing_target_fails() {
    let workspace = TempDir::new().unwrap();

    let output = run_patcher(workspace.path(), &[]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stdout.contains("Restart the mail backend"));
    assert!(stderr.contains("failed to read"));
}
