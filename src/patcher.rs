//! The encoding patcher: read the target file, apply the rule set in order,
//! write the result back over the same path.
//!
//! The run is a straight line with two fatal exits (read failure, write
//! failure). A rule whose pattern is absent is skipped; that is an expected
//! outcome, not an error. The write is atomic (tempfile + fsync + rename) and
//! only happens when a rule actually changed the buffer.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::rules::Rule;

/// The generated source file this tool exists to repair.
pub const TARGET_FILE: &str = "src/mail/mail.service.ts";

/// Per-rule outcome of a patch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The pattern matched and the replacement changed the buffer.
    Applied { occurrences: usize },
    /// The pattern matched but replacing produced an identical buffer
    /// (the header rule re-matches its own repaired output).
    AlreadyApplied,
    /// The pattern is absent, typically because a prior run fixed it.
    NotFound,
}

/// One rule's report: which rule, what it substitutes, what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub rule: &'static str,
    pub replacement: &'static str,
    pub outcome: RuleOutcome,
}

/// Result of a full patch run against one file.
#[derive(Debug, Clone)]
#[must_use = "PatchReport should be checked for whether the file was rewritten"]
pub struct PatchReport {
    pub file: PathBuf,
    pub rules: Vec<RuleReport>,
    /// Whether the file on disk was rewritten.
    pub rewritten: bool,
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    Utf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read the target file, decoding as UTF-8.
pub fn read_target(path: &Path) -> Result<String, PatchError> {
    let bytes = fs::read(path).map_err(|source| PatchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| PatchError::Utf8 {
        path: path.to_path_buf(),
        source: source.utf8_error(),
    })
}

/// Apply the rule set to an in-memory buffer.
///
/// Rules run in declaration order; each rule that matches replaces every
/// occurrence before the next rule is checked. Returns the final buffer and
/// one report per rule.
pub fn patch_content(content: &str, rules: &[Rule]) -> (String, Vec<RuleReport>) {
    let mut buffer = content.to_string();
    let mut reports = Vec::with_capacity(rules.len());

    for rule in rules {
        let outcome = if rule.is_match(&buffer) {
            let occurrences = rule.match_count(&buffer);
            let replaced = rule.apply(&buffer);
            if replaced == buffer {
                RuleOutcome::AlreadyApplied
            } else {
                buffer = replaced;
                RuleOutcome::Applied { occurrences }
            }
        } else {
            RuleOutcome::NotFound
        };

        reports.push(RuleReport {
            rule: rule.name(),
            replacement: rule.replacement(),
            outcome,
        });
    }

    (buffer, reports)
}

/// Patch a file on disk: read, apply the rules in order, write back.
///
/// The write is skipped entirely when no rule changed the buffer, so a
/// repeat run leaves the file untouched.
pub fn patch_file(path: &Path, rules: &[Rule]) -> Result<PatchReport, PatchError> {
    let content = read_target(path)?;

    let (patched, reports) = patch_content(&content, rules);

    let rewritten = patched != content;
    if rewritten {
        atomic_write(path, patched.as_bytes()).map_err(|source| PatchError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(PatchReport {
        file: path.to_path_buf(),
        rules: reports,
        rewritten,
    })
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the original file is untouched.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Tempfile in the same directory so the rename stays on one filesystem.
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    // Nudge mtime so the service's build watcher notices the rewrite.
    let now = filetime::FileTime::now();
    filetime::set_file_mtime(path, now)?;

    Ok(())
}
