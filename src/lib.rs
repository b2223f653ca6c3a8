//! Mojibake Patcher: one-shot repair of mis-encoded emoji in the mail template
//!
//! The generated mail-template service once round-tripped through a bad
//! Windows-1252 decode, leaving the 📄 emoji in its invoice header as the
//! byte sequence `ðŸ"„`. This tool locates the known-corrupted sequences and
//! substitutes HTML numeric character references, then rewrites the file.
//!
//! # Design
//!
//! One linear pass: read the target as UTF-8, run a fixed ordered rule set
//! ([`rules::builtin`]) over the buffer, write the buffer back atomically.
//! A rule that finds nothing is a normal outcome, not an error; only a read
//! or write failure aborts the run.
//!
//! The target path and the rule set are compiled-in constants. This is a
//! maintenance script, not a general encoding fixer: only the enumerated
//! corrupted sequences are touched.
//!
//! # Example
//!
//! ```no_run
//! use mojibake_patcher::{patch_file, rules, TARGET_FILE};
//! use std::path::Path;
//!
//! let rules = rules::builtin()?;
//! let report = patch_file(Path::new(TARGET_FILE), &rules)?;
//! if report.rewritten {
//!     println!("patched {}", report.file.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod patcher;
pub mod rules;

// Re-exports
pub use patcher::{
    patch_content, patch_file, read_target, PatchError, PatchReport, RuleOutcome, RuleReport,
    TARGET_FILE,
};
pub use rules::{builtin, Rule, RuleError};
