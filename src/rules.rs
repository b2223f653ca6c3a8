//! The fixed substitution rule set.
//!
//! Each rule pairs a compiled regex with a literal replacement. The rules are
//! evaluated in declaration order and each one rewrites the buffer before the
//! next is checked, so later rules see the output of earlier rules.

use regex::{NoExpand, Regex};
use thiserror::Error;

/// An ordered substitution rule: a search pattern and its literal replacement.
#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid pattern for rule '{name}': {source}")]
    BadPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}

impl Rule {
    /// Compile a rule, validating its pattern.
    pub fn new(
        name: &'static str,
        pattern: &str,
        replacement: &'static str,
    ) -> Result<Self, RuleError> {
        let pattern = Regex::new(pattern).map_err(|source| RuleError::BadPattern { name, source })?;
        Ok(Self {
            name,
            pattern,
            replacement,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn replacement(&self) -> &'static str {
        self.replacement
    }

    /// Whether the pattern matches anywhere in the buffer.
    pub fn is_match(&self, buffer: &str) -> bool {
        self.pattern.is_match(buffer)
    }

    /// Number of non-overlapping matches in the buffer.
    pub fn match_count(&self, buffer: &str) -> usize {
        self.pattern.find_iter(buffer).count()
    }

    /// Replace every match with the replacement text.
    ///
    /// The replacement is literal; `$` sequences are not expanded.
    pub fn apply(&self, buffer: &str) -> String {
        self.pattern
            .replace_all(buffer, NoExpand(self.replacement))
            .into_owned()
    }
}

/// HTML numeric character reference for U+1F4C4 (the page-facing-up emoji).
///
/// The repaired template embeds the reference rather than the raw multi-byte
/// emoji, so the generated source can never be mangled the same way again.
const PAGE_EMOJI_REF: &str = "&#128196;";

/// The UTF-8 bytes of U+1F4C4 after the bad decode, exactly as the sequence
/// appears in the damaged file: `ðŸ"„` (the third character is a plain ASCII
/// quote, which needs no regex escaping).
const PAGE_EMOJI_MOJIBAKE: &str = "\u{f0}\u{178}\"\u{201e}";

/// The mojibake above mangled once more: each of its UTF-8 bytes read back
/// as a Latin-1 character. Seen in copies of the file that went through a
/// second bad decode.
const PAGE_EMOJI_MOJIBAKE_DOUBLE: &str =
    "\u{c3}\u{b0}\u{c5}\u{b8}\u{e2}\u{80}\u{9c}\u{e2}\u{80}\u{9d}";

/// The built-in rule set, in the order it must be applied.
pub fn builtin() -> Result<Vec<Rule>, RuleError> {
    Ok(vec![
        Rule::new("document-emoji", PAGE_EMOJI_MOJIBAKE, PAGE_EMOJI_REF)?,
        Rule::new(
            "document-emoji-double",
            PAGE_EMOJI_MOJIBAKE_DOUBLE,
            PAGE_EMOJI_REF,
        )?,
        Rule::new(
            "invoice-header",
            "<h1>[^<]*Nueva Factura</h1>",
            "<h1>&#128196; Nueva Factura</h1>",
        )?,
    ])
}
