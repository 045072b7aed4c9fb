//! Free-spacing patterns with named capture groups
//!
//! Courier definitions author their patterns in free-spacing mode: whitespace
//! is insignificant and `#` starts a comment running to the end of the line.
//! Large patterns may be written as a list of fragments, which are joined
//! with a single space before compilation.
//!
//! ```yaml
//! regex:
//!   - '^ \s* 1\s*Z\s*'
//!   - '(?<SerialNumber> ([A-Z0-9]\s*){15} )'
//!   - '(?<CheckDigit> [A-Z0-9]\s* ) $'
//! ```
//!
//! Inside a character class whitespace and `#` are literal, so `[#A]` and
//! `[\-_ ]` mean what they say.
//!
//! Patterns are compiled when the definition is parsed, so a broken pattern
//! is reported by the loader and never during identification.

use crate::config;
use crate::error::{EngineError, Result};
use crate::types::Captures;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize, Serializer};

/// Pattern source as it appears in a definition document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PatternSource {
    /// Whole pattern in one string
    Single(String),
    /// Pattern authored in pieces
    Fragments(Vec<String>),
}

impl PatternSource {
    /// Assemble the source text that gets compiled.
    pub fn assemble(&self) -> String {
        match self {
            PatternSource::Single(s) => s.clone(),
            PatternSource::Fragments(parts) => parts.join(" "),
        }
    }
}

/// A compiled free-spacing pattern.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "PatternSource")]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern from its source text.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Configuration` for a blank pattern (it would
    /// match every input) and `EngineError::InvalidPattern` if the source
    /// does not compile.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();

        if source.trim().is_empty() {
            return Err(EngineError::Configuration(
                "Pattern source is empty".to_string(),
            ));
        }

        let regex = RegexBuilder::new(&escape_class_literals(&source))
            .ignore_whitespace(true)
            .size_limit(config::MAX_COMPILED_PATTERN_SIZE)
            .build()
            .map_err(|e| EngineError::InvalidPattern {
                pattern: source.clone(),
                source: Box::new(e),
            })?;

        Ok(Self { source, regex })
    }

    /// The source text this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of all named groups in the pattern, in declaration order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.regex.capture_names().flatten()
    }

    /// Run the pattern and collect the named groups that participated.
    ///
    /// Returns `None` when the pattern does not match.
    pub fn captures(&self, haystack: &str) -> Option<Captures> {
        let caps = self.regex.captures(haystack)?;

        Some(
            self.group_names()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.to_string(), m.as_str().to_string()))
                })
                .collect(),
        )
    }

    /// Whether the pattern matches anywhere in the haystack.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    /// Whether the leftmost match in the haystack is non-empty.
    ///
    /// Lookup entries use this so that patterns which can match the empty
    /// string (e.g. `[0-9]*`) do not select every value.
    pub fn matches_non_empty(&self, haystack: &str) -> bool {
        self.regex.find(haystack).is_some_and(|m| !m.is_empty())
    }
}

/// Escape whitespace and `#` inside character classes.
///
/// Free-spacing mode in the regex crate would otherwise drop class
/// whitespace and treat `#` as the start of a comment. Escape sequences and
/// comments outside classes are copied unchanged.
fn escape_class_literals(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut class_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '#' if class_depth == 0 => {
                out.push(c);
                for rest in chars.by_ref() {
                    out.push(rest);
                    if rest == '\n' {
                        break;
                    }
                }
            }
            '[' => {
                out.push(c);
                class_depth += 1;
                // A `]` right after the opening bracket (or `[^`) is literal
                if chars.peek() == Some(&'^') {
                    out.push('^');
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if class_depth > 0 => {
                out.push(c);
                class_depth -= 1;
            }
            c if class_depth > 0 && (c == '#' || c.is_whitespace()) => {
                out.push_str(&format!("\\x{{{:X}}}", u32::from(c)));
            }
            c => out.push(c),
        }
    }

    out
}

impl TryFrom<PatternSource> for Pattern {
    type Error = EngineError;

    fn try_from(source: PatternSource) -> Result<Self> {
        Pattern::new(source.assemble())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}
