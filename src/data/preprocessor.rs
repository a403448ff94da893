// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// The six string-level rules the pipeline applies to both the
// article and the highlights, in this order:
//
//   1. Lowercase            "Hi" → "hi"
//   2. ContractionExpander  "you're" → "you are"
//   3. EmailRedactor        "mail me@x.com" → "mail "
//      UrlRedactor          "see www.x.com/a" → "see "
//   4. PossessiveStripper   "john's" → "john"
//   5. PunctuationStripper  "wait, no!" → "wait no"
//   6. SpaceCollapser       "a   b" → "a b"
//
// These rules are deliberately blunt and must stay that way,
// because the downstream model input depends on the exact text:
//   - contractions and possessives match as raw substrings,
//     including inside longer words
//   - redactions are replaced with nothing, not with a space,
//     so neighbouring words can merge
//   - only the literal space character is collapsed; tabs and
//     newlines survive, and a single leading/trailing space is
//     not trimmed

use regex::{Captures, Regex};

use crate::data::tables::{ContractionTable, PunctuationSet};
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::traits::TextTransform;

/// Any non-whitespace run containing '@'
pub const EMAIL_PATTERN: &str = r"\S+@\S+";

/// Scheme or "www." prefix, a domain or dotted IPv4 host, optional path
pub const URL_PATTERN: &str = concat!(
    r"((http://|https://|ftp://)|(www.))+",
    r"(([a-zA-Z0-9.-]+\.[a-zA-Z]{2,4})|([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}))",
    r"(/[a-zA-Z0-9%:/-_\?\.'~]*)?",
);

/// Possessive markers, removed in this order:
/// straight, curly, backslash-escaped straight, backslash-escaped curly
pub const POSSESSIVE_MARKERS: [&str; 4] = ["'s", "’s", "\\'s", "\\’s"];

// ─── 1. Lowercase ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default)]
pub struct Lowercase;

impl TextTransform for Lowercase {
    fn label(&self) -> &'static str {
        "lowercase"
    }

    fn apply(&self, text: &str) -> String {
        text.to_lowercase()
    }
}

// ─── 2. Contractions ──────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct ContractionExpander {
    table:   ContractionTable,
    pattern: Regex,
}

impl ContractionExpander {
    /// Compile every key into one alternation, keeping table order.
    /// Keys are escaped, so they always match as literal text.
    pub fn new(table: ContractionTable) -> PipelineResult<Self> {
        if table.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "contraction table has no entries".to_string(),
            ));
        }

        let alternation = table
            .entries()
            .iter()
            .map(|(key, _)| regex::escape(key))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!("({alternation})"))?;

        Ok(Self { table, pattern })
    }
}

impl TextTransform for ContractionExpander {
    fn label(&self) -> &'static str {
        "replace contractions"
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                self.table.expansion(matched).unwrap_or(matched).to_string()
            })
            .into_owned()
    }
}

// ─── 3. Redaction ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct EmailRedactor {
    pattern: Regex,
}

impl EmailRedactor {
    pub fn new() -> PipelineResult<Self> {
        Ok(Self { pattern: Regex::new(EMAIL_PATTERN)? })
    }
}

impl TextTransform for EmailRedactor {
    fn label(&self) -> &'static str {
        "remove email ids"
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, "").into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct UrlRedactor {
    pattern: Regex,
}

impl UrlRedactor {
    pub fn new() -> PipelineResult<Self> {
        Ok(Self { pattern: Regex::new(URL_PATTERN)? })
    }
}

impl TextTransform for UrlRedactor {
    fn label(&self) -> &'static str {
        "remove urls"
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, "").into_owned()
    }
}

// ─── 4. Possessives ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default)]
pub struct PossessiveStripper;

impl TextTransform for PossessiveStripper {
    fn label(&self) -> &'static str {
        "remove possessives"
    }

    fn apply(&self, text: &str) -> String {
        POSSESSIVE_MARKERS
            .iter()
            .fold(text.to_string(), |acc, marker| acc.replace(marker, ""))
    }
}

// ─── 5. Punctuation ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default)]
pub struct PunctuationStripper {
    set: PunctuationSet,
}

impl PunctuationStripper {
    pub fn new(set: PunctuationSet) -> Self {
        Self { set }
    }
}

impl TextTransform for PunctuationStripper {
    fn label(&self) -> &'static str {
        "remove punctuation"
    }

    fn apply(&self, text: &str) -> String {
        // Character filter, no notion of words
        text.chars().filter(|c| !self.set.contains(*c)).collect()
    }
}

// ─── 6. Spaces ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceCollapser;

impl TextTransform for SpaceCollapser {
    fn label(&self) -> &'static str {
        "remove white space"
    }

    fn apply(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = false;

        for c in text.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out
    }
}

// ─── TextRules ────────────────────────────────────────────────────────────────
/// The full rule set, built once and shared by every row.
#[derive(Debug, Clone)]
pub struct TextRules {
    pub lowercase:    Lowercase,
    pub contractions: ContractionExpander,
    pub emails:       EmailRedactor,
    pub urls:         UrlRedactor,
    pub possessives:  PossessiveStripper,
    pub punctuation:  PunctuationStripper,
    pub spaces:       SpaceCollapser,
}

impl TextRules {
    pub fn new(contractions: ContractionTable, punctuation: PunctuationSet) -> PipelineResult<Self> {
        Ok(Self {
            lowercase:    Lowercase,
            contractions: ContractionExpander::new(contractions)?,
            emails:       EmailRedactor::new()?,
            urls:         UrlRedactor::new()?,
            possessives:  PossessiveStripper,
            punctuation:  PunctuationStripper::new(punctuation),
            spaces:       SpaceCollapser,
        })
    }

    /// Rules in the order the pipeline applies them
    pub fn in_order(&self) -> [&dyn TextTransform; 7] {
        [
            &self.lowercase,
            &self.contractions,
            &self.emails,
            &self.urls,
            &self.possessives,
            &self.punctuation,
            &self.spaces,
        ]
    }

    /// Run every text rule over one string.
    /// Same result as the pipeline's text stages give for one field.
    pub fn normalize(&self, text: &str) -> String {
        self.in_order()
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }
}
