// ============================================================
// Layer 4 — Normalization Tables
// ============================================================
// The two read-only tables the text rules are built from:
//
//   ContractionTable — contracted form → expanded form
//   PunctuationSet   — characters removed from every field
//
// Both are plain values injected into the pipeline when it is
// constructed; nothing here is process-wide state.
//
// Contraction ORDER matters. The expander compiles the keys
// into one alternation, and the first alternative that matches
// wins. A key that is a prefix of another ("can't" / "can't've")
// must come after the longer one or the longer one never fires.
// Keys are lowercase because case normalization runs first.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::domain::error::{PipelineError, PipelineResult};

/// Built-in contraction table, in match priority order.
pub const DEFAULT_CONTRACTIONS: &[(&str, &str)] = &[
    ("ain't", "am not"),
    ("aren't", "are not"),
    ("can't've", "cannot have"),
    ("can't", "cannot"),
    ("'cause", "because"),
    ("could've", "could have"),
    ("couldn't've", "could not have"),
    ("couldn't", "could not"),
    ("didn't", "did not"),
    ("doesn't", "does not"),
    ("don't", "do not"),
    ("hadn't've", "had not have"),
    ("hadn't", "had not"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("he'd've", "he would have"),
    ("he'd", "he would"),
    ("he'll've", "he will have"),
    ("he'll", "he will"),
    ("he's", "he is"),
    ("how'd'y", "how do you"),
    ("how'd", "how did"),
    ("how'll", "how will"),
    ("how's", "how is"),
    ("i'd've", "i would have"),
    ("i'd", "i would"),
    ("i'll've", "i will have"),
    ("i'll", "i will"),
    ("i'm", "i am"),
    ("i've", "i have"),
    ("isn't", "is not"),
    ("it'd've", "it would have"),
    ("it'd", "it would"),
    ("it'll've", "it will have"),
    ("it'll", "it will"),
    ("it's", "it is"),
    ("let's", "let us"),
    ("ma'am", "madam"),
    ("mayn't", "may not"),
    ("might've", "might have"),
    ("mightn't've", "might not have"),
    ("mightn't", "might not"),
    ("must've", "must have"),
    ("mustn't've", "must not have"),
    ("mustn't", "must not"),
    ("needn't've", "need not have"),
    ("needn't", "need not"),
    ("o'clock", "of the clock"),
    ("oughtn't've", "ought not have"),
    ("oughtn't", "ought not"),
    ("shan't've", "shall not have"),
    ("sha'n't", "shall not"),
    ("shan't", "shall not"),
    ("she'd've", "she would have"),
    ("she'd", "she would"),
    ("she'll've", "she will have"),
    ("she'll", "she will"),
    ("she's", "she is"),
    ("should've", "should have"),
    ("shouldn't've", "should not have"),
    ("shouldn't", "should not"),
    ("so've", "so have"),
    ("so's", "so is"),
    ("that'd've", "that would have"),
    ("that'd", "that would"),
    ("that's", "that is"),
    ("there'd've", "there would have"),
    ("there'd", "there would"),
    ("there's", "there is"),
    ("they'd've", "they would have"),
    ("they'd", "they would"),
    ("they'll've", "they will have"),
    ("they'll", "they will"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("to've", "to have"),
    ("wasn't", "was not"),
    ("we'd've", "we would have"),
    ("we'd", "we would"),
    ("we'll've", "we will have"),
    ("we'll", "we will"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("weren't", "were not"),
    ("what'll've", "what will have"),
    ("what'll", "what will"),
    ("what're", "what are"),
    ("what's", "what is"),
    ("what've", "what have"),
    ("when's", "when is"),
    ("when've", "when have"),
    ("where'd", "where did"),
    ("where's", "where is"),
    ("where've", "where have"),
    ("who'll've", "who will have"),
    ("who'll", "who will"),
    ("who's", "who is"),
    ("who've", "who have"),
    ("why's", "why is"),
    ("why've", "why have"),
    ("will've", "will have"),
    ("won't've", "will not have"),
    ("won't", "will not"),
    ("would've", "would have"),
    ("wouldn't've", "would not have"),
    ("wouldn't", "would not"),
    ("y'all'd've", "you all would have"),
    ("y'all'd", "you all would"),
    ("y'all're", "you all are"),
    ("y'all've", "you all have"),
    ("y'all", "you all"),
    ("you'd've", "you would have"),
    ("you'd", "you would"),
    ("you'll've", "you will have"),
    ("you'll", "you will"),
    ("you're", "you are"),
    ("you've", "you have"),
];

/// ASCII punctuation plus the typographic marks common in news copy.
pub const DEFAULT_PUNCTUATION: &str =
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~“”‘’–—…";

// ─── ContractionTable ─────────────────────────────────────────────────────────
/// Ordered contraction → expansion mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractionTable {
    /// Entries in match priority order
    entries: Vec<(String, String)>,
    lookup:  HashMap<String, String>,
}

impl ContractionTable {
    /// Build a table from ordered pairs.
    /// A repeated key keeps its first position and first expansion.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> PipelineResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = Vec::new();
        let mut lookup  = HashMap::new();

        for (key, value) in pairs {
            let key   = key.into();
            let value = value.into();
            if key.is_empty() {
                return Err(PipelineError::InvalidConfig(
                    "contraction keys must not be empty".to_string(),
                ));
            }
            if !lookup.contains_key(&key) {
                lookup.insert(key.clone(), value.clone());
                entries.push((key, value));
            }
        }

        if entries.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "contraction table has no entries".to_string(),
            ));
        }

        Ok(Self { entries, lookup })
    }

    /// Read a JSON object `{ "isn't": "is not", ... }`.
    /// Key order in the file is the match priority.
    pub fn from_json_file(path: &Path) -> PipelineResult<Self> {
        let raw = fs::read_to_string(path)?;
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::InvalidConfig(format!(
                "cannot parse contraction table '{}': {e}", path.display()
            )))?;

        let mut pairs = Vec::with_capacity(map.len());
        for (key, value) in map {
            let expansion = value.as_str().ok_or_else(|| PipelineError::InvalidConfig(
                format!("expansion for '{key}' must be a string"),
            ))?;
            pairs.push((key, expansion.to_string()));
        }

        tracing::info!("Loaded {} contractions from '{}'", pairs.len(), path.display());
        Self::new(pairs)
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn expansion(&self, key: &str) -> Option<&str> {
        self.lookup.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ContractionTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_CONTRACTIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            lookup: DEFAULT_CONTRACTIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

// ─── PunctuationSet ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunctuationSet {
    chars: HashSet<char>,
}

impl PunctuationSet {
    pub fn new(chars: &str) -> Self {
        Self { chars: chars.chars().collect() }
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }
}

impl Default for PunctuationSet {
    fn default() -> Self {
        Self::new(DEFAULT_PUNCTUATION)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table_prefix_order() {
        // Every key that is a prefix of a later key would shadow it.
        let keys: Vec<&str> = DEFAULT_CONTRACTIONS.iter().map(|(k, _)| *k).collect();
        for (i, short) in keys.iter().enumerate() {
            for long in &keys[i + 1..] {
                assert!(
                    !long.starts_with(short),
                    "'{short}' is listed before '{long}' and would shadow it"
                );
            }
        }
    }

    #[test]
    fn test_default_keys_are_lowercase() {
        for (key, _) in DEFAULT_CONTRACTIONS {
            assert_eq!(*key, key.to_lowercase());
        }
    }

    #[test]
    fn test_empty_table_rejected() {
        let pairs: Vec<(String, String)> = Vec::new();
        assert!(matches!(
            ContractionTable::new(pairs),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let table = ContractionTable::new([("isn't", "is not"), ("isn't", "was not")]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.expansion("isn't"), Some("is not"));
    }

    #[test]
    fn test_json_file_preserves_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"won't": "will not", "can't": "cannot", "ain't": "am not"}}"#).unwrap();

        let table = ContractionTable::from_json_file(file.path()).unwrap();
        let keys: Vec<&str> = table.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["won't", "can't", "ain't"]);
    }

    #[test]
    fn test_json_file_rejects_non_string_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"won't": 3}}"#).unwrap();
        assert!(ContractionTable::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_punctuation_set_membership() {
        let set = PunctuationSet::default();
        assert!(set.contains(','));
        assert!(set.contains('’'));
        assert!(!set.contains('a'));
        assert!(!set.contains(' '));
    }
}
