// ============================================================
// Layer 2 — Text Rule Configuration
// ============================================================
// Where the contraction table and punctuation set come from.
// Both default to the built-in tables; either can be replaced:
//
//   contractions  path to a JSON object {"isn't": "is not", ...}
//                 (key order is kept and matters for overlaps)
//   punctuation   literal string of characters to strip

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::preprocessor::TextRules;
use crate::data::tables::{ContractionTable, PunctuationSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub contractions: Option<String>,
    pub punctuation:  Option<String>,
}

impl RulesConfig {
    pub fn build(&self) -> Result<TextRules> {
        let table = match &self.contractions {
            Some(path) => ContractionTable::from_json_file(Path::new(path))
                .with_context(|| format!("Cannot load contraction table '{path}'"))?,
            None => ContractionTable::default(),
        };
        let punctuation = match &self.punctuation {
            Some(chars) => PunctuationSet::new(chars),
            None        => PunctuationSet::default(),
        };

        tracing::debug!(
            "Text rules: {} contractions, {} punctuation chars",
            table.len(),
            punctuation.len()
        );
        Ok(TextRules::new(table, punctuation)?)
    }
}
