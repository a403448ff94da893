// ============================================================
// Layer 4 — Vocabulary Sizer
// ============================================================
// Counts distinct whitespace tokens across a WHOLE column and
// adds one for the reserved index. That number is also used as
// the padding target for every row of the column, which mixes
// "corpus vocabulary" with "sequence length". The downstream
// model's input shape depends on it, so it is kept as is.
//
// Each column is computed at most once per pipeline run. Later
// calls return the cached value even if the column changed in
// between; only `invalidate` clears it.

use std::collections::{HashMap, HashSet};

use crate::data::table::ArticleTable;
use crate::domain::record::Column;

#[derive(Debug, Clone, Default)]
pub struct VocabularySizer {
    cache: HashMap<Column, usize>,
}

impl VocabularySizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct tokens in `column` plus one, memoized per column
    pub fn size(&mut self, column: Column, table: &ArticleTable) -> usize {
        *self.cache.entry(column).or_insert_with(|| {
            let size = distinct_tokens(table, column) + 1;
            tracing::debug!("Vocabulary size for '{}': {}", column, size);
            size
        })
    }

    /// Forget every cached size; the next `size` call recounts
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }
}

fn distinct_tokens(table: &ArticleTable, column: Column) -> usize {
    table
        .column(column)
        .flat_map(|text| text.split_whitespace())
        .collect::<HashSet<_>>()
        .len()
}
