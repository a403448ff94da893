// ============================================================
// Layer 4 — Article Table
// ============================================================
// The in-memory dataset every stage mutates in place.
// Rows are never added or removed once the table exists;
// stages only rewrite field contents, and the vectorizer adds
// the two derived vector columns at the very end.

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::record::{ArticleRecord, Column, Vector};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleTable {
    rows: Vec<ArticleRecord>,
}

impl ArticleTable {
    /// Wrap loaded rows. An empty table cannot train embeddings,
    /// so it is rejected up front.
    pub fn new(rows: Vec<ArticleRecord>) -> PipelineResult<Self> {
        if rows.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ArticleRecord] {
        &self.rows
    }

    /// Iterate the text of one column, in row order
    pub fn column(&self, column: Column) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row.text(column))
    }

    /// Replace every field of one column with `f(field)`
    pub fn map_column<F>(&mut self, column: Column, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for row in &mut self.rows {
            let updated = f(row.text(column));
            *row.text_mut(column) = updated;
        }
    }

    /// Whitespace-split tokens of every row in one column
    pub fn tokenized(&self, column: Column) -> Vec<Vec<String>> {
        self.column(column)
            .map(|text| text.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    /// Attach one vector sequence per row.
    /// `vectors` must hold exactly one entry per row.
    pub fn set_vectors(&mut self, column: Column, vectors: Vec<Vec<Vector>>) -> PipelineResult<()> {
        if vectors.len() != self.rows.len() {
            return Err(PipelineError::InvalidConfig(format!(
                "{} vector rows for {} table rows",
                vectors.len(),
                self.rows.len()
            )));
        }
        for (row, seq) in self.rows.iter_mut().zip(vectors) {
            row.set_vectors(column, seq);
        }
        Ok(())
    }
}
