// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Loads article/highlights rows from a delimited file using the
// csv crate.
//
// Expected layout (CNN/DailyMail style):
//
//   id,article,highlights
//   0001,"LONDON (CNN) -- ...","Highlights text ..."
//
// Only `article` and `highlights` are required, located by
// header name so column order does not matter. An `id` column
// is carried through when present; any other column is
// ignored. Quoted fields may span lines.

use std::path::PathBuf;

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::record::{ArticleRecord, Column};
use crate::domain::traits::RecordSource;

/// Loads rows from a CSV (or other single-byte delimited) file.
/// Implements the RecordSource trait from Layer 3.
pub struct CsvLoader {
    path:      PathBuf,
    delimiter: u8,
    /// Stop after this many data rows
    limit:     Option<usize>,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), delimiter: b',', limit: None }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

impl RecordSource for CsvLoader {
    fn load_all(&self) -> PipelineResult<Vec<ArticleRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_path(&self.path)?;

        // ── Locate columns by name ───────────────────────────────────────────
        let headers   = reader.headers()?.clone();
        let find      = |name: &str| headers.iter().position(|h| h.trim() == name);
        let article   = find(Column::Article.name())
            .ok_or_else(|| PipelineError::MissingColumn(Column::Article.name().to_string()))?;
        let highlight = find(Column::Highlights.name())
            .ok_or_else(|| PipelineError::MissingColumn(Column::Highlights.name().to_string()))?;
        let id        = find("id");

        // ── Read rows ────────────────────────────────────────────────────────
        let mut rows = Vec::new();
        for result in reader.records() {
            if self.limit.is_some_and(|limit| rows.len() >= limit) {
                break;
            }
            let record = result?;
            let field  = |i: usize| record.get(i).unwrap_or_default().to_string();

            let mut row = ArticleRecord::new(field(article), field(highlight));
            if let Some(i) = id {
                row = row.with_id(field(i));
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }

        tracing::info!("Loaded {} rows from '{}'", rows.len(), self.path.display());
        Ok(rows)
    }
}
