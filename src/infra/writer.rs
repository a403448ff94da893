// ============================================================
// Layer 6 — Output Writer
// ============================================================
// Writes the artifacts of a preparation run into one directory:
//
//   normalized.csv  — id (when present), article, highlights
//   vectors.jsonl   — one JSON object per row with both padded
//                     vector sequences (opt-in: it is huge, every
//                     row is padded to the column vocabulary size)
//   summary.json    — row count, vocabulary sizes, config
//
// The embedding matrix itself goes through EmbeddingStore and
// the epoch losses through MetricsLogger.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::record::{ArticleRecord, Column, Vector};

pub const NORMALIZED_FILE: &str = "normalized.csv";
pub const VECTORS_FILE:    &str = "vectors.jsonl";
pub const SUMMARY_FILE:    &str = "summary.json";

#[derive(Serialize)]
struct NormalizedRow<'a> {
    id:         Option<&'a str>,
    article:    &'a str,
    highlights: &'a str,
}

#[derive(Serialize)]
struct VectorRow<'a> {
    row:                usize,
    article_vectors:    &'a [Vector],
    highlights_vectors: &'a [Vector],
}

pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Normalized text of every row, in input order
    pub fn write_normalized(&self, rows: &[ArticleRecord]) -> Result<PathBuf> {
        let path       = self.path(NORMALIZED_FILE);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;

        for row in rows {
            writer.serialize(NormalizedRow {
                id:         row.id.as_deref(),
                article:    &row.article,
                highlights: &row.highlights,
            })?;
        }
        writer.flush()?;

        tracing::info!("Wrote {} normalized rows to '{}'", rows.len(), path.display());
        Ok(path)
    }

    /// One JSON line per row with both vector sequences
    pub fn write_vectors(&self, rows: &[ArticleRecord]) -> Result<PathBuf> {
        let path    = self.path(VECTORS_FILE);
        let mut out = BufWriter::new(
            File::create(&path).with_context(|| format!("Cannot create '{}'", path.display()))?,
        );

        for (i, row) in rows.iter().enumerate() {
            let line = VectorRow {
                row:                i,
                article_vectors:    row.vectors(Column::Article).unwrap_or_default(),
                highlights_vectors: row.vectors(Column::Highlights).unwrap_or_default(),
            };
            serde_json::to_writer(&mut out, &line)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;

        tracing::info!("Wrote vectors for {} rows to '{}'", rows.len(), path.display());
        Ok(path)
    }

    pub fn write_summary<T: Serialize>(&self, summary: &T) -> Result<PathBuf> {
        let path = self.path(SUMMARY_FILE);
        fs::write(&path, serde_json::to_string_pretty(summary)?)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        Ok(path)
    }
}
