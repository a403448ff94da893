// ============================================================
// Layer 6 — Embedding Store
// ============================================================
// Saves and loads a trained EmbeddingModel in the plain word2vec
// text format, which most embedding tools can read:
//
//   3 4                      ← "<word count> <vector size>"
//   the 0.12 -0.40 0.08 0.91
//   cat 0.33 0.10 -0.72 0.05
//   sat ...
//
// Words never contain whitespace (they come from whitespace
// tokenization), so a single space separates every field.

use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::traits::Persistable;
use crate::ml::embedding::EmbeddingModel;

/// File name used inside an output directory
pub const EMBEDDINGS_FILE: &str = "embeddings.txt";

impl Persistable for EmbeddingModel {
    fn save(&self, path: &Path) -> PipelineResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{} {}", self.len(), self.vector_size())?;

        for (word, vector) in self.words().iter().zip(self.matrix()) {
            write!(writer, "{word}")?;
            for value in vector {
                write!(writer, " {value}")?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} embeddings to '{}'", self.len(), path.display());
        Ok(())
    }

    fn load(path: &Path) -> PipelineResult<Self> {
        let reader    = BufReader::new(File::open(path)?);
        let mut lines = reader.lines();

        // ── Header ───────────────────────────────────────────────────────────
        let header = lines
            .next()
            .ok_or_else(|| malformed(path, "file is empty"))??;
        let mut parts = header.split_whitespace();
        let count: usize = parse_field(parts.next(), path, "word count")?;
        let dim:   usize = parse_field(parts.next(), path, "vector size")?;

        // ── Rows ─────────────────────────────────────────────────────────────
        let mut words   = Vec::with_capacity(count);
        let mut vectors = Vec::with_capacity(count);

        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split(' ');
            let word = fields
                .next()
                .ok_or_else(|| malformed(path, "row without a word"))?
                .to_string();

            let vector = fields
                .map(|f| f.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| malformed(path, &format!("bad value for '{word}': {e}")))?;

            words.push(word);
            vectors.push(vector);
        }

        if words.len() != count {
            return Err(malformed(path, &format!(
                "header promises {count} words, found {}", words.len()
            )));
        }

        EmbeddingModel::new(dim, words, vectors)
    }
}

fn parse_field(field: Option<&str>, path: &Path, what: &str) -> PipelineResult<usize> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| malformed(path, &format!("header has no valid {what}")))
}

fn malformed(path: &Path, reason: &str) -> PipelineError {
    PipelineError::InvalidConfig(format!(
        "malformed embeddings file '{}': {reason}", path.display()
    ))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir   = tempfile::tempdir().unwrap();
        let path  = dir.path().join(EMBEDDINGS_FILE);
        let model = EmbeddingModel::new(
            3,
            vec!["alpha".into(), "beta".into()],
            vec![vec![0.25, -1.5, 3.0], vec![0.0, 1e-7, -0.125]],
        )
        .unwrap();

        model.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("2 3\nalpha 0.25 -1.5 3\n"));

        let loaded = EmbeddingModel::load(&path).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "2 2\nonly 1 2\n").unwrap();
        assert!(matches!(EmbeddingModel::load(&path), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_wrong_dimension_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "1 3\nword 1 2\n").unwrap();
        assert!(EmbeddingModel::load(&path).is_err());
    }
}
