// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates a full preparation run in order:
//
//   Step 1: Load the CSV rows            (Layer 4 - data)
//   Step 2: Build the text rules         (Layer 4 - data)
//   Step 3: Run the nine-stage pipeline  (Layer 4 / 5)
//   Step 4: Write normalized text        (Layer 6 - infra)
//   Step 5: Save embeddings + metrics    (Layer 6 - infra)
//   Step 6: Write vectors (optional)     (Layer 6 - infra)
//   Step 7: Write run summary            (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::rules_config::RulesConfig;
use crate::data::{loader::CsvLoader, pipeline::Pipeline, table::ArticleTable};
use crate::domain::traits::{Persistable, RecordSource};
use crate::infra::{
    embedding_store::EMBEDDINGS_FILE,
    metrics::MetricsLogger,
    progress::PipelineProgress,
    writer::OutputWriter,
};
use crate::ml::trainer::Word2VecConfig;

// ─── Preparation Configuration ───────────────────────────────────────────────
// Everything a run needs. Serialisable so the effective settings
// end up in summary.json next to the outputs they produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub input:         String,
    pub output_dir:    String,
    pub delimiter:     char,
    pub limit:         Option<usize>,
    pub rules:         RulesConfig,
    pub word2vec:      Word2VecConfig,
    pub write_vectors: bool,
    pub quiet:         bool,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            input:         "data/articles.csv".to_string(),
            output_dir:    "prepared".to_string(),
            delimiter:     ',',
            limit:         None,
            rules:         RulesConfig::default(),
            word2vec:      Word2VecConfig::default(),
            write_vectors: false,
            quiet:         false,
        }
    }
}

/// What a finished run reports back, also written as summary.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub rows:                  usize,
    pub article_vocab_size:    usize,
    pub highlights_vocab_size: usize,
    pub embedding_words:       usize,
    pub training_samples:      usize,
    pub final_loss:            Option<f64>,
    pub output_dir:            PathBuf,
    pub config:                PrepareConfig,
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Execute the full preparation run end to end
    pub fn execute(&self) -> Result<RunSummary> {
        let cfg = &self.config;

        if !cfg.delimiter.is_ascii() {
            anyhow::bail!("Delimiter must be a single ASCII character, got '{}'", cfg.delimiter);
        }

        // ── Step 1: Load rows ────────────────────────────────────────────────
        tracing::info!("Loading rows from '{}'", cfg.input);
        let loader = CsvLoader::new(&cfg.input)
            .with_delimiter(cfg.delimiter as u8)
            .with_limit(cfg.limit);
        let rows   = loader
            .load_all()
            .with_context(|| format!("Cannot load dataset '{}'", cfg.input))?;
        let table  = ArticleTable::new(rows)?;

        // ── Step 2: Text rules ───────────────────────────────────────────────
        let rules = cfg.rules.build()?;

        // ── Step 3: Run every stage ──────────────────────────────────────────
        let progress = if cfg.quiet {
            PipelineProgress::hidden()
        } else {
            PipelineProgress::visible()
        };
        let pipeline     = Pipeline::new(table, rules, cfg.word2vec.clone(), progress)?;
        let mut prepared = pipeline.run().context("Preparation pipeline failed")?;

        // ── Step 4: Normalized text ──────────────────────────────────────────
        let writer = OutputWriter::new(&cfg.output_dir)?;
        writer.write_normalized(prepared.table().rows())?;

        // ── Step 5: Embeddings and training loss ─────────────────────────────
        let embeddings_path = writer.path(EMBEDDINGS_FILE);
        prepared
            .embeddings()
            .save(&embeddings_path)
            .with_context(|| format!("Cannot save embeddings to '{}'", embeddings_path.display()))?;

        let metrics = MetricsLogger::new(writer.dir())?;
        metrics.log_all(&prepared.training_report().epochs)?;
        tracing::info!("Wrote training loss to '{}'", metrics.csv_path().display());

        // ── Step 6: Vectors ──────────────────────────────────────────────────
        if cfg.write_vectors {
            writer.write_vectors(prepared.table().rows())?;
        }

        // ── Step 7: Summary ──────────────────────────────────────────────────
        let report  = prepared.training_report().clone();
        let summary = RunSummary {
            rows:                  prepared.table().len(),
            article_vocab_size:    prepared.article_vocab_size(),
            highlights_vocab_size: prepared.highlights_vocab_size(),
            embedding_words:       prepared.embedding_matrix().len(),
            training_samples:      report.samples,
            final_loss:            report.epochs.last().map(|m| m.loss),
            output_dir:            writer.dir().to_path_buf(),
            config:                cfg.clone(),
        };
        writer.write_summary(&summary)?;

        tracing::info!(
            "Prepared {} rows in {} steps: article vocab {}, highlights vocab {}, {} embedded words",
            summary.rows,
            prepared.progress_steps(),
            summary.article_vocab_size,
            summary.highlights_vocab_size,
            summary.embedding_words
        );
        Ok(summary)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::writer::{NORMALIZED_FILE, SUMMARY_FILE, VECTORS_FILE};
    use crate::ml::embedding::EmbeddingModel;
    use std::fs;

    const CSV: &str = "id,article,highlights\n\
        a1,\"Hi, I'm John. Visit http://x.com or mail me@x.com\",\"John's note\"\n\
        a2,\"The cat sat on the mat.\",\"Cat sat\"\n";

    fn config(dir: &std::path::Path) -> PrepareConfig {
        let input = dir.join("input.csv");
        fs::write(&input, CSV).unwrap();
        PrepareConfig {
            input:      input.display().to_string(),
            output_dir: dir.join("out").display().to_string(),
            word2vec:   Word2VecConfig {
                vector_size: 4,
                window:      2,
                epochs:      2,
                batch_size:  4,
                ..Word2VecConfig::default()
            },
            quiet:      true,
            ..PrepareConfig::default()
        }
    }

    #[test]
    fn test_prepare_writes_outputs() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = config(dir.path());
        let summary = PrepareUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.config, cfg);

        let out        = dir.path().join("out");
        let normalized = fs::read_to_string(out.join(NORMALIZED_FILE)).unwrap();
        assert!(normalized.contains("a1,hi i am john visit or mail,john note"));

        let model = EmbeddingModel::load(&out.join(EMBEDDINGS_FILE)).unwrap();
        assert_eq!(model.len(), summary.embedding_words);
        assert_eq!(model.vector_size(), 4);

        assert!(out.join(SUMMARY_FILE).exists());
        assert!(out.join("metrics.csv").exists());
        assert!(!out.join(VECTORS_FILE).exists());
    }

    #[test]
    fn test_prepare_vectors_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PrepareConfig { write_vectors: true, ..config(dir.path()) };
        PrepareUseCase::new(cfg).execute().unwrap();

        let lines = fs::read_to_string(dir.path().join("out").join(VECTORS_FILE)).unwrap();
        assert_eq!(lines.lines().count(), 2);
    }

    #[test]
    fn test_missing_column_surfaces() {
        let dir   = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        fs::write(&input, "id,article\n1,text\n").unwrap();

        let cfg = PrepareConfig {
            input: input.display().to_string(),
            ..config(dir.path())
        };
        let err = PrepareUseCase::new(cfg).execute().unwrap_err();
        assert!(format!("{err:#}").contains("highlights"));
    }
}
