// ============================================================
// Layer 4 — Preparation Pipeline
// ============================================================
// Runs the nine stages over an ArticleTable, strictly in order:
//
//   1. CaseNormalizer        lowercase              (2 steps)
//   2. ContractionExpander   you're → you are       (2 steps)
//   3. Redactor              emails, then URLs      (4 steps)
//   4. PossessiveStripper    's / ’s                (2 steps)
//   5. PunctuationStripper   configured char set    (2 steps)
//   6. WhitespaceNormalizer  collapse spaces        (2 steps)
//   7. VocabularySizer       distinct tokens + 1    (silent)
//   8. EmbeddingTrainer      CBOW over both columns (1 step)
//   9. Vectorizer            tokens → padded vectors (2 steps)
//
// Each stage finishes over every row (article column first)
// before the next begins. The pipeline refuses to run a stage
// unless every earlier stage has completed, so the ordering is
// checked rather than implied by call order.
//
// Any error aborts the run; there is no resume. Start a new
// Pipeline from the raw rows to try again.

use crate::data::preprocessor::TextRules;
use crate::data::table::ArticleTable;
use crate::data::vectorizer::vectorize;
use crate::data::vocabulary::VocabularySizer;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::record::{Column, Vector};
use crate::domain::stage::Stage;
use crate::domain::traits::TextTransform;
use crate::infra::progress::PipelineProgress;
use crate::ml::embedding::EmbeddingModel;
use crate::ml::trainer::{train_embeddings, TrainingReport, Word2VecConfig};

pub struct Pipeline {
    table:      ArticleTable,
    rules:      TextRules,
    word2vec:   Word2VecConfig,
    sizer:      VocabularySizer,
    embeddings: Option<EmbeddingModel>,
    report:     TrainingReport,
    /// Last stage that completed, None before the first
    completed:  Option<Stage>,
    progress:   PipelineProgress,
}

impl Pipeline {
    /// Set up a run over `table` in the "raw input loaded" state
    pub fn new(
        table:    ArticleTable,
        rules:    TextRules,
        word2vec: Word2VecConfig,
        progress: PipelineProgress,
    ) -> PipelineResult<Self> {
        if table.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }
        word2vec.validate()?;

        Ok(Self {
            table,
            rules,
            word2vec,
            sizer:      VocabularySizer::new(),
            embeddings: None,
            report:     TrainingReport::default(),
            completed:  None,
            progress,
        })
    }

    /// The stage allowed to run next, None once vectors are computed
    pub fn next_stage(&self) -> Option<Stage> {
        match self.completed {
            None        => Some(Stage::first()),
            Some(stage) => stage.next(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.completed.is_some() && self.next_stage().is_none()
    }

    /// Run exactly one stage. Fails unless `stage` is `next_stage()`.
    pub fn run_stage(&mut self, stage: Stage) -> PipelineResult<()> {
        if self.next_stage() != Some(stage) {
            return Err(PipelineError::StageOutOfOrder {
                expected:  self.next_stage()
                    .map(|s| s.name().to_string())
                    .unwrap_or_else(|| "nothing (pipeline finished)".to_string()),
                requested: stage,
            });
        }

        tracing::debug!("Running stage: {}", stage);
        let ticks_before = self.progress.position();

        match stage {
            Stage::CaseNormalizer => {
                transform_columns(&mut self.table, &self.progress, &self.rules.lowercase);
            }
            Stage::ContractionExpander => {
                transform_columns(&mut self.table, &self.progress, &self.rules.contractions);
            }
            Stage::Redactor => {
                transform_columns(&mut self.table, &self.progress, &self.rules.emails);
                transform_columns(&mut self.table, &self.progress, &self.rules.urls);
            }
            Stage::PossessiveStripper => {
                transform_columns(&mut self.table, &self.progress, &self.rules.possessives);
            }
            Stage::PunctuationStripper => {
                transform_columns(&mut self.table, &self.progress, &self.rules.punctuation);
            }
            Stage::WhitespaceNormalizer => {
                transform_columns(&mut self.table, &self.progress, &self.rules.spaces);
            }
            Stage::VocabularySizer => {
                // Running this stage is the one thing that recounts
                self.sizer.invalidate();
                for column in Column::ALL {
                    let size = self.sizer.size(column, &self.table);
                    tracing::info!("Vocabulary size ({}): {}", column, size);
                }
            }
            Stage::EmbeddingTrainer => self.train()?,
            Stage::Vectorizer       => self.vectorize()?,
        }

        debug_assert_eq!(
            self.progress.position() - ticks_before,
            stage.progress_steps(),
            "stage '{stage}' reported the wrong number of progress steps"
        );

        self.completed = Some(stage);
        Ok(())
    }

    /// Run every remaining stage and hand back the result
    pub fn run(mut self) -> PipelineResult<PreparedCorpus> {
        while let Some(stage) = self.next_stage() {
            self.run_stage(stage)?;
        }
        self.progress.finish();
        self.into_prepared()
    }

    fn train(&mut self) -> PipelineResult<()> {
        self.progress.begin("training word2vec");

        // Union of both columns: every article row, then every highlights row
        let mut sentences = self.table.tokenized(Column::Article);
        sentences.extend(self.table.tokenized(Column::Highlights));

        let (model, report) = train_embeddings(&sentences, &self.word2vec)?;
        self.embeddings = Some(model);
        self.report     = report;

        self.progress.advance();
        Ok(())
    }

    fn vectorize(&mut self) -> PipelineResult<()> {
        let embeddings = self.embeddings.as_ref().ok_or_else(|| {
            PipelineError::EmbeddingTrainingFailure("no embedding model after training".to_string())
        })?;

        for column in Column::ALL {
            self.progress.begin(&format!("word2vec - {column}"));

            let target = self.sizer.size(column, &self.table);
            let vectors: Vec<Vec<Vector>> = self
                .table
                .column(column)
                .map(|text| vectorize(text.split_whitespace(), embeddings, target))
                .collect();
            self.table.set_vectors(column, vectors)?;

            self.progress.advance();
        }
        Ok(())
    }

    fn into_prepared(self) -> PipelineResult<PreparedCorpus> {
        if !self.is_finished() {
            let expected = self.next_stage().map(|s| s.name()).unwrap_or_default();
            return Err(PipelineError::InvalidConfig(format!(
                "pipeline stopped before '{expected}'"
            )));
        }
        let embeddings = self.embeddings.ok_or_else(|| {
            PipelineError::EmbeddingTrainingFailure("no embedding model after training".to_string())
        })?;

        Ok(PreparedCorpus {
            table:    self.table,
            embeddings,
            sizer:    self.sizer,
            report:   self.report,
            progress: self.progress.position(),
        })
    }
}

/// Apply one rule to the article column, then the highlights column
fn transform_columns(table: &mut ArticleTable, progress: &PipelineProgress, rule: &dyn TextTransform) {
    for column in Column::ALL {
        progress.begin(&format!("{} - {}", rule.label(), column));
        table.map_column(column, |text| rule.apply(text));
        progress.advance();
    }
}

// ─── PreparedCorpus ───────────────────────────────────────────────────────────
/// Terminal state of a run: normalized text, vectors, and the
/// trained embedding model.
pub struct PreparedCorpus {
    table:      ArticleTable,
    embeddings: EmbeddingModel,
    sizer:      VocabularySizer,
    report:     TrainingReport,
    progress:   u64,
}

impl PreparedCorpus {
    pub fn table(&self) -> &ArticleTable {
        &self.table
    }

    pub fn embeddings(&self) -> &EmbeddingModel {
        &self.embeddings
    }

    /// All trained word vectors, one row per vocabulary word
    pub fn embedding_matrix(&self) -> &[Vector] {
        self.embeddings.matrix()
    }

    pub fn article_vocab_size(&mut self) -> usize {
        self.sizer.size(Column::Article, &self.table)
    }

    pub fn highlights_vocab_size(&mut self) -> usize {
        self.sizer.size(Column::Highlights, &self.table)
    }

    pub fn training_report(&self) -> &TrainingReport {
        &self.report
    }

    /// Progress steps reported during the run
    pub fn progress_steps(&self) -> u64 {
        self.progress
    }
}
