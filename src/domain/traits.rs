// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers. The pipeline only sees these
// traits, so a different input format or an extra text rule
// plugs in without touching the orchestration code:
//   - CsvLoader implements RecordSource
//   - each text rule implements TextTransform
//   - EmbeddingModel implements Persistable

use std::path::Path;

use crate::domain::error::PipelineResult;
use crate::domain::record::ArticleRecord;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Anything that can produce the raw article/highlights rows.
///
/// Implementations:
///   - CsvLoader → a delimited file with a header row
pub trait RecordSource {
    fn load_all(&self) -> PipelineResult<Vec<ArticleRecord>>;
}

// ─── TextTransform ────────────────────────────────────────────────────────────
/// One string-to-string normalization rule.
/// Must be deterministic: the same input always gives the same output.
pub trait TextTransform {
    /// Short label used in progress output
    fn label(&self) -> &'static str;

    fn apply(&self, text: &str) -> String;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
pub trait Persistable: Sized {
    fn save(&self, path: &Path) -> PipelineResult<()>;

    fn load(path: &Path) -> PipelineResult<Self>;
}
