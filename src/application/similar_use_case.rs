// ============================================================
// Layer 2 — Similar Use Case
// ============================================================
// Loads an embeddings.txt written by `prepare` and lists the
// words closest to a query word by cosine similarity.

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::traits::Persistable;
use crate::ml::embedding::EmbeddingModel;

pub struct SimilarUseCase {
    model: EmbeddingModel,
}

impl SimilarUseCase {
    pub fn new(embeddings: &Path) -> Result<Self> {
        let model = EmbeddingModel::load(embeddings)
            .with_context(|| format!("Cannot load embeddings '{}'", embeddings.display()))?;
        tracing::info!("Loaded {} word vectors (dim {})", model.len(), model.vector_size());
        Ok(Self { model })
    }

    /// Up to `top` nearest words, best first. The query is lowercased
    /// since every stored word went through the case normalizer.
    pub fn similar(&self, word: &str, top: usize) -> Result<Vec<(String, f32)>> {
        let query = word.trim().to_lowercase();
        Ok(self.model.most_similar(&query, top)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn saved_model(dir: &Path) -> std::path::PathBuf {
        let path  = dir.join("embeddings.txt");
        let model = EmbeddingModel::new(
            2,
            vec!["king".into(), "queen".into(), "apple".into()],
            vec![vec![1.0, 0.1], vec![0.9, 0.2], vec![-1.0, 0.0]],
        )
        .unwrap();
        model.save(&path).unwrap();
        path
    }

    #[test]
    fn test_nearest_word_first() {
        let dir      = tempfile::tempdir().unwrap();
        let use_case = SimilarUseCase::new(&saved_model(dir.path())).unwrap();
        let result   = use_case.similar("King", 2).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].0, "queen");
        assert_eq!(result[1].0, "apple");
    }

    #[test]
    fn test_unknown_word_is_error() {
        let dir      = tempfile::tempdir().unwrap();
        let use_case = SimilarUseCase::new(&saved_model(dir.path())).unwrap();
        assert!(use_case.similar("banana", 3).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(SimilarUseCase::new(Path::new("/no/such/embeddings.txt")).is_err());
    }
}
