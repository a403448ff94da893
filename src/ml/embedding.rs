// ============================================================
// Layer 5 — Trained Embedding Model
// ============================================================
// The result of embedding training: one fixed-length vector
// per vocabulary word. Vectors never change after training,
// so lookups are plain borrows.

use std::collections::HashMap;

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::record::Vector;

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingModel {
    vector_size: usize,
    words:       Vec<String>,
    index:       HashMap<String, usize>,
    vectors:     Vec<Vector>,
}

impl EmbeddingModel {
    /// Pair each word with its vector.
    /// Every vector must have `vector_size` components.
    pub fn new(vector_size: usize, words: Vec<String>, vectors: Vec<Vector>) -> PipelineResult<Self> {
        if words.len() != vectors.len() {
            return Err(PipelineError::EmbeddingTrainingFailure(format!(
                "{} words but {} vectors", words.len(), vectors.len()
            )));
        }
        if let Some(bad) = vectors.iter().position(|v| v.len() != vector_size) {
            return Err(PipelineError::EmbeddingTrainingFailure(format!(
                "vector for '{}' has {} components, expected {}",
                words[bad], vectors[bad].len(), vector_size
            )));
        }

        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();

        Ok(Self { vector_size, words, index, vectors })
    }

    /// Split a row-major [words × vector_size] buffer into per-word vectors
    pub fn from_flat(vector_size: usize, words: Vec<String>, flat: Vec<f32>) -> PipelineResult<Self> {
        if vector_size == 0 || flat.len() != words.len() * vector_size {
            return Err(PipelineError::EmbeddingTrainingFailure(format!(
                "weight buffer of {} values does not fit {} words × {}",
                flat.len(), words.len(), vector_size
            )));
        }
        let vectors = flat.chunks(vector_size).map(<[f32]>::to_vec).collect();
        Self::new(vector_size, words, vectors)
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).map(|&i| self.vectors[i].as_slice())
    }

    /// Every trained vector, one row per vocabulary word
    pub fn matrix(&self) -> &[Vector] {
        &self.vectors
    }

    /// The `top_n` words closest to `word` by cosine similarity
    pub fn most_similar(&self, word: &str, top_n: usize) -> PipelineResult<Vec<(String, f32)>> {
        let query = self.get(word).ok_or_else(|| {
            PipelineError::PredictionInputInvalid(format!("'{word}' is not in the vocabulary"))
        })?;

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(i, _)| self.words[*i] != word)
            .map(|(i, v)| (i, cosine_similarity(query, v)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(top_n)
            .map(|(i, sim)| (self.words[i].clone(), sim))
            .collect())
    }
}

/// Cosine similarity, 0.0 when either vector has zero length
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32    = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> EmbeddingModel {
        EmbeddingModel::new(
            2,
            vec!["up".into(), "north".into(), "down".into()],
            vec![vec![0.0, 1.0], vec![0.1, 0.9], vec![0.0, -1.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let m = model();
        assert_eq!(m.get("down"), Some(&[0.0, -1.0][..]));
        assert!(m.get("left").is_none());
        assert_eq!(m.matrix().len(), 3);
    }

    #[test]
    fn test_from_flat_rejects_bad_shape() {
        assert!(EmbeddingModel::from_flat(2, vec!["a".into()], vec![1.0, 2.0, 3.0]).is_err());
        let m = EmbeddingModel::from_flat(2, vec!["a".into(), "b".into()], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.get("b"), Some(&[3.0, 4.0][..]));
    }

    #[test]
    fn test_most_similar_ranks_by_cosine() {
        let similar = model().most_similar("up", 2).unwrap();
        assert_eq!(similar[0].0, "north");
        assert_eq!(similar[1].0, "down");
        assert_relative_eq!(similar[1].1, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_most_similar_unknown_word() {
        assert!(matches!(
            model().most_similar("left", 3),
            Err(PipelineError::PredictionInputInvalid(_))
        ));
    }

    #[test]
    fn test_cosine_of_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
