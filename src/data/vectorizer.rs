// ============================================================
// Layer 4 — Vectorizer
// ============================================================
// Replaces each token with its embedding vector and pads the
// sequence with zero vectors up to the column's padding target
// (the cached vocabulary size).
//
//   tokens  [hi, there]   target 4   dim 3
//   result  [v(hi), v(there), [0,0,0], [0,0,0]]
//
// Tokens missing from the embedding are dropped, not zeroed.
// A sequence already longer than the target is left as is;
// nothing is ever truncated. Each padding vector is its own
// allocation.

use crate::domain::record::Vector;
use crate::ml::embedding::EmbeddingModel;

pub fn vectorize<'a, I>(tokens: I, embeddings: &EmbeddingModel, target_len: usize) -> Vec<Vector>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sequence: Vec<Vector> = tokens
        .into_iter()
        .filter_map(|token| embeddings.get(token).map(<[f32]>::to_vec))
        .collect();

    while sequence.len() < target_len {
        sequence.push(vec![0.0; embeddings.vector_size()]);
    }

    sequence
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn embeddings() -> EmbeddingModel {
        EmbeddingModel::new(
            2,
            vec!["hi".into(), "there".into()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_pads_to_target() {
        let seq = vectorize("hi there".split_whitespace(), &embeddings(), 4);
        assert_eq!(seq, vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![0.0, 0.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn test_unknown_tokens_dropped() {
        let seq = vectorize(["hi", "stranger", "there"], &embeddings(), 0);
        assert_eq!(seq, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_no_truncation() {
        let seq = vectorize(["hi", "there", "hi"], &embeddings(), 2);
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_exact_length_when_shorter_or_equal() {
        for target in 2..6 {
            assert_eq!(vectorize(["hi", "there"], &embeddings(), target).len(), target);
        }
    }
}
