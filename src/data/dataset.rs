// ============================================================
// Layer 4 — CBOW Training Samples
// ============================================================
// Turns tokenized rows into (context → target) examples for the
// continuous-bag-of-words embedding trainer.
//
// Every row is an independent sentence: windows never cross
// from one row into the next, or from an article into its
// highlights. For each position the context is up to `window`
// tokens on the left and `window` on the right:
//
//   window = 2, tokens: the cat sat on mats
//   target "sat" → context [the, cat, on, mats]
//   target "the" → context [cat, sat]
//
// Tokens below the vocabulary's min_count are removed before
// windowing. A position with no context at all (a one-word row)
// yields no sample.
//
// Each sample carries its position in the sample list so the
// negative sampler can seed its draws per sample.

use std::sync::Arc;

use burn::data::dataset::Dataset;

use crate::ml::vocab::CorpusVocabulary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CbowSample {
    /// Vocabulary ids around the target, left to right, at most 2 × window
    pub context: Vec<u32>,
    pub target:  u32,
    /// Position in the full sample list
    pub id:      usize,
}

pub fn build_samples(
    sentences: &[Vec<String>],
    vocab:     &CorpusVocabulary,
    window:    usize,
) -> Vec<CbowSample> {
    let mut samples = Vec::new();

    for sentence in sentences {
        let ids: Vec<u32> = sentence.iter().filter_map(|w| vocab.id(w)).collect();

        for (pos, &target) in ids.iter().enumerate() {
            let start = pos.saturating_sub(window);
            let end   = (pos + window + 1).min(ids.len());

            let context: Vec<u32> = (start..end)
                .filter(|&i| i != pos)
                .map(|i| ids[i])
                .collect();

            if !context.is_empty() {
                samples.push(CbowSample { context, target, id: samples.len() });
            }
        }
    }

    samples
}

/// Shares one sample list across the per-epoch loaders
pub struct CbowDataset {
    samples: Arc<Vec<CbowSample>>,
}

impl CbowDataset {
    pub fn new(samples: Arc<Vec<CbowSample>>) -> Self { Self { samples } }
}

impl Dataset<CbowSample> for CbowDataset {
    fn get(&self, index: usize) -> Option<CbowSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_window_is_symmetric_and_clamped() {
        let sents   = corpus(&["the cat sat on mats"]);
        let vocab   = CorpusVocabulary::build(&sents, 1);
        let samples = build_samples(&sents, &vocab, 2);
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().enumerate().all(|(i, s)| s.id == i));

        let id = |w: &str| vocab.id(w).unwrap();
        let sat = samples.iter().find(|s| s.target == id("sat")).unwrap();
        assert_eq!(sat.context, vec![id("the"), id("cat"), id("on"), id("mats")]);

        let the = samples.iter().find(|s| s.target == id("the")).unwrap();
        assert_eq!(the.context, vec![id("cat"), id("sat")]);
    }

    #[test]
    fn test_rows_do_not_share_windows() {
        let sents   = corpus(&["alpha", "beta gamma"]);
        let vocab   = CorpusVocabulary::build(&sents, 1);
        let samples = build_samples(&sents, &vocab, 5);
        // "alpha" alone has no context
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.target != vocab.id("alpha").unwrap()));
    }

    #[test]
    fn test_dataset_indexing() {
        let ds = CbowDataset::new(Arc::new(vec![CbowSample { context: vec![1], target: 0, id: 0 }]));
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.get(0).map(|s| s.target), Some(0));
        assert!(ds.get(1).is_none());
    }
}
