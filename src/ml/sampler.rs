// ============================================================
// Layer 5 — Negative Sampler
// ============================================================
// Draws "noise" words for negative sampling from the unigram
// distribution raised to the 3/4 power, the usual word2vec
// choice: frequent words are drawn often, rare words a little
// more often than their raw frequency would give.
//
//   P(w) ∝ count(w)^0.75
//
// Draws are reproducible: each training sample gets its own
// StdRng seeded from (run seed, epoch, sample id), so the same
// sample sees the same negatives no matter which batch it lands
// in or how the loader orders batches.

use rand::{
    distributions::{Distribution, WeightedIndex},
    rngs::StdRng,
    SeedableRng,
};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::ml::vocab::CorpusVocabulary;

const NOISE_POWER: f64 = 0.75;

#[derive(Debug, Clone)]
pub struct NegativeSampler {
    noise:    WeightedIndex<f64>,
    negative: usize,
}

impl NegativeSampler {
    /// `negative` words drawn per training sample
    pub fn new(vocab: &CorpusVocabulary, negative: usize) -> PipelineResult<Self> {
        let weights = vocab
            .words()
            .iter()
            .map(|w| (vocab.count(w).unwrap_or(0) as f64).powf(NOISE_POWER));

        let noise = WeightedIndex::new(weights).map_err(|e| {
            PipelineError::EmbeddingTrainingFailure(format!("cannot build noise distribution: {e}"))
        })?;

        Ok(Self { noise, negative })
    }

    pub fn negative(&self) -> usize {
        self.negative
    }

    /// The noise ids for one sample of one epoch
    pub fn draw(&self, seed: u64, epoch: usize, sample: usize) -> Vec<u32> {
        let mut rng = StdRng::seed_from_u64(mix(seed, epoch as u64, sample as u64));
        (0..self.negative)
            .map(|_| self.noise.sample(&mut rng) as u32)
            .collect()
    }
}

/// Fold the three inputs into one well-spread 64-bit seed
fn mix(seed: u64, epoch: u64, sample: u64) -> u64 {
    let mut x = seed
        ^ epoch.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ sample.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    x ^= x >> 33;
    x  = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    x
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(raw: &[&str]) -> CorpusVocabulary {
        let sentences: Vec<Vec<String>> = raw
            .iter()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .collect();
        CorpusVocabulary::build(&sentences, 1)
    }

    #[test]
    fn test_draws_are_reproducible() {
        let sampler = NegativeSampler::new(&vocab(&["a b c d e f", "a a b"]), 5).unwrap();
        assert_eq!(sampler.draw(42, 1, 7), sampler.draw(42, 1, 7));
        assert_eq!(sampler.draw(42, 1, 7).len(), 5);
    }

    #[test]
    fn test_draws_stay_in_vocabulary() {
        let v       = vocab(&["x y z"]);
        let sampler = NegativeSampler::new(&v, 20).unwrap();
        for sample in 0..50 {
            assert!(sampler.draw(1, 2, sample).iter().all(|&id| (id as usize) < v.len()));
        }
    }

    #[test]
    fn test_frequent_words_drawn_more() {
        let v       = vocab(&["common common common common common common common common rare"]);
        let sampler = NegativeSampler::new(&v, 10).unwrap();
        let common  = v.id("common").unwrap();

        let draws: Vec<u32> = (0..200).flat_map(|i| sampler.draw(3, 1, i)).collect();
        let hits = draws.iter().filter(|&&id| id == common).count();
        assert!(hits > draws.len() / 2);
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        assert!(NegativeSampler::new(&CorpusVocabulary::default(), 5).is_err());
    }
}
