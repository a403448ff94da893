// ============================================================
// Layer 4 — CBOW Batcher
// ============================================================
// Implements burn's Batcher trait to stack CbowSamples into
// tensors for one optimizer step with negative sampling.
//
// A batch only touches the embedding rows of the words it
// mentions (context words, targets, drawn negatives), so word ids
// are remapped to a small local index. The trainer gathers just
// those rows into a batch-sized model and writes them back after
// the step; the cost of a step never depends on vocabulary size.
//
//   global ids  context [812, 9]  target 40  negatives [3, 812]
//   rows        [812, 9, 40, 3]
//   local ids   context [0, 1]    candidates [2, 3, 0]
//
// Contexts have different lengths (fewer neighbours near the
// edges of a row), so every context is right-padded to the full
// width 2 × window. A float mask marks which slots are real:
//
//   context [0, 1]     width 4 → ids  [0, 1, 0, 0]
//                               mask [1, 1, 0, 0]
//
// Candidates are the target followed by the negatives. Labels are
// +1 for the target and -1 for a negative; a negative that hits
// the target itself gets weight 0 so it is not pushed away.

use std::{collections::HashMap, sync::Arc};

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::CbowSample;
use crate::ml::sampler::NegativeSampler;

#[derive(Debug, Clone)]
pub struct CbowBatch<B: Backend> {
    /// Global vocabulary id of every local row, in local order
    pub rows: Vec<u32>,

    /// Local context ids — shape: [batch_size, width]
    pub context: Tensor<B, 2, Int>,

    /// 1.0 for a real context slot, 0.0 for padding — shape: [batch_size, width]
    pub mask: Tensor<B, 2>,

    /// Local ids of target then negatives — shape: [batch_size, 1 + negative]
    pub candidates: Tensor<B, 2, Int>,

    /// +1.0 for the target, -1.0 for negatives — shape: [batch_size, 1 + negative]
    pub labels: Tensor<B, 2>,

    /// 0.0 where a negative equals the target — shape: [batch_size, 1 + negative]
    pub weights: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct CbowBatcher<B: Backend> {
    pub device:  B::Device,
    /// Padded context width, 2 × window
    pub width:   usize,
    pub sampler: Arc<NegativeSampler>,
    pub seed:    u64,
    pub epoch:   usize,
}

impl<B: Backend> CbowBatcher<B> {
    pub fn new(
        device:  B::Device,
        width:   usize,
        sampler: Arc<NegativeSampler>,
        seed:    u64,
        epoch:   usize,
    ) -> Self {
        Self { device, width, sampler, seed, epoch }
    }
}

/// Global → local row mapping, in first-seen order
#[derive(Default)]
struct LocalRows {
    index: HashMap<u32, usize>,
    rows:  Vec<u32>,
}

impl LocalRows {
    fn slot(&mut self, id: u32) -> i64 {
        let next = self.rows.len();
        let slot = *self.index.entry(id).or_insert(next);
        if slot == next {
            self.rows.push(id);
        }
        slot as i64
    }
}

impl<B: Backend> Batcher<CbowSample, CbowBatch<B>> for CbowBatcher<B> {
    fn batch(&self, items: Vec<CbowSample>) -> CbowBatch<B> {
        let batch_size = items.len();
        let span       = 1 + self.sampler.negative();
        let mut local  = LocalRows::default();

        let mut ids:        Vec<i64> = Vec::with_capacity(batch_size * self.width);
        let mut mask:       Vec<f32> = Vec::with_capacity(batch_size * self.width);
        let mut candidates: Vec<i64> = Vec::with_capacity(batch_size * span);
        let mut labels:     Vec<f32> = Vec::with_capacity(batch_size * span);
        let mut weights:    Vec<f32> = Vec::with_capacity(batch_size * span);

        for sample in &items {
            // ── Context, padded to width ─────────────────────────────────────
            for slot in 0..self.width {
                match sample.context.get(slot) {
                    Some(&id) => {
                        ids.push(local.slot(id));
                        mask.push(1.0);
                    }
                    None => {
                        ids.push(0);
                        mask.push(0.0);
                    }
                }
            }

            // ── Target, then negatives ───────────────────────────────────────
            candidates.push(local.slot(sample.target));
            labels.push(1.0);
            weights.push(1.0);

            for noise in self.sampler.draw(self.seed, self.epoch, sample.id) {
                candidates.push(local.slot(noise));
                labels.push(-1.0);
                weights.push(if noise == sample.target { 0.0 } else { 1.0 });
            }
        }

        let context = Tensor::<B, 2, Int>::from_data(
            TensorData::new(ids, [batch_size, self.width]), &self.device,
        );
        let mask = Tensor::<B, 2>::from_data(
            TensorData::new(mask, [batch_size, self.width]), &self.device,
        );
        let candidates = Tensor::<B, 2, Int>::from_data(
            TensorData::new(candidates, [batch_size, span]), &self.device,
        );
        let labels = Tensor::<B, 2>::from_data(
            TensorData::new(labels, [batch_size, span]), &self.device,
        );
        let weights = Tensor::<B, 2>::from_data(
            TensorData::new(weights, [batch_size, span]), &self.device,
        );

        CbowBatch { rows: local.rows, context, mask, candidates, labels, weights }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::vocab::CorpusVocabulary;
    use burn::backend::NdArray;

    fn sampler(words: usize, negative: usize) -> Arc<NegativeSampler> {
        let sentence: Vec<String> = (0..words).map(|i| format!("w{i}")).collect();
        let vocab = CorpusVocabulary::build(&[sentence], 1);
        Arc::new(NegativeSampler::new(&vocab, negative).unwrap())
    }

    fn sample(context: Vec<u32>, target: u32, id: usize) -> CbowSample {
        CbowSample { context, target, id }
    }

    #[test]
    fn test_padding_mask_and_local_ids() {
        let batcher = CbowBatcher::<NdArray>::new(Default::default(), 4, sampler(50, 2), 42, 1);
        let batch   = batcher.batch(vec![
            sample(vec![40, 9], 7, 0),
            sample(vec![9, 3, 40, 1], 40, 1),
        ]);

        assert_eq!(batch.context.dims(), [2, 4]);
        let mask: Vec<f32> = batch.mask.into_data().to_vec().unwrap();
        assert_eq!(mask, vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);

        // Every local id maps back to the global id it replaced
        let ids: Vec<i64> = batch.context.into_data().convert::<i64>().to_vec().unwrap();
        let global: Vec<u32> = ids.iter().map(|&i| batch.rows[i as usize]).collect();
        assert_eq!(&global[..2], &[40, 9]);
        assert_eq!(&global[4..], &[9, 3, 40, 1]);

        assert_eq!(batch.candidates.dims(), [2, 3]);
        let cands: Vec<i64> = batch.candidates.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(batch.rows[cands[0] as usize], 7);
        assert_eq!(batch.rows[cands[3] as usize], 40);

        let labels: Vec<f32> = batch.labels.into_data().to_vec().unwrap();
        assert_eq!(labels, vec![1.0, -1.0, -1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_rows_are_unique() {
        let batcher = CbowBatcher::<NdArray>::new(Default::default(), 2, sampler(5, 3), 1, 1);
        let batch   = batcher.batch(vec![sample(vec![1, 2], 3, 0), sample(vec![3, 1], 2, 1)]);

        let mut sorted = batch.rows.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), batch.rows.len());
    }

    #[test]
    fn test_batch_rows_bounded_by_batch_not_vocabulary() {
        // Same four samples against a tiny and a huge vocabulary
        let items = || (0..4).map(|i| sample(vec![i, i + 1], i + 2, i as usize)).collect::<Vec<_>>();

        for words in [10, 50_000] {
            let batcher = CbowBatcher::<NdArray>::new(Default::default(), 2, sampler(words, 5), 7, 1);
            let batch   = batcher.batch(items());
            assert!(batch.rows.len() <= 4 * (2 + 1 + 5));
        }
    }

    #[test]
    fn test_negative_hitting_target_is_weighted_out() {
        // One-word vocabulary: every negative is the target
        let batcher = CbowBatcher::<NdArray>::new(Default::default(), 1, sampler(1, 3), 5, 1);
        let batch   = batcher.batch(vec![sample(vec![0], 0, 0)]);
        let weights: Vec<f32> = batch.weights.into_data().to_vec().unwrap();
        assert_eq!(weights, vec![1.0, 0.0, 0.0, 0.0]);
    }
}
