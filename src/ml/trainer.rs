// ============================================================
// Layer 5 — Embedding Training Loop
// ============================================================
// Trains one shared CBOW embedding over every tokenized row of
// both columns, then hands the word vectors back as an
// EmbeddingModel.
//
//   sentences ─► CorpusVocabulary (min_count)
//             ─► CbowSamples (window) ─► DataLoader (seeded shuffle)
//             ─► per batch: gather rows ─► SGD on negative-sampling
//                loss ─► scatter rows back
//
// The full matrices live here as flat vectors. Each batch builds
// a CbowModel over only the rows it touches, so a step costs
// batch × (window + negatives) × dim no matter how large the
// vocabulary is. Plain SGD keeps no per-parameter state, which is
// what makes the per-batch model throwaway.
//
// Determinism: input vectors come from a seeded StdRng, output
// vectors start at zero, the loader shuffle and the negative
// draws are seeded from the run seed and the epoch. Same corpus
// + same config → same vectors.
//
// Every vocabulary word gets a vector even when it never appears
// in a training sample (a one-word row): it keeps its seeded
// starting vector.

use std::sync::Arc;

use burn::{
    backend::ndarray::NdArrayDevice,
    data::dataloader::DataLoaderBuilder,
    optim::{GradientsParams, Optimizer, SgdConfig},
    tensor::ElementConversion,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::CbowBatcher,
    dataset::{build_samples, CbowDataset, CbowSample},
};
use crate::domain::error::{PipelineError, PipelineResult};
use crate::infra::metrics::EpochMetrics;
use crate::ml::embedding::EmbeddingModel;
use crate::ml::model::{CbowConfig, CbowModel};
use crate::ml::sampler::NegativeSampler;
use crate::ml::vocab::CorpusVocabulary;

type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// Floor for the decayed learning rate, as a fraction of the start
const MIN_LR_FRACTION: f64 = 1e-4;

// ─── Configuration ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word2VecConfig {
    pub vector_size:   usize,
    pub window:        usize,
    pub min_count:     usize,
    /// Noise words drawn per training sample
    pub negative:      usize,
    pub epochs:        usize,
    pub batch_size:    usize,
    /// Starting SGD rate, decayed linearly per epoch
    pub learning_rate: f64,
    pub seed:          u64,
}

impl Default for Word2VecConfig {
    fn default() -> Self {
        Self {
            vector_size:   100,
            window:        5,
            min_count:     1,
            negative:      5,
            epochs:        5,
            batch_size:    256,
            learning_rate: 0.025,
            seed:          42,
        }
    }
}

impl Word2VecConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        let problem = if self.vector_size == 0 {
            Some("vector_size must be positive")
        } else if self.window == 0 {
            Some("window must be positive")
        } else if self.min_count == 0 {
            Some("min_count must be at least 1")
        } else if self.negative == 0 {
            Some("negative must be at least 1")
        } else if self.batch_size == 0 {
            Some("batch_size must be positive")
        } else if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            Some("learning_rate must be a positive number")
        } else {
            None
        };

        match problem {
            Some(msg) => Err(PipelineError::InvalidConfig(msg.to_string())),
            None      => Ok(()),
        }
    }

    /// Linear decay: full rate in epoch 1, shrinking towards the floor
    fn learning_rate_at(&self, epoch: usize) -> f64 {
        let progress = (epoch - 1) as f64 / self.epochs as f64;
        (self.learning_rate * (1.0 - progress)).max(self.learning_rate * MIN_LR_FRACTION)
    }
}

/// What happened during training, for logging and the metrics file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub vocabulary: usize,
    pub samples:    usize,
    pub epochs:     Vec<EpochMetrics>,
}

// ─── Training ─────────────────────────────────────────────────────────────────
pub fn train_embeddings(
    sentences: &[Vec<String>],
    cfg:       &Word2VecConfig,
) -> PipelineResult<(EmbeddingModel, TrainingReport)> {
    cfg.validate()?;

    let vocab = CorpusVocabulary::build(sentences, cfg.min_count);
    if vocab.is_empty() {
        return Err(PipelineError::EmbeddingTrainingFailure(format!(
            "no token occurs at least {} time(s); nothing to embed", cfg.min_count
        )));
    }

    let samples = build_samples(sentences, &vocab, cfg.window);
    tracing::info!(
        "Training CBOW embeddings: {} words, {} samples, dim={}, window={}, negative={}",
        vocab.len(), samples.len(), cfg.vector_size, cfg.window, cfg.negative
    );

    let mut matrices = Matrices {
        input:  initial_vectors(vocab.len(), cfg.vector_size, cfg.seed),
        output: vec![0.0; vocab.len() * cfg.vector_size],
        dim:    cfg.vector_size,
    };

    let mut report = TrainingReport {
        vocabulary: vocab.len(),
        samples:    samples.len(),
        epochs:     Vec::new(),
    };

    if samples.is_empty() {
        tracing::warn!("No row has two or more tokens; keeping initial vectors");
    } else {
        let sampler = Arc::new(NegativeSampler::new(&vocab, cfg.negative)?);
        train_loop(&mut matrices, Arc::new(samples), sampler, cfg, &mut report)?;
    }

    let embeddings = EmbeddingModel::from_flat(cfg.vector_size, vocab.into_words(), matrices.input)?;
    Ok((embeddings, report))
}

/// The full input (word) and output (context) matrices, row-major
struct Matrices {
    input:  Vec<f32>,
    output: Vec<f32>,
    dim:    usize,
}

impl Matrices {
    /// Model over just `rows`, in that order
    fn gather(&self, rows: &[u32], device: &NdArrayDevice) -> CbowModel<TrainBackend> {
        let pick = |matrix: &[f32]| -> Vec<f32> {
            rows.iter()
                .flat_map(|&r| {
                    let start = r as usize * self.dim;
                    matrix[start..start + self.dim].iter().copied()
                })
                .collect()
        };
        CbowConfig::new(rows.len(), self.dim).init_with(pick(&self.input), pick(&self.output), device)
    }

    /// Write the batch model's rows back into the full matrices
    fn scatter(&mut self, rows: &[u32], model: &CbowModel<TrainBackend>) -> PipelineResult<()> {
        let input  = weights_of(model.input.weight.val())?;
        let output = weights_of(model.output.weight.val())?;

        for (local, &row) in rows.iter().enumerate() {
            let src = local * self.dim..(local + 1) * self.dim;
            let dst = row as usize * self.dim..(row as usize + 1) * self.dim;
            self.input[dst.clone()].copy_from_slice(&input[src.clone()]);
            self.output[dst].copy_from_slice(&output[src]);
        }
        Ok(())
    }
}

fn weights_of(tensor: burn::tensor::Tensor<TrainBackend, 2>) -> PipelineResult<Vec<f32>> {
    tensor
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| PipelineError::EmbeddingTrainingFailure(format!("{e:?}")))
}

fn train_loop(
    matrices: &mut Matrices,
    samples:  Arc<Vec<CbowSample>>,
    sampler:  Arc<NegativeSampler>,
    cfg:      &Word2VecConfig,
    report:   &mut TrainingReport,
) -> PipelineResult<()> {
    let device       = NdArrayDevice::default();
    let sample_count = samples.len();

    for epoch in 1..=cfg.epochs {
        let lr         = cfg.learning_rate_at(epoch);
        let epoch_seed = cfg.seed.wrapping_add(epoch as u64);

        // No worker threads: batches must arrive in the same order every run.
        let batcher = CbowBatcher::<TrainBackend>::new(
            device.clone(), cfg.window * 2, sampler.clone(), cfg.seed, epoch,
        );
        let loader = DataLoaderBuilder::new(batcher)
            .batch_size(cfg.batch_size)
            .shuffle(epoch_seed)
            .build(CbowDataset::new(samples.clone()));

        let mut loss_sum = 0.0f64;

        for batch in loader.iter() {
            let model = matrices.gather(&batch.rows, &device);
            let loss  = model.forward_loss(
                batch.context, batch.mask, batch.candidates, batch.labels, batch.weights,
            );
            loss_sum += loss.clone().into_scalar().elem::<f64>();

            let grads     = GradientsParams::from_grads(loss.backward(), &model);
            let mut optim = SgdConfig::new().init();
            let model     = optim.step(lr, model, grads);

            matrices.scatter(&batch.rows, &model)?;
        }

        let mean_loss = loss_sum / sample_count as f64;
        if !mean_loss.is_finite() {
            return Err(PipelineError::EmbeddingTrainingFailure(format!(
                "loss diverged in epoch {epoch}"
            )));
        }

        tracing::info!("Embedding epoch {}/{}: loss={:.4} lr={:.5}", epoch, cfg.epochs, mean_loss, lr);
        report.epochs.push(EpochMetrics::new(epoch, mean_loss, sample_count));
    }

    Ok(())
}

/// Seeded starting vectors, uniform in [-0.5, 0.5) / vector_size
fn initial_vectors(vocab_size: usize, vector_size: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let scale   = 1.0 / vector_size as f32;
    (0..vocab_size * vector_size)
        .map(|_| (rng.gen::<f32>() - 0.5) * scale)
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn corpus() -> Vec<Vec<String>> {
        [
            "the cat sat on the mat",
            "the dog sat on the rug",
            "a cat chased a dog",
            "solo",
        ]
        .iter()
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .collect()
    }

    fn small_config() -> Word2VecConfig {
        Word2VecConfig {
            vector_size: 8,
            window:      2,
            epochs:      2,
            batch_size:  4,
            ..Word2VecConfig::default()
        }
    }

    #[test]
    fn test_every_word_gets_a_vector() {
        let (model, report) = train_embeddings(&corpus(), &small_config()).unwrap();
        for sentence in corpus() {
            for word in sentence {
                let v = model.get(&word).unwrap_or_else(|| panic!("no vector for '{word}'"));
                assert_eq!(v.len(), 8);
            }
        }
        assert_eq!(report.vocabulary, model.len());
        assert_eq!(report.epochs.len(), 2);
        assert!(report.epochs.iter().all(|e| e.loss.is_finite()));
    }

    #[test]
    fn test_training_is_deterministic() {
        let cfg     = small_config();
        let (a, _)  = train_embeddings(&corpus(), &cfg).unwrap();
        let (b, _)  = train_embeddings(&corpus(), &cfg).unwrap();
        assert_eq!(a.words(), b.words());
        for (va, vb) in a.matrix().iter().zip(b.matrix()) {
            for (x, y) in va.iter().zip(vb) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_training_moves_vectors() {
        let cfg          = small_config();
        let (trained, _) = train_embeddings(&corpus(), &cfg).unwrap();
        let start        = initial_vectors(trained.len(), cfg.vector_size, cfg.seed);
        let flat: Vec<f32> = trained.matrix().iter().flatten().copied().collect();
        assert_ne!(flat, start);
    }

    #[test]
    fn test_zero_epochs_keeps_initial_vectors() {
        let cfg        = Word2VecConfig { epochs: 0, ..small_config() };
        let (model, r) = train_embeddings(&corpus(), &cfg).unwrap();
        let flat: Vec<f32> = model.matrix().iter().flatten().copied().collect();
        assert_eq!(flat, initial_vectors(model.len(), 8, cfg.seed));
        assert!(r.epochs.is_empty());
    }

    #[test]
    fn test_min_count_drops_rare_words() {
        let cfg        = Word2VecConfig { min_count: 2, ..small_config() };
        let (model, _) = train_embeddings(&corpus(), &cfg).unwrap();
        assert!(model.get("the").is_some());
        assert!(model.get("solo").is_none());
    }

    #[test]
    fn test_empty_corpus_fails() {
        let empty = vec![Vec::new(), Vec::new()];
        assert!(matches!(
            train_embeddings(&empty, &small_config()),
            Err(PipelineError::EmbeddingTrainingFailure(_))
        ));
    }

    #[test]
    fn test_single_word_rows_still_embed() {
        let rows = vec![vec!["lonely".to_string()], vec!["words".to_string()]];
        let (model, report) = train_embeddings(&rows, &small_config()).unwrap();
        assert_eq!(report.samples, 0);
        assert!(model.get("lonely").is_some() && model.get("words").is_some());
    }

    #[test]
    fn test_learning_rate_decays_linearly() {
        let cfg = Word2VecConfig { epochs: 4, learning_rate: 0.1, ..small_config() };
        assert_abs_diff_eq!(cfg.learning_rate_at(1), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(cfg.learning_rate_at(3), 0.05, epsilon = 1e-12);
        let one = Word2VecConfig { epochs: 1, ..cfg };
        assert_abs_diff_eq!(one.learning_rate_at(1), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_rare_words_do_not_change_sample_count() {
        // Same sentence structure, but one corpus adds thousands of one-word rows:
        // the vocabulary grows, the training samples do not.
        let mut wide = corpus();
        wide.extend((0..5_000).map(|i| vec![format!("rare{i}")]));

        let cfg            = Word2VecConfig { epochs: 1, ..small_config() };
        let (_, narrow_r)  = train_embeddings(&corpus(), &cfg).unwrap();
        let (model, wide_r) = train_embeddings(&wide, &cfg).unwrap();

        assert_eq!(narrow_r.samples, wide_r.samples);
        assert!(wide_r.vocabulary > narrow_r.vocabulary + 4_000);
        assert!(model.get("rare4999").is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        for cfg in [
            Word2VecConfig { window: 0, ..small_config() },
            Word2VecConfig { negative: 0, ..small_config() },
        ] {
            assert!(matches!(
                train_embeddings(&corpus(), &cfg),
                Err(PipelineError::InvalidConfig(_))
            ));
        }
    }
}
