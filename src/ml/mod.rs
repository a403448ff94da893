// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Word embedding training. The CBOW network and its training
// loop are the only burn-facing code in the crate besides the
// dataset/batcher pair in Layer 4.
//
//   vocab.rs      — corpus vocabulary with min-count filter
//   sampler.rs    — noise words drawn from count^0.75
//   model.rs      — CBOW: mean of context embeddings scored
//                   against the target and k noise words
//   trainer.rs    — the training loop (sparse SGD over the
//                   rows each batch touches)
//   embedding.rs  — the trained lookup table handed back to
//                   the rest of the pipeline, burn free
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Mikolov et al. (2013) Efficient Estimation of
//            Word Representations in Vector Space
//            Mikolov et al. (2013) Distributed Representations
//            of Words and Phrases and their Compositionality

/// Word ↔ id mapping built from the tokenized corpus
pub mod vocab;

/// Trained word → vector lookup
pub mod embedding;

/// Noise word draws for negative sampling
pub mod sampler;

/// CBOW network architecture
pub mod model;

/// Training loop producing an EmbeddingModel
pub mod trainer;
