// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer takes raw article/highlights rows all the way to
// normalized text and padded vector sequences.
//
// The pipeline flows in this order:
//
//   CSV file
//       │
//       ▼
//   CsvLoader         → reads rows, locates columns by header
//       │
//       ▼
//   ArticleTable      → owns the rows for the whole run
//       │
//       ▼
//   TextRules         → six normalization stages, both columns
//       │
//       ▼
//   VocabularySizer   → distinct tokens + 1 per column
//       │
//       ▼
//   CbowDataset       → context/target samples for training
//       │
//       ▼
//   CbowBatcher       → pads samples into tensor batches
//       │
//       ▼
//   Vectorizer        → tokens → vectors, padded per column
//
// Pipeline drives all of it and enforces the stage order.

/// Loads rows from a delimited file using the csv crate
pub mod loader;

/// Default contraction table and punctuation set
pub mod tables;

/// The single-purpose text rules
pub mod preprocessor;

/// The in-memory table the stages rewrite
pub mod table;

/// Memoized per-column vocabulary size
pub mod vocabulary;

/// Implements Burn's Dataset trait for CBOW samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Token sequences to padded vector sequences
pub mod vectorizer;

/// The ordered stage runner
pub mod pipeline;
