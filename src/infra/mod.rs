// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   progress.rs        — the 17-step indicatif bar
//   embedding_store.rs — word2vec text format save/load
//   metrics.rs         — per-epoch training loss as CSV
//   writer.rs          — normalized text, vectors, summary
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Stage progress reporting
pub mod progress;

/// Embedding persistence
pub mod embedding_store;

/// Training metrics CSV logger
pub mod metrics;

/// Output artifacts of a preparation run
pub mod writer;
