// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe what the system works on:
// a table row, the two text columns, the ordered pipeline
// stages and the error kinds a run can surface.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - Only structs, enums and traits
//
// Everything else (data, ml, infra) is written against these
// definitions, so they stay small and dependency free.

// One article/highlights row and the column selector
pub mod record;

// The nine pipeline stages and their fixed order
pub mod stage;

// Pipeline error kinds
pub mod error;

// Seams the other layers implement
pub mod traits;
