// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (preparing a dataset, cleaning one text,
// querying saved embeddings).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Contraction table / punctuation overrides shared by the use cases
pub mod rules_config;

// The full preparation workflow
pub mod prepare_use_case;

// Normalize a single raw text
pub mod clean_use_case;

// Nearest neighbours in a saved embedding file
pub mod similar_use_case;
