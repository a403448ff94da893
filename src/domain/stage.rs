// ============================================================
// Layer 3 — Pipeline Stages
// ============================================================
// The preparation run is a straight line of nine stages.
// Each one finishes over every row before the next starts,
// and none is ever revisited:
//
//   CaseNormalizer → ContractionExpander → Redactor
//     → PossessiveStripper → PunctuationStripper
//     → WhitespaceNormalizer → VocabularySizer
//     → EmbeddingTrainer → Vectorizer
//
// The order is data, not call order: `Stage::ORDER` is what the
// pipeline checks before running a stage.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    CaseNormalizer,
    ContractionExpander,
    Redactor,
    PossessiveStripper,
    PunctuationStripper,
    WhitespaceNormalizer,
    VocabularySizer,
    EmbeddingTrainer,
    Vectorizer,
}

/// Total number of progress ticks emitted by a full run
pub const TOTAL_PROGRESS_STEPS: u64 = 17;

impl Stage {
    pub const ORDER: [Stage; 9] = [
        Stage::CaseNormalizer,
        Stage::ContractionExpander,
        Stage::Redactor,
        Stage::PossessiveStripper,
        Stage::PunctuationStripper,
        Stage::WhitespaceNormalizer,
        Stage::VocabularySizer,
        Stage::EmbeddingTrainer,
        Stage::Vectorizer,
    ];

    pub fn first() -> Stage {
        Stage::ORDER[0]
    }

    /// Position of this stage in `ORDER`
    pub fn index(self) -> usize {
        self as usize
    }

    /// The stage that runs after this one, None for the terminal stage
    pub fn next(self) -> Option<Stage> {
        Stage::ORDER.get(self.index() + 1).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::CaseNormalizer       => "case normalizer",
            Stage::ContractionExpander  => "contraction expander",
            Stage::Redactor             => "redactor",
            Stage::PossessiveStripper   => "possessive stripper",
            Stage::PunctuationStripper  => "punctuation stripper",
            Stage::WhitespaceNormalizer => "whitespace normalizer",
            Stage::VocabularySizer      => "vocabulary sizer",
            Stage::EmbeddingTrainer     => "embedding trainer",
            Stage::Vectorizer           => "vectorizer",
        }
    }

    /// Progress ticks this stage contributes.
    /// Text stages tick once per column, the redactor twice per
    /// column (emails, then URLs). Vocabulary sizing is silent.
    pub fn progress_steps(self) -> u64 {
        match self {
            Stage::Redactor         => 4,
            Stage::VocabularySizer  => 0,
            Stage::EmbeddingTrainer => 1,
            _                       => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_index() {
        for (i, stage) in Stage::ORDER.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn test_next_walks_the_whole_line() {
        let mut seen  = vec![Stage::first()];
        let mut stage = Stage::first();
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen, Stage::ORDER.to_vec());
        assert_eq!(Stage::Vectorizer.next(), None);
    }

    #[test]
    fn test_progress_steps_sum_to_total() {
        let total: u64 = Stage::ORDER.iter().map(|s| s.progress_steps()).sum();
        assert_eq!(total, TOTAL_PROGRESS_STEPS);
    }
}
