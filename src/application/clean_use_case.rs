// ============================================================
// Layer 2 — Clean Use Case
// ============================================================
// Runs one raw text through the six text stages, exactly as the
// pipeline would normalize a single field. This is the input
// check a serving endpoint would do before calling a model:
// blank input is rejected instead of passed along.

use anyhow::Result;

use crate::application::rules_config::RulesConfig;
use crate::data::preprocessor::TextRules;
use crate::domain::error::PipelineError;

pub struct CleanUseCase {
    rules: TextRules,
}

impl CleanUseCase {
    pub fn new(config: &RulesConfig) -> Result<Self> {
        Ok(Self { rules: config.build()? })
    }

    pub fn clean(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(PipelineError::PredictionInputInvalid("text is empty".to_string()).into());
        }
        Ok(self.rules.normalize(text))
    }
}
