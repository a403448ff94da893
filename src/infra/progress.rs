// ============================================================
// Layer 6 — Pipeline Progress
// ============================================================
// Coarse progress for a preparation run: a fixed 17-step bar
// with the current step's label, e.g.
//
//   [00:00:03] [#########>------] 9/17 remove punctuation - article
//
// Purely cosmetic. The counter only ever moves forward, and a
// hidden bar (tests, --quiet) still counts so the step total
// can be checked.

use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::stage::TOTAL_PROGRESS_STEPS;

pub struct PipelineProgress {
    bar: ProgressBar,
}

impl PipelineProgress {
    /// A visible bar on stderr
    pub fn visible() -> Self {
        let bar = ProgressBar::new(TOTAL_PROGRESS_STEPS);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }

    /// Counts steps without drawing anything
    pub fn hidden() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(TOTAL_PROGRESS_STEPS);
        Self { bar }
    }

    /// Announce the step that is about to run
    pub fn begin(&self, label: &str) {
        tracing::debug!("step {}/{}: {}", self.position() + 1, TOTAL_PROGRESS_STEPS, label);
        self.bar.set_message(label.to_string());
    }

    /// Mark the current step done
    pub fn advance(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("vectors computed");
    }
}
