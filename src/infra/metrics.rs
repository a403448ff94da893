// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records embedding-training metrics to a CSV file, one row
// per epoch, so a run's learning curve can be plotted later.
//
// Metrics recorded per epoch:
//   - epoch:   the epoch number (1, 2, 3, ...)
//   - loss:    mean negative-sampling loss per sample
//   - samples: number of (context → target) samples per epoch
//
// Output file: <output_dir>/metrics.csv
//
// Example CSV output:
//   epoch,loss,samples
//   1,3.871200,120344
//   2,3.102500,120344
//
// Output vectors start at zero, so the first epoch starts near
// (1 + negative) × ln 2. A flat curve usually means the learning
// rate is too small for the corpus.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean loss per training sample
    pub loss: f64,

    /// Training samples seen in the epoch
    pub samples: usize,
}

impl EpochMetrics {
    pub fn new(epoch: usize, loss: f64, samples: usize) -> Self {
        Self { epoch, loss, samples }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Each preparation run starts a fresh file.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        let mut f    = fs::File::create(&csv_path)?;
        writeln!(f, "epoch,loss,samples")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(f, "{},{:.6},{}", m.epoch, m.loss, m.samples)?;

        tracing::debug!("Logged epoch {} metrics: loss={:.4}", m.epoch, m.loss);
        Ok(())
    }

    pub fn log_all(&self, epochs: &[EpochMetrics]) -> Result<()> {
        epochs.iter().try_for_each(|m| self.log(m))
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
