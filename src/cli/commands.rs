// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `prepare`, `clean` and
// `similar`, and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, char, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::{prepare_use_case::PrepareConfig, rules_config::RulesConfig};
use crate::ml::trainer::Word2VecConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a CSV dataset, train word embeddings and vectorize it
    Prepare(PrepareArgs),

    /// Normalize one piece of text and print the result
    Clean(CleanArgs),

    /// List the words closest to a word in saved embeddings
    Similar(SimilarArgs),
}

/// Overrides for the text rules, shared by `prepare` and `clean`
#[derive(Args, Debug, Clone)]
pub struct RulesArgs {
    /// JSON object file mapping contractions to expansions,
    /// replacing the built-in table
    #[arg(long)]
    pub contractions: Option<String>,

    /// Characters to strip, replacing the built-in punctuation set
    #[arg(long)]
    pub punctuation: Option<String>,
}

impl From<RulesArgs> for RulesConfig {
    fn from(a: RulesArgs) -> Self {
        RulesConfig {
            contractions: a.contractions,
            punctuation:  a.punctuation,
        }
    }
}

/// All arguments for the `prepare` command
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// CSV file with `article` and `highlights` columns
    #[arg(long)]
    pub input: String,

    /// Directory for normalized.csv, embeddings.txt and the rest
    #[arg(long, default_value = "prepared")]
    pub output_dir: String,

    /// Field delimiter of the input file
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Only read this many rows
    #[arg(long)]
    pub limit: Option<usize>,

    /// Dimension of every word vector
    #[arg(long, default_value_t = 100)]
    pub vector_size: usize,

    /// Context words taken on each side of the target word
    #[arg(long, default_value_t = 5)]
    pub window: usize,

    /// Words seen fewer times than this get no vector
    #[arg(long, default_value_t = 1)]
    pub min_count: usize,

    /// Passes over the training samples
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Noise words drawn per training sample
    #[arg(long, default_value_t = 5)]
    pub negative: usize,

    #[arg(long, default_value_t = 256)]
    pub batch_size: usize,

    /// Starting learning rate, decayed linearly over the epochs
    #[arg(long, default_value_t = 0.025)]
    pub lr: f64,

    /// Seed for weight init and sample shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub rules: RulesArgs,

    /// Also write vectors.jsonl (large: every row is padded
    /// to the column vocabulary size)
    #[arg(long)]
    pub write_vectors: bool,

    /// Hide the progress bar
    #[arg(long, short)]
    pub quiet: bool,
}

/// Convert CLI PrepareArgs into the application-layer PrepareConfig.
/// The application layer never sees clap types.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            input:         a.input,
            output_dir:    a.output_dir,
            delimiter:     a.delimiter,
            limit:         a.limit,
            rules:         a.rules.into(),
            word2vec:      Word2VecConfig {
                vector_size:   a.vector_size,
                window:        a.window,
                min_count:     a.min_count,
                negative:      a.negative,
                epochs:        a.epochs,
                batch_size:    a.batch_size,
                learning_rate: a.lr,
                seed:          a.seed,
            },
            write_vectors: a.write_vectors,
            quiet:         a.quiet,
        }
    }
}

/// All arguments for the `clean` command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Raw text to normalize
    pub text: String,

    #[command(flatten)]
    pub rules: RulesArgs,
}

/// All arguments for the `similar` command
#[derive(Args, Debug)]
pub struct SimilarArgs {
    /// Query word
    pub word: String,

    /// embeddings.txt written by `prepare`
    #[arg(long, default_value = "prepared/embeddings.txt")]
    pub embeddings: String,

    /// How many neighbours to print
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_prepare_defaults_match_config() {
        let cli = Cli::try_parse_from(["summary-prep", "prepare", "--input", "a.csv"]).unwrap();
        let Commands::Prepare(args) = cli.command else {
            panic!("expected prepare");
        };
        let cfg: PrepareConfig = args.into();
        assert_eq!(cfg.input, "a.csv");
        assert_eq!(cfg.word2vec, Word2VecConfig::default());
        assert_eq!(cfg.rules, RulesConfig::default());
        assert!(!cfg.write_vectors);
    }

    #[test]
    fn test_prepare_overrides() {
        let cli = Cli::try_parse_from([
            "summary-prep", "prepare", "--input", "a.tsv", "--delimiter", "\t",
            "--vector-size", "16", "--negative", "3", "--punctuation", ",.", "--limit", "10", "-q",
        ])
        .unwrap();
        let Commands::Prepare(args) = cli.command else {
            panic!("expected prepare");
        };
        let cfg: PrepareConfig = args.into();
        assert_eq!(cfg.delimiter, '\t');
        assert_eq!(cfg.word2vec.vector_size, 16);
        assert_eq!(cfg.word2vec.negative, 3);
        assert_eq!(cfg.rules.punctuation.as_deref(), Some(",."));
        assert_eq!(cfg.limit, Some(10));
        assert!(cfg.quiet);
    }

    #[test]
    fn test_prepare_requires_input() {
        assert!(Cli::try_parse_from(["summary-prep", "prepare"]).is_err());
    }
}
