// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `prepare` — normalize a dataset, train embeddings, vectorize
//   2. `clean`   — normalize one text and print it
//   3. `similar` — nearest words in saved embeddings
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::Path;

use commands::{CleanArgs, Commands, PrepareArgs, SimilarArgs};

#[derive(Parser, Debug)]
#[command(
    name = "summary-prep",
    version,
    about = "Prepare article/highlights datasets for summarization: normalize text, train word embeddings, vectorize."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Clean(args)   => run_clean(args),
            Commands::Similar(args) => run_similar(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    tracing::info!("Preparing dataset: {}", args.input);

    let summary = PrepareUseCase::new(args.into()).execute()?;

    println!("Prepared {} rows into '{}'", summary.rows, summary.output_dir.display());
    println!("  article vocabulary:    {}", summary.article_vocab_size);
    println!("  highlights vocabulary: {}", summary.highlights_vocab_size);
    println!("  embedded words:        {}", summary.embedding_words);
    if let Some(loss) = summary.final_loss {
        println!("  final training loss:   {loss:.4}");
    }
    Ok(())
}

fn run_clean(args: CleanArgs) -> Result<()> {
    use crate::application::clean_use_case::CleanUseCase;

    let use_case = CleanUseCase::new(&args.rules.into())?;
    println!("{}", use_case.clean(&args.text)?);
    Ok(())
}

fn run_similar(args: SimilarArgs) -> Result<()> {
    use crate::application::similar_use_case::SimilarUseCase;

    let use_case = SimilarUseCase::new(Path::new(&args.embeddings))?;
    for (word, score) in use_case.similar(&args.word, args.top)? {
        println!("{score:>8.4}  {word}");
    }
    Ok(())
}
