use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tfidf_core::IdfFormula;
use tfidf_indexer::{build_table, resolve_config, top_terms, write_export};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tfidf-indexer")]
#[command(about = "Build and inspect TF-IDF tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a table from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output table directory
        #[arg(long)]
        output: PathBuf,
        /// JSON pipeline configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// IDF formula, overrides the configuration file
        #[arg(long)]
        idf: Option<IdfFormula>,
        /// Normalize and count documents in parallel
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Print the heaviest terms of one document as JSON
    Top {
        /// Table directory
        #[arg(long)]
        index: PathBuf,
        /// External document id
        #[arg(long)]
        doc: String,
        #[arg(short, long, default_value_t = 10)]
        k: usize,
    },
    /// Export the table as JSON
    Export {
        /// Table directory
        #[arg(long)]
        index: PathBuf,
        /// Write a dense matrix instead of per-document mappings
        #[arg(long, default_value_t = false)]
        dense: bool,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, config, idf, parallel } => {
            let config = resolve_config(config.as_deref(), idf, parallel)?;
            build_table(&input, &output, &config)?;
            Ok(())
        }
        Commands::Top { index, doc, k } => {
            let terms = top_terms(&index, &doc, k)?;
            println!("{}", serde_json::to_string_pretty(&terms)?);
            Ok(())
        }
        Commands::Export { index, dense, output } => {
            let writer: Box<dyn Write> = match output {
                Some(path) => Box::new(
                    File::create(&path).with_context(|| format!("creating {}", path.display()))?,
                ),
                None => Box::new(std::io::stdout().lock()),
            };
            write_export(&index, dense, &mut BufWriter::new(writer))
        }
    }
}
