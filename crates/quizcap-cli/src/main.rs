//! quizcap CLI: a thin host for the answer-capture engine.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizcap", version, about = "Interactive quiz answer-capture engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate question set files
    Validate {
        /// Path to a question set file (.toml or .json) or directory
        #[arg(long)]
        questions: PathBuf,
    },

    /// Replay a gesture script against one question
    Replay {
        /// Question set file containing the question
        #[arg(long)]
        questions: PathBuf,

        /// Id of the question to activate
        #[arg(long)]
        id: String,

        /// JSON array of gestures
        #[arg(long)]
        script: PathBuf,

        /// JSON file holding the previously stored answer
        #[arg(long)]
        answer: Option<PathBuf>,

        /// Puzzle shuffle seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question set
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizcap=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Replay {
            questions,
            id,
            script,
            answer,
            seed,
            config,
        } => commands::replay::execute(questions, id, script, answer, seed, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
