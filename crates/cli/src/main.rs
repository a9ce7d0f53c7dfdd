use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ernest_cli::commands::{get, height, verify};
use ernest_cli::telemetry;
use ernest_kernel::config::DEFAULT_FETCH_LIMIT;

#[derive(Parser)]
#[command(name = "ernest")]
#[command(about = "Ernest CLI - verifiable AI model provenance using a hash chain", long_about = None)]
struct Cli {
    /// Exported provenance block collection (JSON array or one document per line)
    #[arg(long, global = true, env = "ERNEST_BLOCKS", default_value = "blocks.json")]
    blocks: PathBuf,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the integrity of the hash chain
    Hashchain {
        #[command(subcommand)]
        command: HashchainCommands,
    },
    /// Query provenance blocks
    Provenance {
        #[command(subcommand)]
        command: ProvenanceCommands,
    },
}

#[derive(Subcommand)]
enum HashchainCommands {
    /// Recompute every block hash and check the links between blocks
    Verify {
        /// Maximum number of block records to fetch
        #[arg(long, env = "ERNEST_FETCH_LIMIT", default_value_t = DEFAULT_FETCH_LIMIT)]
        limit: usize,

        /// Worker threads for block checks (0 = one per core)
        #[arg(long, env = "ERNEST_VERIFY_THREADS", default_value_t = 0)]
        threads: usize,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProvenanceCommands {
    /// Get the height of the hash chain
    Height,
    /// Get a provenance block by index
    GetByIndex {
        #[arg(long, short)]
        index: i64,
    },
    /// Get a provenance block by hash
    GetByHash {
        #[arg(long)]
        hash: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging(cli.verbose);

    match cli.command {
        Commands::Hashchain {
            command: HashchainCommands::Verify { limit, threads, json },
        } => {
            let options = verify::VerifyOptions { limit, threads, json };
            verify::run(&cli.blocks, &options).map(|_| ())
        }
        Commands::Provenance { command } => match command {
            ProvenanceCommands::Height => height::run(&cli.blocks).map(|_| ()),
            ProvenanceCommands::GetByIndex { index } => get::by_index(&cli.blocks, index).map(|_| ()),
            ProvenanceCommands::GetByHash { hash } => get::by_hash(&cli.blocks, &hash).map(|_| ()),
        },
    }
}
