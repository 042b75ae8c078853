use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli_exec;

#[derive(Parser)]
#[command(name = "viewmark")]
#[command(about = "Regex patterns for bulk-marking pull request files as viewed", long_about = None)]
struct Cli {
    /// Key-value file holding persisted patterns
    #[arg(long, default_value = ".viewmark/storage.json")]
    state: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List patterns
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a pattern (e.g. '/^src/.*.test.js$/')
    Add {
        label: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a pattern
    Remove { id: String },

    /// Change a pattern's label or selection
    Update {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        selected: Option<bool>,
    },

    /// Include a pattern in mark/unmark
    Select { id: String },

    /// Exclude a pattern from mark/unmark
    Unselect { id: String },

    /// Count how many paths each pattern matches
    Count {
        /// File with one path per line (defaults to stdin)
        #[arg(long, conflicts_with = "page")]
        paths: Option<PathBuf>,
        /// Count over the files of a page snapshot instead
        #[arg(long)]
        page: Option<PathBuf>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark files matched by selected patterns as viewed
    Mark(BulkArgs),

    /// Unmark files matched by selected patterns
    Unmark(BulkArgs),
}

#[derive(clap::Args)]
struct BulkArgs {
    /// Page snapshot: JSON array of {"path", "viewed"}
    #[arg(long)]
    page: PathBuf,
    /// Write the toggled snapshot back to --page
    #[arg(long)]
    write: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    viewmark::logging::init(cli.verbose);
    cli_exec::handle_command(&cli.state, cli.command)
}
