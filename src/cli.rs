use clap::{Parser, Subcommand};
use sbom_depgraph::application::dto::OutputFormat;

/// Sync a product's dependency graph from its repository
#[derive(Parser, Debug)]
#[command(name = "sbom-depgraph")]
#[command(version)]
#[command(
    about = "Acquire a repository's dependencies, sync them into a product graph and report enrichment gaps",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a local repository checkout (defaults to current directory)
    #[arg(short, long, conflicts_with = "github")]
    pub path: Option<String>,

    /// GitHub repository to sync instead of a local checkout
    #[arg(long, value_name = "OWNER/REPO")]
    pub github: Option<String>,

    /// Branch to read lockfiles and sources from (defaults to the repository's default branch)
    #[arg(long)]
    pub branch: Option<String>,

    /// Product identifier (defaults to OWNER/REPO or the directory name)
    #[arg(long)]
    pub product: Option<String>,

    /// Path to a config file (defaults to sbom-depgraph.config.yml in the target directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Skip hash and license enrichment
    #[arg(long)]
    pub no_enrich: bool,

    /// Output format: json or summary [default: json]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Exit with code 1 when more than N enrichment gaps remain
    #[arg(long, value_name = "N")]
    pub fail_on_gaps: Option<usize>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Parse a single lockfile or manifest and print the result as JSON
    ParseLockfile {
        /// File to parse; its basename selects the parser
        file: String,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
