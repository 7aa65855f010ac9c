use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "portkv",
    about = "Storage bridge host: answers storage port commands against a key-value store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Report every port command and response in the log
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file backing the store; in-memory when omitted
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Byte quota over all stored keys and values
    #[arg(long, global = true)]
    pub quota: Option<usize>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer newline-delimited port messages from stdin on stdout
    Run(RunArgs),
    /// Expose the storage ports over HTTP
    Serve(ServeArgs),
    /// List stored keys in enumeration order
    Keys,
    /// Print the decoded value of a key
    Get(GetArgs),
    /// Remove every stored key
    Clear,
}

#[derive(Args)]
pub struct RunArgs {
    /// Stop at the first command that fails instead of skipping it
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML server configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Overrides the configured bind address
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
}
