use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "odo",
    about = "Odometer reading ledger: record, update, and query vehicle readings",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger file (overrides `ledger_path` from the config file)
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Config file; `odo.toml` in the working directory is used if present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

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
    /// Write an empty ID index to the ledger
    Init(InitArgs),
    /// Record a new reading
    Add(RecordArgs),
    /// Replace a reading; value and date may only move forward
    Update(RecordArgs),
    /// Delete every reading and reset the index
    RemoveAll,
    /// Show one reading
    Read(ReadArgs),
    /// Show every reading in index order
    ReadAll,
    /// Run an operation by name with positional arguments
    Invoke(InvokeArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Reset the index even if the ledger is already provisioned
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct RecordArgs {
    /// Reading as JSON: vehicleID, docType, reading, creationDate
    pub json: String,
}

#[derive(Args)]
pub struct ReadArgs {
    pub id: String,
}

#[derive(Args)]
pub struct InvokeArgs {
    pub function: String,
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<String>,
}
