use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::SplitCatalog;

mod commands;
mod host;

pub use host::FileHost;

/// Command-line arguments for the split config tool.
///
/// The binary is a host for an editing session: it loads a split config
/// file as the session's default value and writes every accepted edit back
/// to the same file.
#[derive(Parser)]
#[command(name = "splits-config")]
#[command(about = "Edit autosplitter split configs")]
#[command(version)]
pub struct Args {
    /// Split catalog to use instead of the built-in one (JSON array or
    /// annotated definitions)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the splits of a config with their labels
    Show {
        file: PathBuf,
    },

    /// Append a split to the end of the list
    Add {
        file: PathBuf,
        /// Split id; ids missing from the catalog are kept as-is
        id: String,
    },

    /// Replace the split at a position
    Set {
        file: PathBuf,
        /// Zero-based position in splitIds
        index: usize,
        id: String,
    },

    /// Remove the split at a position
    Remove {
        file: PathBuf,
        /// Zero-based position in splitIds
        index: usize,
    },

    /// Report schema diagnostics
    Validate {
        file: PathBuf,

        /// Treat unknown split ids as errors
        #[arg(long)]
        strict: bool,
    },

    /// Rewrite a config in canonical form
    Format {
        file: PathBuf,

        /// Print instead of writing the file
        #[arg(long)]
        stdout: bool,
    },

    /// List catalog entries
    Catalog {
        /// Case-insensitive filter on id or description
        #[arg(short, long)]
        search: Option<String>,
    },
}

pub fn execute(args: Args) -> Result<()> {
    let loaded = args
        .catalog
        .as_deref()
        .map(commands::load_catalog)
        .transpose()?;
    let catalog = loaded.as_ref().unwrap_or_else(|| SplitCatalog::builtin());

    match args.command {
        Command::Show { file } => commands::show(&file, catalog),
        Command::Add { file, id } => commands::add(&file, &id, catalog),
        Command::Set { file, index, id } => commands::set(&file, index, &id, catalog),
        Command::Remove { file, index } => commands::remove(&file, index, catalog),
        Command::Validate { file, strict } => commands::validate(&file, strict, catalog),
        Command::Format { file, stdout } => commands::format(&file, stdout),
        Command::Catalog { search } => commands::list_catalog(search.as_deref(), catalog),
    }
}
