use anyhow::Result;
use clap::Parser;
use splits_config::cli::{self, Args};

fn main() -> Result<()> {
    let _guard = splits_logging::init_subscriber();
    let args = Args::parse();
    cli::execute(args)
}
