use clap::Parser;
use showroom_store::Result;

use crate::{
    commands::{run_command, Cli},
    logging::init_tracing,
};

/// Run the Showroom CLI application.
///
/// Parses command-line arguments, initializes tracing, resolves the store
/// configuration and executes the requested command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.json, cli.verbose);

    run_command(cli).await
}
