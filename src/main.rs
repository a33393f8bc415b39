//! Entry point wiring CLI dispatch to the ingestion library.

mod cli;

use anyhow::Result;
use bionlp_ingest::{config::Settings, logging};
use cli::Cli;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;
    let settings = Settings::load()?;

    info!(?cli, "starting command");
    cli.dispatch(settings)
}
