//! Notebox - a small HTTP service for free-text notes
//!
//! With no subcommand, serves the HTTP API.

use clap::Parser;

use notebox_server::{app, export};
use notebox_server::cli::{Cli, Commands, ExportArgs};
use notebox_server::config::Settings;
use notebox_server::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;
    logging::init(&settings.log)?;

    match cli.command {
        None | Some(Commands::Serve) => app::serve(&settings).await?,
        Some(Commands::Init) => {
            app::open_service(&settings)?;
            println!("Initialized notebox database at {}", settings.db_path.display());
        }
        Some(Commands::Export(args)) => run_export(&settings, &args)?,
    }

    Ok(())
}

fn run_export(settings: &Settings, args: &ExportArgs) -> anyhow::Result<()> {
    let service = app::open_service(settings)?;
    export::write_notes(&service, std::io::stdout().lock(), args.pretty)
}
