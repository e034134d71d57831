//! Binary entry point. Resolves settings, sets up logging, and either launches
//! the Ratatui browser or prints one of the two views to stdout.
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

use tla_card_list::config::{Cli, Command, Settings};
use tla_card_list::{
    ensure_schema, logging, report, run_app, App, CardStore, CardView, NO_SELECTION,
};

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let settings = cli.settings()?;

    match cli.command.take() {
        None => {
            logging::init_file(&cli.log_file()?)?;
            log::info!("browsing {}", settings.db_path.display());
            let mut app = App::new(CardStore::new(&settings.db_path), settings.image_dir);
            run_app(&mut app)
        }
        Some(command) => {
            logging::init_stderr();
            run_command(command, &settings)
        }
    }
}

fn run_command(command: Command, settings: &Settings) -> Result<()> {
    let store = CardStore::new(&settings.db_path);
    let mut out = io::stdout().lock();

    match command {
        Command::Init => {
            ensure_schema(&settings.db_path)?;
            log::info!("card table ready in {}", settings.db_path.display());
        }
        Command::List => {
            let view = CardView::initial(&store, NO_SELECTION).context("failed to list cards")?;
            report::write_listing(&mut out, &view)?;
        }
        Command::Show { id } => {
            let view = CardView::submit(&store, id)
                .with_context(|| format!("failed to look up card {id}"))?;
            report::write_card(&mut out, &view)?;
        }
    }

    out.flush().context("failed to write to stdout")
}
