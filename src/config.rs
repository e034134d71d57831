//! Command-line flags and the paths derived from them.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::db::{data_dir, DB_FILE_NAME};
use crate::models::CardId;

/// Folder under the data directory holding card artwork.
const IMAGE_DIR_NAME: &str = "images";
/// Log file name used while the TUI owns the terminal.
const LOG_FILE_NAME: &str = "tla-card-list.log";

#[derive(Debug, Parser)]
#[command(name = "tla-card-list")]
#[command(about = "Browse the TLA card list", long_about = None)]
pub struct Cli {
    /// SQLite database holding the TLACardList table
    #[arg(long, global = true, env = "TLA_CARD_DB")]
    pub db: Option<PathBuf>,

    /// Directory that card image file names are resolved against
    #[arg(long, global = true, env = "TLA_CARD_IMAGES")]
    pub image_dir: Option<PathBuf>,

    /// Where the TUI writes its log
    #[arg(long, global = true, env = "TLA_CARD_LOG")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Print every card id and name
    List,
    /// Print all fields of one card
    Show {
        /// Card id to look up
        id: CardId,
    },
    /// Create the database file and an empty card table if missing
    Init,
}

/// Paths resolved from flags, environment and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub image_dir: PathBuf,
}

impl Cli {
    /// Fill in whatever was not given on the command line. The home
    /// directory is only looked up when a default actually needs it.
    pub fn settings(&self) -> Result<Settings> {
        self.settings_with(data_dir)
    }

    /// The TUI log file, defaulting into the data directory.
    pub fn log_file(&self) -> Result<PathBuf> {
        self.log_file_with(data_dir)
    }

    fn settings_with(&self, base: impl FnOnce() -> Result<PathBuf>) -> Result<Settings> {
        let db_path = match &self.db {
            Some(path) => path.clone(),
            None => base()?.join(DB_FILE_NAME),
        };
        let image_dir = self.image_dir.clone().unwrap_or_else(|| {
            db_path
                .parent()
                .map(|parent| parent.join(IMAGE_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(IMAGE_DIR_NAME))
        });
        Ok(Settings { db_path, image_dir })
    }

    fn log_file_with(&self, base: impl FnOnce() -> Result<PathBuf>) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(base()?.join(LOG_FILE_NAME)),
        }
    }
}
