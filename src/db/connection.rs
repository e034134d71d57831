use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::{Connection, OpenFlags};

use super::error::StoreError;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".tla-card-list";
/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "TLACardList.db";

const CREATE_CARD_TABLE: &str = "CREATE TABLE IF NOT EXISTS TLACardList (
    Id INTEGER PRIMARY KEY,
    Name TEXT NOT NULL,
    CardSet TEXT NOT NULL,
    CardType TEXT NOT NULL,
    CollectorNumber NUMERIC NOT NULL,
    Cost TEXT NOT NULL,
    Details TEXT NOT NULL,
    ImageFileName TEXT NOT NULL
)";

/// Handle to the card database. It only remembers where the file lives; every
/// operation opens its own read-only connection and drops it before
/// returning, so nothing is held between requests.
#[derive(Debug, Clone)]
pub struct CardStore {
    path: PathBuf,
}

impl CardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a scoped read-only connection. The file must already exist.
    pub fn connect(&self) -> Result<Connection, StoreError> {
        log::debug!("opening card store {}", self.path.display());
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })
    }
}

/// Create the database file and the empty card table if either is missing.
/// Existing rows are left untouched.
pub fn ensure_schema(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    create_schema(&conn)
}

/// Run the card table DDL on an already open connection.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_CARD_TABLE, [])
        .context("failed to create TLACardList table")?;
    Ok(())
}

/// Resolve the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Absolute path to the default card database.
pub fn default_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(DB_FILE_NAME))
}
