//! Read access to the card table, split across logical submodules.

mod cards;
mod connection;
mod error;

pub use cards::{fetch_card, list_cards};
pub use connection::{
    create_schema, data_dir, default_db_path, ensure_schema, CardStore, DATA_DIR_NAME,
    DB_FILE_NAME,
};
pub use error::StoreError;
