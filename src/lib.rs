//! Core library surface for the TLA card list browser.
//!
//! The `bin` target wires these pieces together; tests and other tooling can
//! reuse them directly.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod report;
pub mod ui;
pub mod view;

/// Read access to the card table.
pub use db::{ensure_schema, fetch_card, list_cards, CardStore, StoreError};

/// The card record and its list entry.
pub use models::{Card, CardId, CardListItem, NO_SELECTION};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

/// Default view and submitted-selection view shared by every front-end.
pub use view::{parse_selection, CardView, SelectionError};
