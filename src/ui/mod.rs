//! Ratatui front-end: a card list on the left, the selected card on the right.

mod app;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
