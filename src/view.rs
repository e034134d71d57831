//! The two entry points every front-end goes through: the default view and
//! the view for a submitted selection. Both recompute the listing on every
//! call; only the fetch differs.

use thiserror::Error;

use crate::db::{CardStore, StoreError};
use crate::models::{Card, CardId, CardListItem, NO_SELECTION};

/// What a front-end renders: the full listing plus at most one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub items: Vec<CardListItem>,
    pub selected_id: CardId,
    pub selected: Option<Card>,
}

impl CardView {
    /// Render the default view. The held selection is fetched as-is; with
    /// nothing held that is `NO_SELECTION`, which comes back empty.
    pub fn initial(store: &CardStore, held: CardId) -> Result<Self, StoreError> {
        let items = store.list()?;
        let selected = store.fetch(held)?;
        Ok(Self {
            items,
            selected_id: held,
            selected,
        })
    }

    /// Render the view for a submitted selection. The zero id skips the
    /// lookup entirely.
    pub fn submit(store: &CardStore, id: CardId) -> Result<Self, StoreError> {
        let items = store.list()?;
        let selected = if id != NO_SELECTION {
            store.fetch(id)?
        } else {
            None
        };
        Ok(Self {
            items,
            selected_id: id,
            selected,
        })
    }

    /// Position of the selected id inside the listing, if it is listed.
    pub fn position_of(&self, id: CardId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{0}' is not a card id")]
    NotANumber(String),
}

/// Turn typed input into a card id. Blank input means no selection; anything
/// that is not an integer is rejected here and never reaches a query.
pub fn parse_selection(input: &str) -> Result<CardId, SelectionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(NO_SELECTION);
    }
    trimmed
        .parse::<CardId>()
        .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))
}
