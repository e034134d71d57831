//! Domain models that mirror the `TLACardList` table. They stay plain data
//! holders so the persistence layer can fill them and the views can read them
//! without either side knowing about the other.

use std::fmt;

/// Primary key type of the card table.
pub type CardId = i64;

/// The zero id. Submitting it means "nothing selected".
pub const NO_SELECTION: CardId = 0;

#[derive(Debug, Clone, PartialEq)]
/// One row of the card catalog. Field order follows the column ordinals of
/// the table, which is also the order the detail pane shows them in.
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub card_set: String,
    pub card_type: String,
    /// Collector index inside the set. The column is a decimal but is read as
    /// `f64`: values like `12.5` survive, while the exact textual form does
    /// not. Trailing zeros are lost (`12.10` shows as `12.1`) and very long
    /// fractions are rounded to the nearest binary float.
    pub collector_number: f64,
    /// Kept as text: costs like `{2}{R}` or `X` are not numbers.
    pub cost: String,
    pub details: String,
    pub image_file_name: String,
}

impl Card {
    /// Label/value pairs for every field, in column order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Id", self.id.to_string()),
            ("Name", self.name.clone()),
            ("Set", self.card_set.clone()),
            ("Type", self.card_type.clone()),
            ("Collector #", format_collector_number(self.collector_number)),
            ("Cost", self.cost.clone()),
            ("Details", self.details.clone()),
            ("Image", self.image_file_name.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An (id, name) pair for the selection list. Never persisted.
pub struct CardListItem {
    pub id: CardId,
    pub name: String,
}

impl fmt::Display for CardListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Render a collector number without trailing zeros: `1.0` becomes `1`,
/// `12.50` becomes `12.5`.
pub fn format_collector_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
