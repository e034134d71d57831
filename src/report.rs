//! Plain-text rendering of the two views for the `list` and `show` commands.

use std::io::{self, Write};

use crate::view::CardView;

/// Width of the label column in `show` output.
const LABEL_WIDTH: usize = 12;

/// One `id<TAB>name` line per listed card.
pub fn write_listing<W: Write>(out: &mut W, view: &CardView) -> io::Result<()> {
    for item in &view.items {
        writeln!(out, "{}\t{}", item.id, item.name)?;
    }
    Ok(())
}

/// The listing size, then every field of the selected card or a
/// "nothing selected" line.
pub fn write_card<W: Write>(out: &mut W, view: &CardView) -> io::Result<()> {
    writeln!(out, "{} cards listed", view.items.len())?;
    match &view.selected {
        Some(card) => {
            for (label, value) in card.fields() {
                writeln!(out, "{label:<LABEL_WIDTH$}{value}")?;
            }
        }
        None => writeln!(out, "No card selected.")?,
    }
    Ok(())
}
