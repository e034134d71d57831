use rusqlite::{params, Connection, OptionalExtension, Row};

use super::connection::CardStore;
use super::error::StoreError;
use crate::models::{Card, CardId, CardListItem, NO_SELECTION};

/// Every card as an (id, name) pair, ordered by id so repeated listings come
/// back identical.
pub fn list_cards(conn: &Connection) -> Result<Vec<CardListItem>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT Id, Name FROM TLACardList ORDER BY Id")
        .map_err(StoreError::from_query)?;

    let items = stmt
        .query_map([], |row| {
            Ok(CardListItem {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(StoreError::from_query)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::from_query)?;

    Ok(items)
}

/// Look up one card by primary key. A missing card is `Ok(None)`, and so is
/// `NO_SELECTION`, even if a row happens to use that id.
pub fn fetch_card(conn: &Connection, id: CardId) -> Result<Option<Card>, StoreError> {
    if id == NO_SELECTION {
        return Ok(None);
    }
    conn.query_row(
        "SELECT * FROM TLACardList WHERE Id = ?1",
        params![id],
        map_card_row,
    )
    .optional()
    .map_err(StoreError::from_query)
}

/// Map a full row by column ordinal.
fn map_card_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        name: row.get(1)?,
        card_set: row.get(2)?,
        card_type: row.get(3)?,
        collector_number: row.get(4)?,
        cost: row.get(5)?,
        details: row.get(6)?,
        image_file_name: row.get(7)?,
    })
}

impl CardStore {
    /// List every card over a fresh connection.
    pub fn list(&self) -> Result<Vec<CardListItem>, StoreError> {
        let conn = self.connect()?;
        let items = list_cards(&conn)?;
        log::debug!("listed {} cards", items.len());
        Ok(items)
    }

    /// Fetch one card over a fresh connection.
    pub fn fetch(&self, id: CardId) -> Result<Option<Card>, StoreError> {
        let conn = self.connect()?;
        let card = fetch_card(&conn, id)?;
        log::debug!("fetch card {id}: {}", if card.is_some() { "found" } else { "not found" });
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_schema;

    fn memory_store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    fn insert(conn: &Connection, id: CardId, name: &str) {
        conn.execute(
            "INSERT INTO TLACardList VALUES (?1, ?2, 'Alpha', 'Instant', 1.0, 'R', 'Deal 3 damage', 'bolt.png')",
            params![id, name],
        )
        .unwrap();
    }

    #[test]
    fn empty_table_lists_nothing() {
        let conn = memory_store();
        assert!(list_cards(&conn).unwrap().is_empty());
        assert_eq!(fetch_card(&conn, 1).unwrap(), None);
    }

    #[test]
    fn listing_is_ordered_by_id() {
        let conn = memory_store();
        insert(&conn, 3, "Shock");
        insert(&conn, 1, "Lightning Bolt");
        insert(&conn, 2, "Counterspell");

        let ids: Vec<_> = list_cards(&conn).unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn fetch_maps_every_column() {
        let conn = memory_store();
        insert(&conn, 1, "Lightning Bolt");

        let card = fetch_card(&conn, 1).unwrap().unwrap();
        assert_eq!(
            card,
            Card {
                id: 1,
                name: "Lightning Bolt".into(),
                card_set: "Alpha".into(),
                card_type: "Instant".into(),
                collector_number: 1.0,
                cost: "R".into(),
                details: "Deal 3 damage".into(),
                image_file_name: "bolt.png".into(),
            }
        );
    }

    #[test]
    fn zero_id_is_not_found() {
        let conn = memory_store();
        insert(&conn, 1, "Lightning Bolt");
        assert_eq!(fetch_card(&conn, 0).unwrap(), None);
    }

    #[test]
    fn row_with_zero_id_is_never_fetched() {
        let conn = memory_store();
        insert(&conn, 0, "Zero");
        insert(&conn, 1, "Lightning Bolt");

        assert_eq!(list_cards(&conn).unwrap().len(), 2);
        assert_eq!(fetch_card(&conn, NO_SELECTION).unwrap(), None);
        assert!(fetch_card(&conn, 1).unwrap().is_some());
    }

    #[test]
    fn short_table_is_schema_fault() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE TLACardList (Id INTEGER PRIMARY KEY, Name TEXT);
             INSERT INTO TLACardList VALUES (1, 'Lightning Bolt');",
        )
        .unwrap();

        assert_eq!(list_cards(&conn).unwrap().len(), 1);
        assert!(matches!(fetch_card(&conn, 1), Err(StoreError::Schema(_))));
    }

    #[test]
    fn text_collector_number_is_schema_fault() {
        let conn = memory_store();
        conn.execute(
            "INSERT INTO TLACardList VALUES (1, 'Bolt', 'Alpha', 'Instant', 'abc', 'R', '', '')",
            [],
        )
        .unwrap();
        assert!(matches!(fetch_card(&conn, 1), Err(StoreError::Schema(_))));
    }
}
