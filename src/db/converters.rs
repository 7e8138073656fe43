//! Row-to-domain conversions for the `objects` and `relationships` tables.

use rusqlite::Row;

use crate::types::{NodeRef, Relationship};

/// Map a `relationships` row (selected with named columns) to a [`Relationship`].
pub fn row_to_relationship(row: &Row<'_>) -> rusqlite::Result<Relationship> {
    Ok(Relationship {
        source_id: row.get("source_id")?,
        source_type: row.get("source_type")?,
        destination_id: row.get("destination_id")?,
        destination_type: row.get("destination_type")?,
    })
}

/// Map an `objects` row to a [`NodeRef`].
pub fn row_to_node(row: &Row<'_>) -> rusqlite::Result<NodeRef> {
    Ok(NodeRef {
        id: row.get("id")?,
        kind: row.get("type")?,
    })
}
