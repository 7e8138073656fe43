//! Relationship storage: collaborator traits and the SQLite implementation.
//!
//! The resolver only ever talks to [`EdgeStore`] and [`NodeLoader`]. The
//! SQLite-backed [`GraphStore`] implements both and adds the write helpers
//! used by fixtures and the CLI. Every query goes through
//! [`Connection::prepare_cached`], so repeated BFS layers reuse one compiled
//! statement per direction.

use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::converters::{row_to_node, row_to_relationship};
use crate::db::schema::initialize_database;
use crate::error::{MegaGraphError, Result};
use crate::types::{Direction, NodeRef, Relationship};

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Read access to the relationship edge set.
pub trait EdgeStore {
    /// Return every edge whose filtered endpoint (source for
    /// [`Direction::Children`], destination for [`Direction::Parents`]) is
    /// in `ids` and whose two endpoints both have type `kind`.
    fn find_edges(
        &self,
        direction: Direction,
        ids: &HashSet<i64>,
        kind: &str,
    ) -> Result<Vec<Relationship>>;
}

/// Fetches a node's current identity by type and id.
pub trait NodeLoader {
    /// # Errors
    ///
    /// [`MegaGraphError::NotFound`] when no such node exists.
    fn load(&self, kind: &str, id: i64) -> Result<NodeRef>;
}

impl<T: EdgeStore + ?Sized> EdgeStore for &T {
    fn find_edges(
        &self,
        direction: Direction,
        ids: &HashSet<i64>,
        kind: &str,
    ) -> Result<Vec<Relationship>> {
        (**self).find_edges(direction, ids, kind)
    }
}

impl<T: NodeLoader + ?Sized> NodeLoader for &T {
    fn load(&self, kind: &str, id: i64) -> Result<NodeRef> {
        (**self).load(kind, id)
    }
}

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Aggregate statistics about the stored graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct GraphStats {
    pub objects: usize,
    pub relationships: usize,
}

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

// The frontier is bound as a JSON array and expanded with json_each so a
// single cached statement serves frontiers of any size.
pub(crate) const FIND_CHILD_EDGES_SQL: &str = "\
SELECT source_id, source_type, destination_id, destination_type
FROM relationships INDEXED BY idx_rel_source
WHERE source_type = ?1
  AND destination_type = ?1
  AND source_id IN (SELECT value FROM json_each(?2))";

pub(crate) const FIND_PARENT_EDGES_SQL: &str = "\
SELECT source_id, source_type, destination_id, destination_type
FROM relationships INDEXED BY idx_rel_destination
WHERE destination_type = ?1
  AND source_type = ?1
  AND destination_id IN (SELECT value FROM json_each(?2))";

const UPSERT_OBJECT_SQL: &str = "\
INSERT INTO objects (id, type, title) VALUES (?1, ?2, ?3)
ON CONFLICT(type, id) DO UPDATE SET title = excluded.title";

const INSERT_RELATIONSHIP_SQL: &str = "\
INSERT OR IGNORE INTO relationships (source_id, source_type, destination_id, destination_type)
VALUES (?1, ?2, ?3, ?4)";

const DELETE_RELATIONSHIP_SQL: &str = "\
DELETE FROM relationships
WHERE source_id = ?1 AND source_type = ?2
  AND destination_id = ?3 AND destination_type = ?4";

// ---------------------------------------------------------------------------
// GraphStore
// ---------------------------------------------------------------------------

/// SQLite-backed relationship store.
pub struct GraphStore {
    pub conn: Connection,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore").finish_non_exhaustive()
    }
}

impl GraphStore {
    /// Open (or create) the database at `db_path`, apply the schema, and
    /// return a ready-to-use store.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = initialize_database(db_path)?;
        Ok(Self { conn })
    }

    /// In-memory store, mostly for tests and benchmarks.
    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }

    // -------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------

    /// Register (or retitle) an object.
    pub fn insert_node(&self, node: &NodeRef, title: Option<&str>) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(UPSERT_OBJECT_SQL)?;
        stmt.execute(params![node.id, node.kind, title])?;
        Ok(())
    }

    /// Insert a relationship. Returns `false` if it already existed.
    pub fn insert_relationship(&self, source: &NodeRef, destination: &NodeRef) -> Result<bool> {
        let mut stmt = self.conn.prepare_cached(INSERT_RELATIONSHIP_SQL)?;
        let changed = stmt.execute(params![
            source.id,
            source.kind,
            destination.id,
            destination.kind
        ])?;
        Ok(changed > 0)
    }

    /// Batch-insert relationships inside a single transaction.
    pub fn insert_relationships(&self, edges: &[(NodeRef, NodeRef)]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(INSERT_RELATIONSHIP_SQL)?;
            for (source, destination) in edges {
                inserted += stmt.execute(params![
                    source.id,
                    source.kind,
                    destination.id,
                    destination.kind
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Remove a relationship. Returns `false` if there was nothing to remove.
    pub fn delete_relationship(&self, source: &NodeRef, destination: &NodeRef) -> Result<bool> {
        let mut stmt = self.conn.prepare_cached(DELETE_RELATIONSHIP_SQL)?;
        let changed = stmt.execute(params![
            source.id,
            source.kind,
            destination.id,
            destination.kind
        ])?;
        Ok(changed > 0)
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Look up an object, or `None` if it was never registered.
    pub fn get_node(&self, kind: &str, id: i64) -> Result<Option<NodeRef>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, type FROM objects WHERE type = ?1 AND id = ?2")?;
        stmt.query_row(params![kind, id], row_to_node)
            .optional()
            .map_err(Into::into)
    }

    /// Return every stored relationship.
    pub fn get_all_relationships(&self) -> Result<Vec<Relationship>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT source_id, source_type, destination_id, destination_type FROM relationships",
        )?;
        let rows = stmt.query_and_then([], row_to_relationship)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Get aggregate statistics (object count, relationship count).
    pub fn get_stats(&self) -> Result<GraphStats> {
        // FromSql for usize range-checks the i64 count.
        let objects: usize = self
            .conn
            .prepare_cached("SELECT count(*) FROM objects")?
            .query_row([], |row| row.get(0))?;
        let relationships: usize = self
            .conn
            .prepare_cached("SELECT count(*) FROM relationships")?
            .query_row([], |row| row.get(0))?;
        Ok(GraphStats {
            objects,
            relationships,
        })
    }
}

impl EdgeStore for GraphStore {
    fn find_edges(
        &self,
        direction: Direction,
        ids: &HashSet<i64>,
        kind: &str,
    ) -> Result<Vec<Relationship>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = match direction {
            Direction::Children => FIND_CHILD_EDGES_SQL,
            Direction::Parents => FIND_PARENT_EDGES_SQL,
        };
        let frontier = serde_json::to_string(ids)?;
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_and_then(params![kind, frontier], row_to_relationship)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

impl NodeLoader for GraphStore {
    fn load(&self, kind: &str, id: i64) -> Result<NodeRef> {
        self.get_node(kind, id)?
            .ok_or_else(|| MegaGraphError::not_found(kind, id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
