//! SQLite schema initialization for megagraph.
//!
//! Two tables: `objects` holds the identity of every node by `(type, id)`,
//! and `relationships` holds directed edges between them.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants
// ---------------------------------------------------------------------------

const CREATE_OBJECTS: &str = "\
CREATE TABLE IF NOT EXISTS objects (
  id INTEGER NOT NULL,
  type TEXT NOT NULL,
  title TEXT,
  PRIMARY KEY (type, id)
)";

const CREATE_RELATIONSHIPS: &str = "\
CREATE TABLE IF NOT EXISTS relationships (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  source_id INTEGER NOT NULL,
  source_type TEXT NOT NULL,
  destination_id INTEGER NOT NULL,
  destination_type TEXT NOT NULL,
  UNIQUE (source_type, source_id, destination_type, destination_id)
)";

// Indexes ----------------------------------------------------------------

// One covering index per traversal direction: both type tags, then the
// filtered endpoint id, then the id the walk advances to. The find-edges
// queries name them with INDEXED BY, since the UNIQUE autoindex also starts
// with source_type and the planner otherwise settles for it on parent walks.
const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_rel_source ON relationships(source_type, destination_type, source_id, destination_id)",
    "CREATE INDEX IF NOT EXISTS idx_rel_destination ON relationships(destination_type, source_type, destination_id, source_id)",
    "CREATE INDEX IF NOT EXISTS idx_objects_type ON objects(type)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) the SQLite database at `db_path` and apply the schema.
///
/// The returned connection has WAL mode and synchronous NORMAL configured.
/// Relationships may point at objects that were never registered, so
/// foreign keys stay off.
///
/// # Errors
///
/// Returns a `rusqlite::Error` if the database cannot be opened or any DDL
/// statement fails.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    // -- Pragmas ----------------------------------------------------------
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "OFF")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    // -- Tables -----------------------------------------------------------
    conn.execute_batch(CREATE_OBJECTS)?;
    conn.execute_batch(CREATE_RELATIONSHIPS)?;

    // -- Indexes ----------------------------------------------------------
    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }

    tracing::debug!(db_path, "database schema ready");
    Ok(conn)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
