//! Note persistence.
//!
//! The gate only needs the `NoteStore` trait; `SqliteNoteStore` is the
//! implementation the binary wires in. Calls are short and synchronous.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::notes::model::{Note, NoteId};

/// Errors raised by a note store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The requested note does not exist.
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// A previous panic left the connection lock poisoned.
    #[error("Note store is unavailable")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which note fields a filtered listing searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Title,
    Text,
    Both,
}

/// Record store for notes.
pub trait NoteStore: Send + Sync {
    /// All notes, most recently changed first.
    fn load_all(&self) -> StoreResult<Vec<Note>>;

    /// Notes whose selected fields contain `needle`, ignoring case.
    fn load_where(&self, kind: FilterKind, needle: &str) -> StoreResult<Vec<Note>>;

    fn get(&self, id: NoteId) -> StoreResult<Note>;

    /// Insert a note and return its id.
    fn add(&self, title: &str, text: &str) -> StoreResult<NoteId>;

    /// Replace title and text, stamping the change time.
    fn update(&self, id: NoteId, title: &str, text: &str) -> StoreResult<()>;

    fn delete(&self, id: NoteId) -> StoreResult<()>;
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS notes (
    note_id     INTEGER NOT NULL PRIMARY KEY,
    title       TEXT NOT NULL,
    text        TEXT NOT NULL,
    add_date    INTEGER NOT NULL,
    change_date INTEGER NOT NULL
)";

const SELECT_NOTES: &str = "SELECT note_id, title, text, add_date, change_date
     FROM notes
     ORDER BY change_date DESC, note_id DESC";

const SELECT_NOTES_WHERE_TITLE: &str = "SELECT note_id, title, text, add_date, change_date
     FROM notes
     WHERE title LIKE '%' || ?1 || '%'
     ORDER BY change_date DESC, note_id DESC";

const SELECT_NOTES_WHERE_TEXT: &str = "SELECT note_id, title, text, add_date, change_date
     FROM notes
     WHERE text LIKE '%' || ?1 || '%'
     ORDER BY change_date DESC, note_id DESC";

const SELECT_NOTES_WHERE_BOTH: &str = "SELECT note_id, title, text, add_date, change_date
     FROM notes
     WHERE title LIKE '%' || ?1 || '%' OR text LIKE '%' || ?1 || '%'
     ORDER BY change_date DESC, note_id DESC";

const LOOKUP_NOTE: &str = "SELECT note_id, title, text, add_date, change_date
     FROM notes
     WHERE note_id = ?1";

/// SQLite-backed note store with a single serialized connection.
pub struct SqliteNoteStore {
    conn: Mutex<Connection>,
}

impl SqliteNoteStore {
    /// Open (creating if needed) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_notes(&self, sql: &str, needle: Option<&str>) -> StoreResult<Vec<Note>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = match needle {
            Some(needle) => stmt.query_map(params![needle], note_from_row)?,
            None => stmt.query_map([], note_from_row)?,
        };
        let notes = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }
}

impl NoteStore for SqliteNoteStore {
    fn load_all(&self) -> StoreResult<Vec<Note>> {
        self.query_notes(SELECT_NOTES, None)
    }

    fn load_where(&self, kind: FilterKind, needle: &str) -> StoreResult<Vec<Note>> {
        let sql = match kind {
            FilterKind::Title => SELECT_NOTES_WHERE_TITLE,
            FilterKind::Text => SELECT_NOTES_WHERE_TEXT,
            FilterKind::Both => SELECT_NOTES_WHERE_BOTH,
        };
        self.query_notes(sql, Some(needle))
    }

    fn get(&self, id: NoteId) -> StoreResult<Note> {
        let conn = self.connection()?;
        conn.query_row(LOOKUP_NOTE, params![id], note_from_row)
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    fn add(&self, title: &str, text: &str) -> StoreResult<NoteId> {
        let now = Utc::now().timestamp();
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO notes (title, text, add_date, change_date) VALUES (?1, ?2, ?3, ?3)",
            params![title, text, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, id: NoteId, title: &str, text: &str) -> StoreResult<()> {
        let now = Utc::now().timestamp();
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE notes SET title = ?1, text = ?2, change_date = ?3 WHERE note_id = ?4",
            params![title, text, now, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete(&self, id: NoteId) -> StoreResult<()> {
        let conn = self.connection()?;
        let removed = conn.execute("DELETE FROM notes WHERE note_id = ?1", params![id])?;
        if removed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        added: from_unix(row.get(3)?),
        changed: from_unix(row.get(4)?),
    })
}

fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}
