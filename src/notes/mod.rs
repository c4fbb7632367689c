//! Notes subsystem.
//!
//! # Data Flow
//! ```text
//! Route (from the gate)
//!     → handlers.rs (one operation per route)
//!     → store.rs (SQLite record store)
//!     → render (HTML page) or 302 redirect
//! ```

pub mod handlers;
pub mod model;
pub mod store;

pub use handlers::NoteHandlers;
pub use model::{Note, NoteId};
pub use store::{FilterKind, NoteStore, SqliteNoteStore, StoreError, StoreResult};
