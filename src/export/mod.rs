//! Outbound export of notes.

pub mod paste;

pub use paste::{ExportError, HttpPasteExporter, PasteExporter};
