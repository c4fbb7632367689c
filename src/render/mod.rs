//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Note / [Note] from the store
//!     → links.rs (body text → annotated markup)
//!     → pages.rs (HTML document, escaped fields, embedded form token)
//!     → Html response
//! ```

pub mod links;
pub mod pages;

pub use links::{annotate, Markup};
