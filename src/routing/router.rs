//! Route lookup.
//!
//! # Responsibilities
//! - Hold the ordered route table
//! - Find the first entry whose matcher accepts the path
//! - Turn the captured parameter into a typed `Route`
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan; first match wins
//! - Explicit errors rather than a silent default route

use thiserror::Error;

use crate::notes::{FilterKind, NoteId};
use crate::routing::matcher::{Capture, DigitsMatcher, ExactMatcher, FilterTextMatcher, Matcher};

/// A matched route with its extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    AddNote,
    NewNote,
    ViewNote { id: NoteId },
    EditNote { id: NoteId },
    DeleteNote { id: NoteId },
    PasteBinNote { id: NoteId },
    SaveNote { id: NoteId },
    ConfirmDeleteNote { id: NoteId },
    ConfirmPasteBinNote { id: NoteId },
    Filter { kind: FilterKind, needle: String },
}

impl Route {
    /// Stable label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Index => "index",
            Route::AddNote => "add_note",
            Route::NewNote => "new_note",
            Route::ViewNote { .. } => "view_note",
            Route::EditNote { .. } => "edit_note",
            Route::DeleteNote { .. } => "delete_note",
            Route::PasteBinNote { .. } => "paste_bin_note",
            Route::SaveNote { .. } => "save_note",
            Route::ConfirmDeleteNote { .. } => "confirm_delete_note",
            Route::ConfirmPasteBinNote { .. } => "confirm_paste_bin_note",
            Route::Filter { kind: FilterKind::Title, .. } => "title_filter",
            Route::Filter { kind: FilterKind::Text, .. } => "text_filter",
            Route::Filter { kind: FilterKind::Both, .. } => "both_filter",
        }
    }

    /// Routes that change stored notes or export them; these need a valid form token.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Route::NewNote
                | Route::SaveNote { .. }
                | Route::ConfirmDeleteNote { .. }
                | Route::ConfirmPasteBinNote { .. }
        )
    }
}

/// Why a path did not resolve to a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route matches {0}")]
    NotFound(String),

    #[error("invalid note id: {0}")]
    InvalidId(String),
}

/// Builds a `Route` from what the matcher captured.
pub type Extractor = fn(Capture<'_>) -> Result<Route, RouteError>;

struct RouteEntry {
    matcher: Box<dyn Matcher>,
    extract: Extractor,
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Ordered dispatch table.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route; entries are tried in insertion order.
    pub fn route(mut self, matcher: impl Matcher + 'static, extract: Extractor) -> Self {
        self.entries.push(RouteEntry {
            matcher: Box::new(matcher),
            extract,
        });
        self
    }

    /// The note-sharing route table.
    pub fn notes() -> Self {
        Self::new()
            .route(ExactMatcher::new("/"), |_| Ok(Route::Index))
            .route(ExactMatcher::new("/AddNote/"), |_| Ok(Route::AddNote))
            .route(ExactMatcher::new("/NewNote/"), |_| Ok(Route::NewNote))
            .route(DigitsMatcher::new("/Note/"), |c| {
                Ok(Route::ViewNote { id: note_id(c)? })
            })
            .route(DigitsMatcher::new("/EditNote/"), |c| {
                Ok(Route::EditNote { id: note_id(c)? })
            })
            .route(DigitsMatcher::new("/DeleteNote/"), |c| {
                Ok(Route::DeleteNote { id: note_id(c)? })
            })
            .route(DigitsMatcher::new("/PasteBinNote/"), |c| {
                Ok(Route::PasteBinNote { id: note_id(c)? })
            })
            .route(DigitsMatcher::new("/SaveNote/"), |c| {
                Ok(Route::SaveNote { id: note_id(c)? })
            })
            .route(DigitsMatcher::new("/ConfirmDeleteNote/"), |c| {
                Ok(Route::ConfirmDeleteNote { id: note_id(c)? })
            })
            .route(DigitsMatcher::new("/ConfirmPasteBinNote/"), |c| {
                Ok(Route::ConfirmPasteBinNote { id: note_id(c)? })
            })
            .route(FilterTextMatcher::new("/TitleFilter/"), |c| {
                filter(FilterKind::Title, c)
            })
            .route(FilterTextMatcher::new("/TextFilter/"), |c| {
                filter(FilterKind::Text, c)
            })
            .route(FilterTextMatcher::new("/BothFilter/"), |c| {
                filter(FilterKind::Both, c)
            })
    }

    /// Resolve a (percent-decoded) path; first match wins.
    pub fn match_path(&self, path: &str) -> Result<Route, RouteError> {
        self.entries
            .iter()
            .find_map(|entry| entry.matcher.capture(path).map(|c| (entry.extract)(c)))
            .unwrap_or_else(|| Err(RouteError::NotFound(path.to_string())))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Digits that do not fit a note id are a bad request, never coerced.
fn note_id(capture: Capture<'_>) -> Result<NoteId, RouteError> {
    match capture {
        Capture::Digits(digits) => digits
            .parse::<NoteId>()
            .map_err(|_| RouteError::InvalidId(digits.to_string())),
        other => Err(RouteError::InvalidId(format!("{:?}", other))),
    }
}

fn filter(kind: FilterKind, capture: Capture<'_>) -> Result<Route, RouteError> {
    match capture {
        Capture::FilterText(needle) => Ok(Route::Filter {
            kind,
            needle: needle.to_string(),
        }),
        other => Err(RouteError::NotFound(format!("{:?}", other))),
    }
}
