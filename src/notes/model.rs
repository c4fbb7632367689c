//! Note entity.

use chrono::{DateTime, Utc};

/// Row id of a stored note.
pub type NoteId = i64;

/// A short shared text note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    pub added: DateTime<Utc>,
    pub changed: DateTime<Utc>,
}

impl Note {
    /// True if saving `title` and `text` would change this note.
    pub fn differs_from(&self, title: &str, text: &str) -> bool {
        self.title != title || self.text != text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_differs_from() {
        let now = Utc::now();
        let note = Note {
            id: 1,
            title: "groceries".into(),
            text: "milk".into(),
            added: now,
            changed: now,
        };
        assert!(!note.differs_from("groceries", "milk"));
        assert!(note.differs_from("Groceries", "milk"));
        assert!(note.differs_from("groceries", "milk, eggs"));
    }
}
