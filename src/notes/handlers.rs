//! Dispatch of gated requests to the note operations.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::export::{ExportError, PasteExporter};
use crate::http::form::FormFields;
use crate::notes::model::{Note, NoteId};
use crate::notes::store::{FilterKind, NoteStore};
use crate::render::pages;
use crate::routing::Route;
use crate::security::{GateError, Token, TokenIssuer};

/// Renders a confirmation or edit page for a note with a fresh token.
type PreparePage = fn(&Note, &Token) -> String;

/// Handlers bound to each route; owns handles to the external collaborators.
#[derive(Clone)]
pub struct NoteHandlers {
    store: Arc<dyn NoteStore>,
    exporter: Option<Arc<dyn PasteExporter>>,
    tokens: Arc<TokenIssuer>,
}

impl NoteHandlers {
    pub fn new(
        store: Arc<dyn NoteStore>,
        exporter: Option<Arc<dyn PasteExporter>>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            store,
            exporter,
            tokens,
        }
    }

    /// Run the handler for an admitted (and, if mutating, authorized) route.
    pub async fn dispatch(&self, route: Route, form: &FormFields) -> Result<Response, GateError> {
        match route {
            Route::Index => self.index(),
            Route::AddNote => Ok(Html(pages::add_note_page(&self.tokens.issue())).into_response()),
            Route::NewNote => self.new_note(form),
            Route::ViewNote { id } => self.view_note(id),
            Route::EditNote { id } => self.prepare(id, pages::edit_note_page),
            Route::DeleteNote { id } => self.prepare(id, pages::delete_note_page),
            Route::PasteBinNote { id } => self.prepare(id, pages::paste_bin_note_page),
            Route::SaveNote { id } => self.save_note(id, form),
            Route::ConfirmDeleteNote { id } => self.delete_note(id),
            Route::ConfirmPasteBinNote { id } => self.paste_note(id).await,
            Route::Filter { kind, needle } => self.filtered(kind, &needle),
        }
    }

    fn index(&self) -> Result<Response, GateError> {
        let notes = self.store.load_all()?;
        Ok(Html(pages::index_page(&notes, false)).into_response())
    }

    fn filtered(&self, kind: FilterKind, needle: &str) -> Result<Response, GateError> {
        let notes = self.store.load_where(kind, needle)?;
        Ok(Html(pages::index_page(&notes, true)).into_response())
    }

    fn new_note(&self, form: &FormFields) -> Result<Response, GateError> {
        let id = self.store.add(form.title(), form.text())?;
        tracing::info!(note_id = id, "Note added");
        Ok(found("/"))
    }

    fn view_note(&self, id: NoteId) -> Result<Response, GateError> {
        let note = self.store.get(id)?;
        Ok(Html(pages::note_page(&note)).into_response())
    }

    fn prepare(&self, id: NoteId, page: PreparePage) -> Result<Response, GateError> {
        let note = self.store.get(id)?;
        let token = self.tokens.issue();
        Ok(Html(page(&note, &token)).into_response())
    }

    fn save_note(&self, id: NoteId, form: &FormFields) -> Result<Response, GateError> {
        let note = self.store.get(id)?;
        if note.differs_from(form.title(), form.text()) {
            self.store.update(id, form.title(), form.text())?;
            tracing::info!(note_id = id, "Note updated");
        }
        Ok(found(&format!("/Note/{id}")))
    }

    fn delete_note(&self, id: NoteId) -> Result<Response, GateError> {
        self.store.delete(id)?;
        tracing::info!(note_id = id, "Note deleted");
        Ok(found("/"))
    }

    async fn paste_note(&self, id: NoteId) -> Result<Response, GateError> {
        let exporter = self.exporter.as_ref().ok_or(ExportError::Disabled)?;
        let note = self.store.get(id)?;

        let title = format!("{} (ID:{})", note.title, note.id);
        let reference = exporter.export(&title, &note.text).await?;
        tracing::info!(note_id = id, reference = %reference, "Note exported");

        Ok(found(&reference))
    }
}

/// 302 redirect to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::store::SqliteNoteStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingExporter {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl PasteExporter for RecordingExporter {
        async fn export(&self, title: &str, body: &str) -> Result<String, ExportError> {
            self.calls.lock().unwrap().push((title.to_string(), body.to_string()));
            Ok("http://paste.example/xyz".to_string())
        }
    }

    fn handlers(exporter: Option<Arc<dyn PasteExporter>>) -> (NoteHandlers, Arc<SqliteNoteStore>) {
        let store = Arc::new(SqliteNoteStore::open_in_memory().unwrap());
        let handlers = NoteHandlers::new(store.clone(), exporter, Arc::new(TokenIssuer::new()));
        (handlers, store)
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_new_note_redirects_home() {
        let (handlers, store) = handlers(None);
        let form = FormFields::parse(None, b"title=T&text=body");

        let response = handlers.dispatch(Route::NewNote, &form).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/");
        assert_eq!(store.load_all().unwrap()[0].title, "T");
    }

    #[tokio::test]
    async fn test_save_note_redirects_to_note() {
        let (handlers, store) = handlers(None);
        let id = store.add("old", "text").unwrap();
        let form = FormFields::parse(None, b"title=new&text=text");

        let response = handlers.dispatch(Route::SaveNote { id }, &form).await.unwrap();
        assert_eq!(location(&response), format!("/Note/{id}"));
        assert_eq!(store.get(id).unwrap().title, "new");
    }

    #[tokio::test]
    async fn test_missing_note_is_upstream_failure() {
        let (handlers, _store) = handlers(None);
        let err = handlers
            .dispatch(Route::ViewNote { id: 5 }, &FormFields::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Upstream(msg) if msg == "Note not found: 5"));
    }

    #[tokio::test]
    async fn test_prepare_issues_token() {
        let (handlers, store) = handlers(None);
        let id = store.add("t", "x").unwrap();
        assert!(handlers.tokens.is_empty());

        for route in [
            Route::EditNote { id },
            Route::DeleteNote { id },
            Route::PasteBinNote { id },
        ] {
            let response = handlers.dispatch(route, &FormFields::default()).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(handlers.tokens.len(), 3);
    }

    #[tokio::test]
    async fn test_paste_uses_titled_export() {
        let exporter = Arc::new(RecordingExporter::default());
        let (handlers, store) = handlers(Some(exporter.clone()));
        let id = store.add("Recipe", "flour, water").unwrap();

        let response = handlers
            .dispatch(Route::ConfirmPasteBinNote { id }, &FormFields::default())
            .await
            .unwrap();
        assert_eq!(location(&response), "http://paste.example/xyz");

        let calls = exporter.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            &[(format!("Recipe (ID:{id})"), "flour, water".to_string())]
        );
    }

    #[tokio::test]
    async fn test_paste_disabled() {
        let (handlers, store) = handlers(None);
        let id = store.add("a", "b").unwrap();
        let err = handlers
            .dispatch(Route::ConfirmPasteBinNote { id }, &FormFields::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Upstream(msg) if msg == "Paste export is disabled"));
    }
}
