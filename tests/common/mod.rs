//! Shared utilities for integration testing.

#![allow(dead_code)]

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use share_notes::config::NotesConfig;
use share_notes::export::{ExportError, PasteExporter};
use share_notes::notes::SqliteNoteStore;
use share_notes::{HttpServer, Shutdown};

pub const PASTE_REFERENCE: &str = "http://paste.example/abc123";

/// Exporter that records every call instead of talking to a paste service.
#[derive(Default)]
pub struct RecordingExporter {
    pub calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl PasteExporter for RecordingExporter {
    async fn export(&self, title: &str, body: &str) -> Result<String, ExportError> {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(PASTE_REFERENCE.to_string())
    }
}

/// A running server; stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<SqliteNoteStore>,
    pub exporter: Arc<RecordingExporter>,
    _shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Config with the throttle disabled so tests can issue requests back to back.
pub fn test_config() -> NotesConfig {
    let mut config = NotesConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.throttle.min_interval_ns = 0;
    config
}

/// Start a server over an in-memory store on an ephemeral port.
pub async fn spawn_server(config: NotesConfig) -> TestServer {
    let store = Arc::new(SqliteNoteStore::open_in_memory().unwrap());
    let exporter = Arc::new(RecordingExporter::default());

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store.clone(), Some(exporter.clone()));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        store,
        exporter,
        _shutdown: shutdown,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Value of the hidden input named `name` in a rendered page.
pub fn hidden_field(html: &str, name: &str) -> Option<String> {
    let marker = format!(r#"name="{name}" value=""#);
    let start = html.find(&marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}

/// Token fields scraped from a form page, ready to post back.
pub fn token_form(html: &str) -> Vec<(String, String)> {
    ["share_note_token_id", "share_note_token_string"]
        .iter()
        .filter_map(|name| hidden_field(html, name).map(|value| (name.to_string(), value)))
        .collect()
}
