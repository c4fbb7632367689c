//! Shared notes web application library

pub mod config;
pub mod export;
pub mod http;
pub mod lifecycle;
pub mod notes;
pub mod observability;
pub mod render;
pub mod routing;
pub mod security;

pub use config::schema::NotesConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
