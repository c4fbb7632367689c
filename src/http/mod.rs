//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, path decoding)
//!     → security gate (throttle, route match)
//!     → form.rs (form fields, submitted token)
//!     → note handlers
//!     → Send to client
//! ```

pub mod form;
pub mod request;
pub mod server;

pub use form::FormFields;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
