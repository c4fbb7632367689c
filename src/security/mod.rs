//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → throttle.rs (one global slot, atomic check-and-set)
//!     → routing (path → Route)
//!     → tokens.rs (validate form token on mutating routes)
//!     → Pass to dispatch
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any check failure
//! - Token failures are reported generically
//! - Shared state lives in owned objects, never in globals

pub mod error;
pub mod gate;
pub mod throttle;
pub mod tokens;

pub use error::GateError;
pub use gate::RequestGate;
pub use throttle::Throttle;
pub use tokens::{Token, TokenIssuer};
