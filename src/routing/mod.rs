//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path (percent-decoded)
//!     → router.rs (ordered table scan)
//!     → matcher.rs (literal prefix + typed slot)
//!     → extractor (parse slot into typed parameters)
//!     → Return: Route or RouteError
//! ```
//!
//! # Design Decisions
//! - Table built once at startup, immutable at runtime
//! - No regex in the hot path
//! - Deterministic: same input always matches same route
//! - First match wins (insertion order)

pub mod matcher;
pub mod router;

pub use router::{Route, RouteError, RouteTable};
