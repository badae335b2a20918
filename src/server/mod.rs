//! Server core functionality
//!
//! This module contains the HTTP server, its listener lifecycle, and the
//! routes that expose the filesystem gateway.

pub mod core;
pub mod routes;

pub use self::core::Server;
pub use routes::build_router;
