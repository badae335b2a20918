//! Server middleware
//!
//! Provides logging middleware.

pub mod logging;
