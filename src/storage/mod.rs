//! File system storage management
//!
//! Handles path confinement and the filesystem gateway operations.

pub mod operations;
pub mod results;
pub mod validation;

pub use operations::FileGateway;
pub use results::{Confirmation, DirectoryEntry};
pub use validation::{Root, confine, join, resolve};
