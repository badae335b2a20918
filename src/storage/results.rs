//! Storage result types
//!
//! Defines result structures returned by storage operations.

use serde::{Deserialize, Serialize};

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "isDirectory")]
    pub is_directory: bool,
}

/// Successful completion of a mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    FileCreated,
    FileUpdated,
    FileDeleted,
    DirectoryCreated,
}

impl Confirmation {
    pub fn message(&self) -> &'static str {
        match self {
            Confirmation::FileCreated => "File created successfully",
            Confirmation::FileUpdated => "File updated successfully",
            Confirmation::FileDeleted => "File deleted successfully",
            Confirmation::DirectoryCreated => "Directory created successfully",
        }
    }
}
