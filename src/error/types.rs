//! Error types
//!
//! Defines the error taxonomy shared by the path resolver and the
//! filesystem gateway.

use std::fmt;
use std::io;
use std::time::Duration;

/// Gateway errors, carrying the client-relative path they concern.
#[derive(Debug)]
pub enum GatewayError {
    InvalidPath(String),
    PathTraversal(String),
    NotFound(String),
    AlreadyExists(String),
    NotADirectory(String),
    NotAFile(String),
    InvalidEncoding(String),
    PermissionDenied(String),
    Timeout(Duration),
    IoError(io::Error),
}

impl GatewayError {
    /// Classifies an I/O failure against the virtual path it occurred on.
    pub fn from_io(error: io::Error, virtual_path: &str) -> Self {
        let path = virtual_path.to_string();
        match error.kind() {
            io::ErrorKind::NotFound => GatewayError::NotFound(path),
            io::ErrorKind::AlreadyExists => GatewayError::AlreadyExists(path),
            io::ErrorKind::PermissionDenied => GatewayError::PermissionDenied(path),
            io::ErrorKind::NotADirectory => GatewayError::NotADirectory(path),
            io::ErrorKind::IsADirectory => GatewayError::NotAFile(path),
            io::ErrorKind::InvalidData => GatewayError::InvalidEncoding(path),
            _ => GatewayError::IoError(error),
        }
    }

    /// Stable error kind reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidPath(_) | GatewayError::PathTraversal(_) => "InvalidPath",
            GatewayError::NotFound(_) => "NotFound",
            GatewayError::AlreadyExists(_) => "AlreadyExists",
            GatewayError::NotADirectory(_) => "NotADirectory",
            GatewayError::NotAFile(_) => "NotAFile",
            GatewayError::InvalidEncoding(_) => "InvalidEncoding",
            GatewayError::PermissionDenied(_) => "PermissionDenied",
            GatewayError::Timeout(_) => "Timeout",
            GatewayError::IoError(_) => "IOFailure",
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            GatewayError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            GatewayError::NotFound(p) => write!(f, "Not found: {}", p),
            GatewayError::AlreadyExists(p) => write!(f, "Already exists: {}", p),
            GatewayError::NotADirectory(p) => write!(f, "Not a directory: {}", p),
            GatewayError::NotAFile(p) => write!(f, "Not a file: {}", p),
            GatewayError::InvalidEncoding(p) => write!(f, "File is not valid UTF-8 text: {}", p),
            GatewayError::PermissionDenied(p) => write!(f, "Permission denied: {}", p),
            GatewayError::Timeout(d) => write!(f, "Operation timed out after {:?}", d),
            GatewayError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GatewayError {
    fn from(error: io::Error) -> Self {
        GatewayError::IoError(error)
    }
}

/// Errors raised while bringing the server up.
#[derive(Debug)]
pub enum ServerError {
    Config(config::ConfigError),
    InvalidRoot(String, io::Error),
    Bind(String, io::Error),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::InvalidRoot(root, e) => {
                write!(f, "Cannot use {} as server root: {}", root, e)
            }
            ServerError::Bind(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
