//! Path validation
//!
//! Turns client-supplied relative paths into absolute paths confined to the
//! server root. `join` and `resolve` are purely lexical; `confine` touches
//! the filesystem to follow symlinks before the containment re-check.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs;

use crate::error::GatewayError;

const SEPARATOR: char = '/';

/// The canonical directory every operation is confined beneath.
#[derive(Debug, Clone)]
pub struct Root {
    path: PathBuf,
}

impl Root {
    /// Canonicalizes `path` and checks that it is a directory.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = std::fs::canonicalize(path)?;
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Joins path fragments the way the editor client builds them.
///
/// This is the client-side joining contract: clients combine their current
/// directory and an entry name with these rules before putting the result
/// in a URL. Handlers receive an already joined path and pass it straight
/// to [`resolve`], so nothing on the request path calls this.
///
/// Every fragment is whitespace-trimmed. The first keeps a leading
/// separator but loses trailing ones; later fragments lose both. Empty
/// fragments are dropped and the rest are joined with a single `/`.
pub fn join<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let part = part.as_ref().trim();
            if i == 0 {
                part.trim_end_matches(SEPARATOR)
            } else {
                part.trim_matches(SEPARATOR)
            }
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexically resolves `relative` beneath `root`.
///
/// `.` segments and repeated separators are dropped. Any `..` segment,
/// absolute path or drive prefix is rejected rather than clamped, so the
/// result always lies inside `root`. An empty path resolves to `root`.
pub fn resolve(root: &Path, relative: &str) -> Result<PathBuf, GatewayError> {
    if relative.contains('\0') {
        return Err(GatewayError::InvalidPath(relative.replace('\0', "\\0")));
    }

    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(segment) => resolved.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(GatewayError::PathTraversal(relative.to_string()));
            }
        }
    }

    Ok(resolved)
}

/// Re-checks containment after following symlinks.
///
/// The deepest existing ancestor of `candidate` is canonicalized and the
/// missing tail is appended back, so paths that do not exist yet (create,
/// mkdir) are checked as well. `root` must already be canonical.
pub async fn confine(
    root: &Path,
    candidate: &Path,
    virtual_path: &str,
) -> Result<PathBuf, GatewayError> {
    let mut existing = candidate.to_path_buf();
    let mut missing: Vec<OsString> = Vec::new();

    loop {
        match fs::symlink_metadata(&existing).await {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match (existing.file_name(), existing.parent()) {
                    (Some(name), Some(parent)) => {
                        missing.push(name.to_os_string());
                        existing = parent.to_path_buf();
                    }
                    _ => return Err(GatewayError::InvalidPath(virtual_path.to_string())),
                }
            }
            Err(e) => return Err(GatewayError::from_io(e, virtual_path)),
        }
    }

    // Dangling symlinks exist but cannot be canonicalized.
    let mut real = fs::canonicalize(&existing).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => GatewayError::InvalidPath(virtual_path.to_string()),
        _ => GatewayError::from_io(e, virtual_path),
    })?;
    for name in missing.iter().rev() {
        real.push(name);
    }

    if !real.starts_with(root) {
        return Err(GatewayError::PathTraversal(virtual_path.to_string()));
    }

    Ok(real)
}
