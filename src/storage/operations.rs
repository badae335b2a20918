//! Storage operations
//!
//! The filesystem gateway: every operation resolves its path beneath the
//! root, re-checks containment after following symlinks, performs a single
//! filesystem action, and maps the outcome onto [`GatewayError`].
//!
//! Operations hold no locks and share no state beyond the filesystem.
//! Each one is bounded by the configured timeout.

use log::{error, info, warn};
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::GatewayError;
use crate::storage::results::{Confirmation, DirectoryEntry};
use crate::storage::validation::{Root, confine, resolve};

const TEMP_PREFIX: &str = ".rax-";
const TEMP_SUFFIX: &str = ".tmp";

/// Stateless gateway over a single confined root.
#[derive(Debug, Clone)]
pub struct FileGateway {
    root: Root,
    timeout: Duration,
}

impl FileGateway {
    pub fn new(root: Root, timeout: Duration) -> Self {
        Self { root, timeout }
    }

    /// Resolves and confines `relative`, following symlinks.
    async fn locate(&self, relative: &str) -> Result<PathBuf, GatewayError> {
        let candidate = resolve(self.root.path(), relative)?;
        confine(self.root.path(), &candidate, relative).await
    }

    /// Like [`locate`](Self::locate), but refuses the root itself.
    async fn locate_target(&self, relative: &str) -> Result<PathBuf, GatewayError> {
        let real_path = self.locate(relative).await?;
        if real_path == self.root.path() {
            return Err(GatewayError::InvalidPath(format!(
                "'{relative}' names the server root"
            )));
        }
        Ok(real_path)
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result,
            Err(_) => {
                error!("Filesystem operation exceeded {:?}", self.timeout);
                Err(GatewayError::Timeout(self.timeout))
            }
        }
    }

    /// Lists the immediate children of a directory in filesystem order.
    pub async fn list(&self, relative: &str) -> Result<Vec<DirectoryEntry>, GatewayError> {
        self.bounded(async {
            let real_path = self.locate(relative).await?;
            let mut dir = fs::read_dir(&real_path)
                .await
                .map_err(|e| GatewayError::from_io(e, relative))?;

            let mut entries = Vec::new();
            while let Some(entry) = dir
                .next_entry()
                .await
                .map_err(|e| GatewayError::from_io(e, relative))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| GatewayError::from_io(e, relative))?;

                // Symlinks count as directories only when they lead to one inside the root.
                let is_directory = if file_type.is_symlink() {
                    match fs::canonicalize(entry.path()).await {
                        Ok(target) if target.starts_with(self.root.path()) => fs::metadata(&target)
                            .await
                            .map(|metadata| metadata.is_dir())
                            .unwrap_or(false),
                        _ => false,
                    }
                } else {
                    file_type.is_dir()
                };

                entries.push(DirectoryEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_directory,
                });
            }

            info!(
                "Listed directory '{}' (real: {}) - {} entries",
                relative,
                real_path.display(),
                entries.len()
            );
            Ok(entries)
        })
        .await
    }

    /// Reads a whole file as UTF-8 text.
    pub async fn read(&self, relative: &str) -> Result<String, GatewayError> {
        self.bounded(async {
            let real_path = self.locate(relative).await?;
            let metadata = fs::metadata(&real_path)
                .await
                .map_err(|e| GatewayError::from_io(e, relative))?;
            if !metadata.is_file() {
                return Err(GatewayError::NotAFile(relative.to_string()));
            }

            let content = fs::read_to_string(&real_path)
                .await
                .map_err(|e| GatewayError::from_io(e, relative))?;

            info!(
                "Read file '{}' (real: {}) - {} bytes",
                relative,
                real_path.display(),
                content.len()
            );
            Ok(content)
        })
        .await
    }

    /// Creates a new file. Fails with `AlreadyExists` if anything is
    /// already at the target; the check and the creation are one atomic call.
    pub async fn create(&self, relative: &str, content: &str) -> Result<Confirmation, GatewayError> {
        self.bounded(async {
            let real_path = self.locate_target(relative).await?;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&real_path)
                .await
                .map_err(|e| GatewayError::from_io(e, relative))?;

            let written = async {
                file.write_all(content.as_bytes()).await?;
                file.flush().await
            }
            .await;

            if let Err(e) = written {
                error!(
                    "Failed to write new file '{}' (real: {}): {}",
                    relative,
                    real_path.display(),
                    e
                );
                drop(file);
                if let Err(cleanup) = fs::remove_file(&real_path).await {
                    warn!(
                        "Failed to remove partial file '{}' (real: {}): {}",
                        relative,
                        real_path.display(),
                        cleanup
                    );
                }
                return Err(GatewayError::from_io(e, relative));
            }

            info!(
                "Created file '{}' (real: {}) - {} bytes",
                relative,
                real_path.display(),
                content.len()
            );
            Ok(Confirmation::FileCreated)
        })
        .await
    }

    /// Replaces the full content of an existing file.
    ///
    /// The target itself must be writable; a read-only file is refused even
    /// when its directory is writable. The new content is written to a
    /// temporary file next to the target and renamed over it, so readers see
    /// either the old or the new content. When the directory does not accept
    /// new entries the file is overwritten in place instead.
    pub async fn update(&self, relative: &str, content: &str) -> Result<Confirmation, GatewayError> {
        self.bounded(async {
            let real_path = self.locate_target(relative).await?;
            let metadata = fs::metadata(&real_path)
                .await
                .map_err(|e| GatewayError::from_io(e, relative))?;
            if !metadata.is_file() {
                return Err(GatewayError::NotAFile(relative.to_string()));
            }
            if metadata.permissions().readonly() {
                return Err(GatewayError::PermissionDenied(relative.to_string()));
            }
            fs::OpenOptions::new()
                .write(true)
                .open(&real_path)
                .await
                .map_err(|e| GatewayError::from_io(e, relative))?;

            let parent = real_path
                .parent()
                .ok_or_else(|| GatewayError::InvalidPath(relative.to_string()))?
                .to_path_buf();
            let target = real_path.clone();
            let content = content.to_owned();
            let permissions = metadata.permissions();

            let in_place = tokio::task::spawn_blocking(move || -> io::Result<bool> {
                let mut temp = match tempfile::Builder::new()
                    .prefix(TEMP_PREFIX)
                    .suffix(TEMP_SUFFIX)
                    .tempfile_in(&parent)
                {
                    Ok(temp) => temp,
                    Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                        let mut file = std::fs::OpenOptions::new()
                            .write(true)
                            .truncate(true)
                            .open(&target)?;
                        file.write_all(content.as_bytes())?;
                        file.sync_all()?;
                        return Ok(true);
                    }
                    Err(e) => return Err(e),
                };
                temp.write_all(content.as_bytes())?;
                temp.as_file().set_permissions(permissions)?;
                temp.as_file().sync_all()?;
                temp.persist(&target).map_err(|e| e.error)?;
                Ok(false)
            })
            .await
            .map_err(|e| GatewayError::IoError(io::Error::other(e)))?
            .map_err(|e| {
                error!(
                    "Failed to update file '{}' (real: {}): {}",
                    relative,
                    real_path.display(),
                    e
                );
                GatewayError::from_io(e, relative)
            })?;

            if in_place {
                warn!(
                    "Directory of '{}' is not writable, updated in place (real: {})",
                    relative,
                    real_path.display()
                );
            }
            info!("Updated file '{}' (real: {})", relative, real_path.display());
            Ok(Confirmation::FileUpdated)
        })
        .await
    }

    /// Deletes a single file. Directories are refused, never removed.
    pub async fn delete(&self, relative: &str) -> Result<Confirmation, GatewayError> {
        self.bounded(async {
            let real_path = self.locate_target(relative).await?;
            let metadata = fs::metadata(&real_path)
                .await
                .map_err(|e| GatewayError::from_io(e, relative))?;
            if metadata.is_dir() {
                return Err(GatewayError::NotAFile(relative.to_string()));
            }

            if let Err(e) = fs::remove_file(&real_path).await {
                error!(
                    "Failed to delete file '{}' (real: {}): {}",
                    relative,
                    real_path.display(),
                    e
                );
                return Err(GatewayError::from_io(e, relative));
            }

            info!("Deleted file '{}' (real: {})", relative, real_path.display());
            Ok(Confirmation::FileDeleted)
        })
        .await
    }

    /// Creates one directory. The parent must already exist.
    pub async fn make_directory(&self, relative: &str) -> Result<Confirmation, GatewayError> {
        self.bounded(async {
            let real_path = self.locate_target(relative).await?;
            fs::create_dir(&real_path)
                .await
                .map_err(|e| GatewayError::from_io(e, relative))?;

            info!(
                "Created directory '{}' (real: {})",
                relative,
                real_path.display()
            );
            Ok(Confirmation::DirectoryCreated)
        })
        .await
    }
}
