//! Session token persistence.
//!
//! The store holds a single opaque token slot (last write wins). The HTTP
//! transport reads it before each request; login and logout write it.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Session store errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Token file could not be read or written.
    #[error("token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Persists the session token between requests (and runs, for the file store).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current token, if any.
    async fn token(&self) -> Result<Option<String>, SessionError>;

    /// Replace the stored token.
    async fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Forget the stored token. Succeeds when nothing is stored.
    async fn drop_token(&self) -> Result<(), SessionError>;
}

/// In-memory session store. Clones share the slot.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    token: Arc<RwLock<Option<String>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.to_string()))),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn drop_token(&self) -> Result<(), SessionError> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Session store backed by a single token file.
///
/// The file is written with 0600 permissions on Unix. A missing or blank
/// file means "no session".
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store using the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn token(&self) -> Result<Option<String>, SessionError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, token).await?;
        set_file_permissions_0600(&self.path).await?;
        Ok(())
    }

    async fn drop_token(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
/// No-op on non-Unix platforms.
async fn set_file_permissions_0600(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
