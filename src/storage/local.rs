//! Local filesystem session store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::SessionStore;

/// Token file name under the storage root.
const TOKEN_FILE: &str = "token";

/// File-backed session store rooted at a directory.
#[derive(Clone)]
pub struct LocalSessionStore {
    root_dir: PathBuf,
}

impl LocalSessionStore {
    /// Create a new store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SessionStore for LocalSessionStore {
    async fn store_token(&self, token: &str) -> Result<()> {
        self.write_bytes(TOKEN_FILE, token.trim().as_bytes()).await
    }

    async fn load_token(&self) -> Result<Option<String>> {
        match self.read_bytes(TOKEN_FILE).await? {
            Some(bytes) => {
                let token = String::from_utf8(bytes)
                    .map_err(|e| AppError::session(format!("stored token is not UTF-8: {e}")))?;
                let token = token.trim().to_string();
                Ok((!token.is_empty()).then_some(token))
            }
            None => Ok(None),
        }
    }

    async fn clear_token(&self) -> Result<()> {
        match tokio::fs::remove_file(self.path(TOKEN_FILE)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_token_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSessionStore::new(tmp.path());

        store.store_token("abc.def.ghi").await.unwrap();
        let loaded = store.load_token().await.unwrap();
        assert_eq!(loaded, Some("abc.def.ghi".to_string()));
    }

    #[tokio::test]
    async fn test_missing_token_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSessionStore::new(tmp.path());

        assert_eq!(store.load_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_replaces_previous_token() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSessionStore::new(tmp.path());

        store.store_token("first").await.unwrap();
        store.store_token("second").await.unwrap();
        assert_eq!(store.load_token().await.unwrap(), Some("second".into()));
    }

    #[tokio::test]
    async fn test_clear_token_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSessionStore::new(tmp.path());

        store.clear_token().await.unwrap();
        store.store_token("tok").await.unwrap();
        store.clear_token().await.unwrap();
        assert_eq!(store.load_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_whitespace_only_token_loads_as_none() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSessionStore::new(tmp.path());

        store.store_token("  \n").await.unwrap();
        assert_eq!(store.load_token().await.unwrap(), None);
    }
}
