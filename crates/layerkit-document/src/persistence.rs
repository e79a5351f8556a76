//! Persistence API contract.
//!
//! The backing store is opaque: it takes document bytes and hands back a
//! location, and returns the bytes for a location it issued.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

use layerkit_core::{Error, Result, TransportError};

/// Remote or local store for serialized documents.
#[async_trait]
pub trait PersistenceApi: Send + Sync {
    /// Stores `bytes`, returning the location they can be loaded from.
    async fn save(&self, bytes: Vec<u8>) -> Result<String>;

    /// Fetches bytes previously stored at `url`.
    async fn load(&self, url: &str) -> Result<Vec<u8>>;
}

const FILE_SCHEME: &str = "file://";

/// Directory-backed store; every save writes a new uniquely named file.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    root: PathBuf,
}

impl FilePersistence {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, url: &str) -> Result<PathBuf> {
        let path = PathBuf::from(url.strip_prefix(FILE_SCHEME).unwrap_or(url));
        let escapes = path.components().any(|c| c == Component::ParentDir);
        if escapes || !path.starts_with(&self.root) {
            return Err(TransportError::Rejected {
                status: 403,
                message: format!("{} is outside {}", url, self.root.display()),
            }
            .into());
        }
        Ok(path)
    }
}

#[async_trait]
impl PersistenceApi for FilePersistence {
    async fn save(&self, bytes: Vec<u8>) -> Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(format!("{}.json", Uuid::new_v4().simple()));
        tokio::fs::write(&path, &bytes).await?;
        tracing::debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(format!("{}{}", FILE_SCHEME, path.display()))
    }

    async fn load(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.resolve(url)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::Transport(TransportError::NotFound {
                    location: url.to_string(),
                }))
            }
            Err(e) => Err(e.into()),
        }
    }
}
