use async_trait::async_trait;
use bytes::Bytes;
use captive_portal_application::ports::{Asset, AssetStore};
use captive_portal_domain::DomainError;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use super::content_type::content_type_for;

/// Serves static files from a directory on disk.
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path to a file under the root. Paths that try to climb
    /// out of it are refused.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = request_path.trim_start_matches('/');
        let relative = if relative.is_empty() {
            "index.html"
        } else {
            relative
        };

        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn fetch(&self, path: &str) -> Result<Option<Asset>, DomainError> {
        let Some(file) = self.resolve(path) else {
            warn!(path = %path, "Rejected asset path outside web root");
            return Ok(None);
        };

        match fs::read(&file).await {
            Ok(contents) => {
                debug!(path = %path, bytes = contents.len(), "Serving asset");
                Ok(Some(Asset {
                    bytes: Bytes::from(contents),
                    content_type: content_type_for(&file.to_string_lossy()),
                }))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                let is_dir = fs::metadata(&file)
                    .await
                    .map(|meta| meta.is_dir())
                    .unwrap_or(false);
                if is_dir {
                    return Ok(None);
                }
                Err(DomainError::AssetUnavailable(format!(
                    "{}: {}",
                    file.display(),
                    e
                )))
            }
        }
    }
}
