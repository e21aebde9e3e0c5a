use async_trait::async_trait;
use bytes::Bytes;
use captive_portal_domain::DomainError;

#[derive(Debug, Clone)]
pub struct Asset {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Look up a static file by request path. `Ok(None)` means not found.
    async fn fetch(&self, path: &str) -> Result<Option<Asset>, DomainError>;
}
