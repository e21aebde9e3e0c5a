use captive_portal_domain::DomainError;
use std::sync::Arc;
use tracing::instrument;

use crate::services::InterfaceManager;

pub struct ScanNetworksUseCase {
    interfaces: Arc<InterfaceManager>,
}

impl ScanNetworksUseCase {
    pub fn new(interfaces: Arc<InterfaceManager>) -> Self {
        Self { interfaces }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<Vec<String>, DomainError> {
        self.interfaces.scan().await
    }
}
