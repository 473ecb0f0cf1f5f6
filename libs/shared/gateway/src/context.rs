use shared_config::AppConfig;

use crate::{BackendClient, GatewayError};

/// Process-wide handles shared by every cell router.
#[derive(Debug, Clone)]
pub struct GatewayContext {
    pub config: AppConfig,
    pub backend: BackendClient,
}

impl GatewayContext {
    pub fn new(config: AppConfig) -> Result<Self, GatewayError> {
        let backend = BackendClient::new(&config)?;
        Ok(Self { config, backend })
    }
}
