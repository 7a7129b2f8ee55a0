//! Concrete persistence gateways for submitted questionnaire responses.

pub mod config;
pub mod file;
#[cfg(feature = "http")]
pub mod rest;

use async_trait::async_trait;
use intake_spec::{FlatRecord, GatewayError, PersistenceGateway};

pub use config::{ConfigError, GatewayConfig, GatewayKind, StoreConfig, default_config_path};
pub use file::FileGateway;
#[cfg(feature = "http")]
pub use rest::{RestGateway, insert_endpoint};

/// Stand-in used when no store is configured. Every insert is `Unavailable`.
#[derive(Debug, Clone)]
pub struct UnconfiguredGateway {
    reason: String,
}

impl UnconfiguredGateway {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PersistenceGateway for UnconfiguredGateway {
    async fn insert(&self, _record: &FlatRecord) -> Result<(), GatewayError> {
        Err(GatewayError::Unavailable(self.reason.clone()))
    }
}
