use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use crate::record::FlatRecord;

/// Failure reported by a persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The store is not configured or could not be reached.
    #[error("persistence unavailable: {0}")]
    Unavailable(String),
    /// The store answered but refused the record.
    #[error("persistence rejected the record: {0}")]
    Rejected(String),
}

/// Durable sink for submitted answer sets.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn insert(&self, record: &FlatRecord) -> Result<(), GatewayError>;
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Arc<G> {
    async fn insert(&self, record: &FlatRecord) -> Result<(), GatewayError> {
        (**self).insert(record).await
    }
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Box<G> {
    async fn insert(&self, record: &FlatRecord) -> Result<(), GatewayError> {
        (**self).insert(record).await
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<FlatRecord>,
    attempts: usize,
    fail_next: Vec<GatewayError>,
}

/// In-process gateway that keeps every accepted record.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an error returned by the next insert instead of storing the record.
    pub fn fail_next(&self, error: GatewayError) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_next.push(error);
        }
    }

    pub fn records(&self) -> Vec<FlatRecord> {
        self.state
            .lock()
            .map(|state| state.records.clone())
            .unwrap_or_default()
    }

    /// Number of insert calls, successful or not.
    pub fn attempts(&self) -> usize {
        self.state.lock().map(|state| state.attempts).unwrap_or(0)
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn insert(&self, record: &FlatRecord) -> Result<(), GatewayError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| GatewayError::Unavailable("memory gateway poisoned".to_string()))?;
        state.attempts += 1;
        if !state.fail_next.is_empty() {
            return Err(state.fail_next.remove(0));
        }
        state.records.push(record.clone());
        Ok(())
    }
}
