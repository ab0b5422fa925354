//! In-process suppression registry, used when no endpoint is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::RegistryError;
use crate::pipeline::types::{SuppressionReason, SuppressionRegistrar};

#[derive(Default)]
pub struct InMemoryRegistrar {
    entries: RwLock<HashMap<String, SuppressionReason>>,
}

impl InMemoryRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reason_for(&self, address: &str) -> Option<SuppressionReason> {
        self.entries.read().await.get(address).copied()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SuppressionRegistrar for InMemoryRegistrar {
    fn name(&self) -> &str {
        "memory"
    }

    async fn register(
        &self,
        address: &str,
        reason: SuppressionReason,
    ) -> Result<(), RegistryError> {
        // First registration wins; re-registering is a no-op.
        self.entries
            .write()
            .await
            .entry(address.to_string())
            .or_insert(reason);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_is_idempotent() {
        let registrar = InMemoryRegistrar::new();
        assert!(registrar.is_empty().await);

        registrar
            .register("a@x.com", SuppressionReason::Bounce)
            .await
            .unwrap();
        registrar
            .register("a@x.com", SuppressionReason::Complaint)
            .await
            .unwrap();

        assert_eq!(registrar.len().await, 1);
        assert_eq!(
            registrar.reason_for("a@x.com").await,
            Some(SuppressionReason::Bounce)
        );
        assert_eq!(registrar.reason_for("b@x.com").await, None);
    }
}
