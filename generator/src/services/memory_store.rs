//! In-memory product store
//!
//! Keyed by `(series, leaf slug)`, which doubles as the uniqueness
//! constraint. Batches are checked and applied under one write lock.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared::{component_debug, ComponentId, DraftProduct, ProductId, ProductKey, ProductRecord};

use crate::error::{StoreError, StoreResult};
use crate::traits::ProductStore;

#[derive(Default)]
pub struct InMemoryProductStore {
    products: RwLock<BTreeMap<ProductKey, ProductRecord>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    pub async fn get(&self, key: &ProductKey) -> Option<ProductRecord> {
        self.products.read().await.get(key).cloned()
    }

    pub async fn products_for_series(&self, series: &str) -> Vec<ProductRecord> {
        self.products
            .read()
            .await
            .values()
            .filter(|record| record.draft.series == series)
            .cloned()
            .collect()
    }
}

/// Keys in `drafts` that exist already or repeat within the batch
fn conflicting_keys(existing: &BTreeMap<ProductKey, ProductRecord>, drafts: &[DraftProduct]) -> Vec<ProductKey> {
    let mut seen = HashSet::new();
    drafts
        .iter()
        .map(DraftProduct::key)
        .filter(|key| existing.contains_key(key) || !seen.insert(key.clone()))
        .collect()
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn exists(&self, key: &ProductKey) -> StoreResult<bool> {
        Ok(self.products.read().await.contains_key(key))
    }

    fn atomic_batches(&self) -> bool {
        true
    }

    async fn insert_batch(&self, drafts: Vec<DraftProduct>) -> StoreResult<Vec<ProductId>> {
        let mut products = self.products.write().await;

        let conflicts = conflicting_keys(&products, &drafts);
        if !conflicts.is_empty() {
            return Err(StoreError::Conflict { keys: conflicts });
        }

        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let record = ProductRecord::from_draft(draft);
            ids.push(record.id);
            products.insert(record.key(), record);
        }

        component_debug!(ComponentId::Store, "💾 Stored {} products in memory", ids.len());
        Ok(ids)
    }

    async fn insert_one(&self, draft: DraftProduct) -> StoreResult<ProductId> {
        let mut ids = self.insert_batch(vec![draft]).await?;
        ids.pop().ok_or_else(|| StoreError::backend("insert produced no id"))
    }

    async fn delete(&self, id: ProductId) -> StoreResult<()> {
        let mut products = self.products.write().await;
        let key = products
            .iter()
            .find(|(_, record)| record.id == id)
            .map(|(key, _)| key.clone())
            .ok_or(StoreError::NotFound { id })?;
        products.remove(&key);
        Ok(())
    }
}
