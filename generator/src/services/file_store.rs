//! JSON file product store
//!
//! One JSON array of `ProductRecord` per series under a base directory.
//! Batches are written to a temporary file and renamed into place, so a
//! series file is either fully updated or untouched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use shared::{component_debug, ComponentId, DraftProduct, ProductId, ProductKey, ProductRecord};

use crate::error::{StoreError, StoreResult};
use crate::traits::ProductStore;

pub struct JsonFileProductStore {
    /// Base directory for all series files
    base_dir: PathBuf,

    /// Serializes read-modify-write cycles across all series files
    write_lock: Mutex<()>,
}

impl JsonFileProductStore {
    /// Create store writing to ./output/products
    pub fn new() -> Self {
        Self::with_base_dir(PathBuf::from("./output/products"))
    }

    /// Create with custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the products file path for a series
    fn series_file_path(&self, series: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", series_file_stem(series)))
    }

    pub async fn products_for_series(&self, series: &str) -> StoreResult<Vec<ProductRecord>> {
        read_records(&self.series_file_path(series)).await
    }
}

impl Default for JsonFileProductStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Distinct series always map to distinct file names
///
/// Lowercase ASCII alphanumerics, `-` and `_` are kept; every other byte is
/// written as `%XX`. The empty series is `%`, which no encoding produces.
pub(crate) fn series_file_stem(series: &str) -> String {
    if series.is_empty() {
        return "%".to_string();
    }

    let mut stem = String::with_capacity(series.len());
    for byte in series.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => stem.push(char::from(byte)),
            other => stem.push_str(&format!("%{other:02X}")),
        }
    }
    stem
}

async fn read_records(path: &Path) -> StoreResult<Vec<ProductRecord>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_records(path: &Path, records: &[ProductRecord]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let content = serde_json::to_string_pretty(records)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}

#[async_trait]
impl ProductStore for JsonFileProductStore {
    async fn exists(&self, key: &ProductKey) -> StoreResult<bool> {
        let records = read_records(&self.series_file_path(&key.series)).await?;
        Ok(records.iter().any(|record| record.key() == *key))
    }

    fn atomic_batches(&self) -> bool {
        true
    }

    async fn insert_batch(&self, drafts: Vec<DraftProduct>) -> StoreResult<Vec<ProductId>> {
        let Some(series) = drafts.first().map(|draft| draft.series.clone()) else {
            return Ok(Vec::new());
        };
        if drafts.iter().any(|draft| draft.series != series) {
            return Err(StoreError::backend("a batch must target a single series"));
        }

        let _lock = self.write_lock.lock().await;
        let path = self.series_file_path(&series);
        let mut records = read_records(&path).await?;

        let mut taken: HashSet<ProductKey> = records.iter().map(ProductRecord::key).collect();
        let conflicts: Vec<ProductKey> = drafts
            .iter()
            .map(DraftProduct::key)
            .filter(|key| !taken.insert(key.clone()))
            .collect();
        if !conflicts.is_empty() {
            return Err(StoreError::Conflict { keys: conflicts });
        }

        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let record = ProductRecord::from_draft(draft);
            ids.push(record.id);
            records.push(record);
        }

        write_records(&path, &records).await?;
        component_debug!(
            ComponentId::Store,
            "💾 Wrote {} products for series '{}' to {}",
            ids.len(),
            series,
            path.display()
        );
        Ok(ids)
    }

    async fn insert_one(&self, draft: DraftProduct) -> StoreResult<ProductId> {
        let mut ids = self.insert_batch(vec![draft]).await?;
        ids.pop().ok_or_else(|| StoreError::backend("insert produced no id"))
    }

    async fn delete(&self, id: ProductId) -> StoreResult<()> {
        let _lock = self.write_lock.lock().await;

        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(StoreError::NotFound { id }),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let mut records = read_records(&path).await?;
            let before = records.len();
            records.retain(|record| record.id != id);
            if records.len() != before {
                write_records(&path, &records).await?;
                return Ok(());
            }
        }

        Err(StoreError::NotFound { id })
    }
}
