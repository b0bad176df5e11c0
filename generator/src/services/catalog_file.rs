//! JSON file backed taxonomy and template sources
//!
//! The catalog file maps series slugs to their node records:
//!
//! ```json
//! { "series": { "ovens": [ { "id": "1", "slug": "ovens", "name": "Ovens", "children": [ ... ] } ] } }
//! ```
//!
//! The template file is a JSON array of `ProductTemplate`. Both files are
//! re-read on every fetch so each request sees the current taxonomy.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use shared::{component_debug, ComponentId, ProductTemplate, TaxonomyNodeRecord};

use crate::error::{GeneratorError, GeneratorResult};
use crate::traits::{TaxonomySource, TemplateSource};

/// On-disk layout of a catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub series: BTreeMap<String, Vec<TaxonomyNodeRecord>>,
}

async fn read_json<T>(path: &Path) -> GeneratorResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = fs::read_to_string(path).await.map_err(|e| GeneratorError::SourceError {
        message: format!("cannot read {}: {}", path.display(), e),
    })?;
    serde_json::from_str(&content).map_err(|e| GeneratorError::SourceError {
        message: format!("cannot parse {}: {}", path.display(), e),
    })
}

/// Taxonomy source reading a catalog file
pub struct FileTaxonomySource {
    path: PathBuf,
}

impl FileTaxonomySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TaxonomySource for FileTaxonomySource {
    async fn fetch_series(&self, series: &str) -> GeneratorResult<Option<Vec<TaxonomyNodeRecord>>> {
        let mut catalog: CatalogFile = read_json(&self.path).await?;
        let records = catalog.series.remove(series);

        component_debug!(
            ComponentId::Source,
            "📂 Loaded series '{}' from {}: {}",
            series,
            self.path.display(),
            records.as_ref().map(|r| r.len().to_string()).unwrap_or_else(|| "missing".to_string())
        );
        Ok(records)
    }
}

/// Template source reading a template file; without a file no template exists
pub struct FileTemplateSource {
    path: Option<PathBuf>,
}

impl FileTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    pub fn empty() -> Self {
        Self { path: None }
    }
}

#[async_trait]
impl TemplateSource for FileTemplateSource {
    async fn fetch_template(&self, template_id: &str) -> GeneratorResult<Option<ProductTemplate>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        let templates: Vec<ProductTemplate> = read_json(path).await?;
        Ok(templates.into_iter().find(|template| template.id == template_id))
    }
}
