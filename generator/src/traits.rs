//! Trait definitions with mockall annotations for testing
//!
//! The generator reaches the outside world only through these collaborators.
//! Each is injected into the orchestrator, and each has a generated mock.

use shared::{DraftProduct, ProductId, ProductKey, ProductTemplate, ScopeKey, TaxonomyNodeRecord};

use crate::error::{GeneratorResult, InvalidationError, StoreResult};

/// Read-only access to taxonomy management
///
/// Every call must return the current structure; callers never cache it.
#[mockall::automock]
#[async_trait::async_trait]
pub trait TaxonomySource: Send + Sync {
    /// Fetch every node of a series
    ///
    /// # Returns
    /// `None` when the series does not exist, otherwise its records in flat or
    /// nested form
    async fn fetch_series(&self, series: &str) -> GeneratorResult<Option<Vec<TaxonomyNodeRecord>>>;
}

/// Lookup of product templates by identifier
#[mockall::automock]
#[async_trait::async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch_template(&self, template_id: &str) -> GeneratorResult<Option<ProductTemplate>>;
}

/// Catalog persistence
///
/// Stores enforce at most one product per `ProductKey`; an insert that would
/// break that fails with `StoreError::Conflict` and writes nothing.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Whether a product already exists for the key
    async fn exists(&self, key: &ProductKey) -> StoreResult<bool>;

    /// Whether `insert_batch` is all-or-nothing
    ///
    /// When false the orchestrator inserts one at a time and compensates on
    /// failure.
    fn atomic_batches(&self) -> bool;

    /// Insert all drafts or none; ids are returned in draft order
    async fn insert_batch(&self, drafts: Vec<DraftProduct>) -> StoreResult<Vec<ProductId>>;

    /// Insert a single draft
    async fn insert_one(&self, draft: DraftProduct) -> StoreResult<ProductId>;

    /// Remove a product created earlier in the same call
    async fn delete(&self, id: ProductId) -> StoreResult<()>;
}

/// Cache layer notification
#[mockall::automock]
#[async_trait::async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, scope_keys: &[ScopeKey]) -> Result<(), InvalidationError>;
}
