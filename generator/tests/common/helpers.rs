//! Test helpers and builder patterns for generator tests
//!
//! The builder wires mock sources and a mock invalidator around a real
//! in-memory store by default; any store can be swapped in.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use generator::services::InMemoryProductStore;
use generator::*;
use shared::{DraftProduct, GenerationRequest, GenerationResult, ProductId, ProductKey, SkipReason};

use super::fixtures::TestFixtures;

/// Builder pattern for creating test orchestrators with sensible defaults
pub struct OrchestratorBuilder<S = InMemoryProductStore> {
    config: GeneratorConfig,
    taxonomy: MockTaxonomySource,
    templates: MockTemplateSource,
    store: S,
    invalidator: MockCacheInvalidator,
}

impl OrchestratorBuilder<InMemoryProductStore> {
    /// Create a new builder with the fixture series, templates and a permissive invalidator
    pub fn new() -> Self {
        let mut taxonomy = MockTaxonomySource::new();
        let mut templates = MockTemplateSource::new();
        let mut invalidator = MockCacheInvalidator::new();

        // Set up default successful behaviors to prevent panics
        taxonomy
            .expect_fetch_series()
            .returning(|series| match series {
                TestFixtures::SERIES => Ok(Some(TestFixtures::oven_series())),
                TestFixtures::WIDE_SERIES => Ok(Some(TestFixtures::wide_series(40))),
                _ => Ok(None),
            })
            .times(0..);

        templates
            .expect_fetch_template()
            .returning(|id| Ok((id == TestFixtures::TEMPLATE_ID).then(TestFixtures::template)))
            .times(0..);

        invalidator.expect_invalidate().returning(|_| Ok(())).times(0..);

        Self {
            config: GeneratorConfig::default().with_invalidation_backoff(Duration::ZERO),
            taxonomy,
            templates,
            store: InMemoryProductStore::new(),
            invalidator,
        }
    }
}

impl Default for OrchestratorBuilder<InMemoryProductStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> OrchestratorBuilder<S>
where
    S: ProductStore + 'static,
{
    /// Replace the product store
    pub fn with_store<N>(self, store: N) -> OrchestratorBuilder<N>
    where
        N: ProductStore + 'static,
    {
        OrchestratorBuilder {
            config: self.config,
            taxonomy: self.taxonomy,
            templates: self.templates,
            store,
            invalidator: self.invalidator,
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the taxonomy mock with one configured by `setup`
    pub fn with_taxonomy<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockTaxonomySource),
    {
        let mut taxonomy = MockTaxonomySource::new();
        setup(&mut taxonomy);
        self.taxonomy = taxonomy;
        self
    }

    /// Replace the template mock with one configured by `setup`
    pub fn with_templates<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockTemplateSource),
    {
        let mut templates = MockTemplateSource::new();
        setup(&mut templates);
        self.templates = templates;
        self
    }

    /// Replace the invalidator mock with one configured by `setup`
    pub fn with_invalidator<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockCacheInvalidator),
    {
        let mut invalidator = MockCacheInvalidator::new();
        setup(&mut invalidator);
        self.invalidator = invalidator;
        self
    }

    /// Build the orchestrator with all configured mocks
    pub fn build(self) -> GenerationOrchestrator<MockTaxonomySource, MockTemplateSource, S, MockCacheInvalidator> {
        self.try_build().expect("test config should be valid")
    }

    /// Build the orchestrator, surfacing config validation errors
    pub fn try_build(
        self,
    ) -> GeneratorResult<GenerationOrchestrator<MockTaxonomySource, MockTemplateSource, S, MockCacheInvalidator>> {
        GenerationOrchestrator::new(self.taxonomy, self.templates, self.store, self.invalidator).with_config(self.config)
    }
}

/// Type alias for test orchestrator over the in-memory store
pub type TestOrchestrator =
    GenerationOrchestrator<MockTaxonomySource, MockTemplateSource, InMemoryProductStore, MockCacheInvalidator>;

/// Ids handed out by a scripted store, in insertion order
pub type CreatedIds = Arc<Mutex<Vec<ProductId>>>;

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Create a simple orchestrator with minimal setup for basic tests
    pub fn simple_orchestrator() -> TestOrchestrator {
        OrchestratorBuilder::new().build()
    }

    /// Commit request against the fixture series
    pub fn request(slugs: &[&str]) -> GenerationRequest {
        GenerationRequest::new(TestFixtures::SERIES, TestFixtures::slugs(slugs))
    }

    pub fn dry_run_request(slugs: &[&str]) -> GenerationRequest {
        Self::request(slugs).dry_run(true)
    }

    /// Skipped entries as `(slug, reason)` pairs for compact assertions
    pub fn skipped_pairs(result: &GenerationResult) -> Vec<(String, SkipReason)> {
        result.skipped.iter().map(|s| (s.slug.clone(), s.reason)).collect()
    }

    pub fn pairs(expected: &[(&str, SkipReason)]) -> Vec<(String, SkipReason)> {
        expected.iter().map(|(slug, reason)| (slug.to_string(), *reason)).collect()
    }

    /// Non-atomic store whose `fail_on`-th insert (1-based) fails
    ///
    /// Deletes succeed unless the id was the `failing_delete`-th created
    /// (1-based). Nothing exists beforehand.
    pub fn scripted_store(fail_on: usize, failing_delete: Option<usize>) -> (MockProductStore, CreatedIds) {
        let created: CreatedIds = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = MockProductStore::new();

        store.expect_exists().returning(|_| Ok(false));
        store.expect_atomic_batches().return_const(false);

        let inserted = Arc::clone(&created);
        store.expect_insert_one().returning(move |_| {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == fail_on {
                return Err(StoreError::backend("disk full"));
            }
            let id = ProductId::new();
            inserted.lock().unwrap().push(id);
            Ok(id)
        });

        let deletable = Arc::clone(&created);
        store.expect_delete().returning(move |id| {
            let position = deletable.lock().unwrap().iter().position(|created| *created == id);
            match (position, failing_delete) {
                (Some(index), Some(failing)) if index + 1 == failing => Err(StoreError::backend("store offline")),
                (Some(_), _) => Ok(()),
                (None, _) => Err(StoreError::NotFound { id }),
            }
        });

        (store, created)
    }
}

/// In-memory store whose batch writes take `delay` to complete
pub struct SlowStore {
    inner: Arc<InMemoryProductStore>,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self { inner: Arc::new(InMemoryProductStore::new()), delay }
    }

    /// Handle on the wrapped store that outlives the orchestrator
    pub fn inner(&self) -> Arc<InMemoryProductStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait::async_trait]
impl ProductStore for SlowStore {
    async fn exists(&self, key: &ProductKey) -> StoreResult<bool> {
        self.inner.exists(key).await
    }

    fn atomic_batches(&self) -> bool {
        self.inner.atomic_batches()
    }

    async fn insert_batch(&self, drafts: Vec<DraftProduct>) -> StoreResult<Vec<ProductId>> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_batch(drafts).await
    }

    async fn insert_one(&self, draft: DraftProduct) -> StoreResult<ProductId> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_one(draft).await
    }

    async fn delete(&self, id: ProductId) -> StoreResult<()> {
        self.inner.delete(id).await
    }
}
