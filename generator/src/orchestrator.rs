//! Generation orchestrator
//!
//! Coordinates snapshot retrieval, leaf validation, draft generation,
//! persistence and cache invalidation using injected collaborators. Dry runs
//! and commits share one pipeline (`prepare`) and branch only on whether the
//! drafts are written.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;

use shared::{
    component_debug, component_error, component_info, component_warn, logging, ComponentId, DraftProduct,
    DraftSummary, GenerationRequest, GenerationResult, ProductId, ProductKey, ProductStatus, ScopeKey, SkipReason,
    SkippedSlug,
};

use crate::{
    config::GeneratorConfig,
    core::{GenerationPlan, LeafSelector, ProductGenerator, RequestPhase, RequestState, SeriesLocks, TaxonomyTree},
    error::{GeneratorError, GeneratorResult, StoreError},
    traits::{CacheInvalidator, ProductStore, TaxonomySource, TemplateSource},
};

/// Drafts and rejections produced by the shared pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedGeneration {
    pub drafts: Vec<DraftProduct>,
    pub rejected: Vec<SkippedSlug>,
}

#[derive(Debug)]
struct CommitOutcome {
    product_ids: Vec<ProductId>,
    conflicts: Vec<SkippedSlug>,
    invalidated: Vec<ScopeKey>,
}

/// Retry settings handed to the detached commit task
#[derive(Debug, Clone, Copy)]
struct InvalidationPolicy {
    attempts: u32,
    backoff: std::time::Duration,
}

enum WriteFailure {
    /// Nothing was written; the listed keys already exist
    Conflict(Vec<ProductKey>),
    Fatal(GeneratorError),
}

/// Entry point for bulk product generation
pub struct GenerationOrchestrator<T, M, S, C>
where
    T: TaxonomySource,
    M: TemplateSource,
    S: ProductStore + 'static,
    C: CacheInvalidator + 'static,
{
    config: GeneratorConfig,

    /// Injected services
    taxonomy: T,
    templates: M,
    store: Arc<S>,
    invalidator: Arc<C>,

    /// Serializes check-then-insert per series
    series_locks: SeriesLocks,
}

impl<T, M, S, C> GenerationOrchestrator<T, M, S, C>
where
    T: TaxonomySource,
    M: TemplateSource,
    S: ProductStore + 'static,
    C: CacheInvalidator + 'static,
{
    /// Create orchestrator with injected dependencies and default tunables
    pub fn new(taxonomy: T, templates: M, store: S, invalidator: C) -> Self {
        Self {
            config: GeneratorConfig::default(),
            taxonomy,
            templates,
            store: Arc::new(store),
            invalidator: Arc::new(invalidator),
            series_locks: SeriesLocks::new(),
        }
    }

    /// Replace the tunables; rejected unless `config.validate()` passes
    pub fn with_config(mut self, config: GeneratorConfig) -> GeneratorResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        self.store.as_ref()
    }

    /// Run one generation request end to end
    pub async fn execute(&self, request: GenerationRequest) -> GeneratorResult<GenerationResult> {
        let mut state = RequestState::new(request.series.clone());
        component_info!(
            ComponentId::Orchestrator,
            "📨 Generation request {} for series '{}': {} slugs, dry_run={}, status={}",
            state.request_id,
            request.series,
            request.leaf_slugs.len(),
            request.dry_run,
            request.status
        );

        let prepared = match self.prepare(&request).await {
            Ok(prepared) => prepared,
            Err(err) => return Err(reject(&mut state, err)),
        };
        state.advance(RequestPhase::Validated)?;

        if request.dry_run {
            state.advance(RequestPhase::DryRunComplete)?;
            let would_create: Vec<DraftSummary> = prepared.drafts.iter().map(DraftSummary::from).collect();
            component_info!(
                ComponentId::Orchestrator,
                "🔍 Dry run for '{}': {} would be created, {} skipped ({} ms)",
                request.series,
                would_create.len(),
                prepared.rejected.len(),
                state.elapsed_ms()
            );
            return Ok(GenerationResult::preview(would_create, prepared.rejected));
        }

        state.advance(RequestPhase::Generating)?;
        let outcome = match self.commit(&request.series, prepared.drafts).await {
            Ok(outcome) => outcome,
            Err(err) => return Err(reject(&mut state, err)),
        };
        state.advance(RequestPhase::Persisted)?;
        state.advance(RequestPhase::Invalidated)?;

        let mut skipped = prepared.rejected;
        skipped.extend(outcome.conflicts);

        logging::log_success(
            ComponentId::Orchestrator,
            &format!(
                "Series '{}': created {}, skipped {} ({} ms)",
                request.series,
                outcome.product_ids.len(),
                skipped.len(),
                state.elapsed_ms()
            ),
        );
        Ok(GenerationResult::committed(outcome.product_ids, skipped, outcome.invalidated))
    }

    /// Fetch, validate and generate without touching the store
    pub async fn prepare(&self, request: &GenerationRequest) -> GeneratorResult<PreparedGeneration> {
        let plan = self.plan(request).await?;
        let drafts = self.generate_drafts(&request.series, request.status, &plan).await?;

        Ok(PreparedGeneration {
            drafts,
            rejected: plan.rejected,
        })
    }

    async fn plan(&self, request: &GenerationRequest) -> GeneratorResult<GenerationPlan> {
        let records = self
            .taxonomy
            .fetch_series(&request.series)
            .await?
            .ok_or_else(|| GeneratorError::SeriesNotFound {
                series: request.series.clone(),
            })?;
        let tree = TaxonomyTree::build(records)?;

        let template = match &request.template_id {
            Some(template_id) => {
                let template = self
                    .templates
                    .fetch_template(template_id)
                    .await?
                    .ok_or_else(|| GeneratorError::TemplateNotFound {
                        template_id: template_id.clone(),
                    })?;
                Some(Arc::new(template))
            }
            None => None,
        };

        let plan = LeafSelector::validate(&tree, &request.leaf_slugs, template);
        component_debug!(
            ComponentId::Orchestrator,
            "📋 Plan for '{}': {} accepted, {} rejected (snapshot of {} nodes)",
            request.series,
            plan.accepted.len(),
            plan.rejected.len(),
            tree.len()
        );
        Ok(plan)
    }

    async fn generate_drafts(
        &self,
        series: &str,
        status: ProductStatus,
        plan: &GenerationPlan,
    ) -> GeneratorResult<Vec<DraftProduct>> {
        let chunk_size = self.config.parallel_threshold;

        if plan.accepted.len() < chunk_size {
            return Ok(plan
                .accepted
                .iter()
                .map(|entry| ProductGenerator::generate_planned(series, entry, status))
                .collect());
        }

        let tasks = plan.accepted.chunks(chunk_size).map(|chunk| {
            let chunk = chunk.to_vec();
            let series = series.to_string();
            tokio::spawn(async move {
                chunk
                    .iter()
                    .map(|entry| ProductGenerator::generate_planned(&series, entry, status))
                    .collect::<Vec<_>>()
            })
        });

        // join_all yields in spawn order, which is plan order
        let mut drafts = Vec::with_capacity(plan.accepted.len());
        for joined in join_all(tasks).await {
            drafts.extend(joined.map_err(|e| GeneratorError::TaskError { message: e.to_string() })?);
        }
        Ok(drafts)
    }

    async fn commit(&self, series: &str, drafts: Vec<DraftProduct>) -> GeneratorResult<CommitOutcome> {
        let guard = self.series_locks.acquire(series).await;

        let order: Vec<ProductKey> = drafts.iter().map(DraftProduct::key).collect();
        let mut existing = HashSet::new();
        let mut pending = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let key = draft.key();
            let found = self
                .store
                .exists(&key)
                .await
                .map_err(|err| persistence_failure(series, &err, 0))?;
            if found {
                existing.insert(key);
            } else {
                pending.push(draft);
            }
        }

        if pending.is_empty() {
            component_info!(
                ComponentId::Orchestrator,
                "♻️ Nothing new for '{}': all {} products already exist",
                series,
                existing.len()
            );
            return Ok(CommitOutcome {
                product_ids: Vec::new(),
                conflicts: ordered_conflicts(&order, &existing),
                invalidated: Vec::new(),
            });
        }

        logging::log_progress(
            ComponentId::Orchestrator,
            "Committing",
            &format!(
                "{} new products for '{}' ({} already exist)",
                pending.len(),
                series,
                existing.len()
            ),
        );

        // Detached so a dropped caller interrupts neither the batch nor the
        // invalidation that follows it
        let store = Arc::clone(&self.store);
        let invalidator = Arc::clone(&self.invalidator);
        let owned_series = series.to_string();
        let retries = self.config.conflict_retries;
        let policy = InvalidationPolicy {
            attempts: self.config.invalidation_attempts,
            backoff: self.config.invalidation_backoff,
        };
        let write = tokio::spawn(async move {
            let written = write_with_retries(store.as_ref(), &owned_series, pending, retries).await;
            drop(guard);
            let (product_ids, raced) = written?;
            component_info!(
                ComponentId::Store,
                "💾 Persisted {} products for '{}'",
                product_ids.len(),
                owned_series
            );

            let invalidated = if product_ids.is_empty() {
                Vec::new()
            } else {
                signal_invalidation(invalidator.as_ref(), &owned_series, policy).await
            };
            Ok::<_, GeneratorError>((product_ids, raced, invalidated))
        });

        let (product_ids, raced, invalidated) = write
            .await
            .map_err(|e| GeneratorError::TaskError { message: e.to_string() })??;
        existing.extend(raced);

        Ok(CommitOutcome {
            product_ids,
            conflicts: ordered_conflicts(&order, &existing),
            invalidated,
        })
    }
}

/// Best-effort; failures are logged and never undo the commit
async fn signal_invalidation<C>(invalidator: &C, series: &str, policy: InvalidationPolicy) -> Vec<ScopeKey>
where
    C: CacheInvalidator + ?Sized,
{
    let keys = ScopeKey::for_series(series);

    for attempt in 1..=policy.attempts {
        match invalidator.invalidate(&keys).await {
            Ok(()) => {
                component_debug!(
                    ComponentId::Invalidator,
                    "🧹 Invalidated {} scopes for '{}'",
                    keys.len(),
                    series
                );
                return keys;
            }
            Err(err) if attempt < policy.attempts => {
                component_warn!(
                    ComponentId::Invalidator,
                    "⚠️ Invalidation attempt {}/{} for '{}' failed: {}",
                    attempt,
                    policy.attempts,
                    series,
                    err
                );
                tokio::time::sleep(policy.backoff).await;
            }
            Err(err) => logging::log_error(ComponentId::Invalidator, "Cache invalidation", &err),
        }
    }

    keys
}

fn reject(state: &mut RequestState, err: GeneratorError) -> GeneratorError {
    if let Err(transition) = state.advance(RequestPhase::Rejected) {
        component_error!(ComponentId::Orchestrator, "{}", transition);
    }
    logging::log_error(ComponentId::Orchestrator, &format!("Request {}", state.request_id), &err);
    err
}

fn ordered_conflicts(order: &[ProductKey], existing: &HashSet<ProductKey>) -> Vec<SkippedSlug> {
    order
        .iter()
        .filter(|key| existing.contains(*key))
        .map(|key| SkippedSlug::new(key.leaf_slug.clone(), SkipReason::AlreadyExists))
        .collect()
}

fn persistence_failure(series: &str, err: &StoreError, rolled_back: usize) -> GeneratorError {
    GeneratorError::PersistenceFailure {
        series: series.to_string(),
        message: err.to_string(),
        rolled_back,
    }
}

/// Write `pending`, folding uniqueness conflicts into the returned key list
async fn write_with_retries<S>(
    store: &S,
    series: &str,
    mut pending: Vec<DraftProduct>,
    attempts: u32,
) -> GeneratorResult<(Vec<ProductId>, Vec<ProductKey>)>
where
    S: ProductStore + ?Sized,
{
    let mut raced = Vec::new();

    for attempt in 1..=attempts {
        match write_batch(store, series, pending.clone()).await {
            Ok(ids) => return Ok((ids, raced)),
            Err(WriteFailure::Conflict(keys)) => {
                component_warn!(
                    ComponentId::Store,
                    "⚠️ Attempt {}/{} for '{}' hit {} existing products",
                    attempt,
                    attempts,
                    series,
                    keys.len()
                );
                let conflicting: HashSet<ProductKey> = keys.into_iter().collect();
                pending.retain(|draft| !conflicting.contains(&draft.key()));
                raced.extend(conflicting);
                if pending.is_empty() {
                    return Ok((Vec::new(), raced));
                }
            }
            Err(WriteFailure::Fatal(err)) => return Err(err),
        }
    }

    Err(GeneratorError::ConflictRetriesExhausted {
        series: series.to_string(),
        attempts,
    })
}

async fn write_batch<S>(store: &S, series: &str, drafts: Vec<DraftProduct>) -> Result<Vec<ProductId>, WriteFailure>
where
    S: ProductStore + ?Sized,
{
    if store.atomic_batches() {
        return store.insert_batch(drafts).await.map_err(|err| match err {
            StoreError::Conflict { keys } => WriteFailure::Conflict(keys),
            other => WriteFailure::Fatal(persistence_failure(series, &other, 0)),
        });
    }

    let mut created = Vec::with_capacity(drafts.len());
    for draft in drafts {
        match store.insert_one(draft).await {
            Ok(id) => created.push(id),
            Err(err) => return Err(compensate(store, series, created, err).await),
        }
    }
    Ok(created)
}

/// Undo a partial non-atomic write
async fn compensate<S>(store: &S, series: &str, created: Vec<ProductId>, cause: StoreError) -> WriteFailure
where
    S: ProductStore + ?Sized,
{
    let mut orphaned = Vec::new();
    for id in &created {
        if let Err(err) = store.delete(*id).await {
            component_error!(ComponentId::Store, "❌ Rollback of product {} failed: {}", id, err);
            orphaned.push(*id);
        }
    }

    if !orphaned.is_empty() {
        return WriteFailure::Fatal(GeneratorError::PartialCommit {
            series: series.to_string(),
            message: cause.to_string(),
            orphaned,
        });
    }

    component_warn!(
        ComponentId::Store,
        "↩️ Rolled back {} products for '{}' after: {}",
        created.len(),
        series,
        cause
    );
    match cause {
        StoreError::Conflict { keys } => WriteFailure::Conflict(keys),
        other => WriteFailure::Fatal(persistence_failure(series, &other, created.len())),
    }
}
