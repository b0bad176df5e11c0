//! Taxonomy-driven bulk product generation
//!
//! Turns selected leaves of a series taxonomy into draft catalog products.
//! Requests either preview the drafts (dry run) or persist them atomically,
//! skipping leaves that already have a product, and then signal the cache
//! layer which scopes changed.

pub mod config;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::GeneratorConfig;
pub use core::{LeafSelector, ProductGenerator, TaxonomyTree};
pub use error::{GeneratorError, GeneratorResult, InvalidationError, StoreError, StoreResult};
pub use orchestrator::{GenerationOrchestrator, PreparedGeneration};
pub use traits::{CacheInvalidator, ProductStore, TaxonomySource, TemplateSource};
pub use traits::{MockCacheInvalidator, MockProductStore, MockTaxonomySource, MockTemplateSource};
