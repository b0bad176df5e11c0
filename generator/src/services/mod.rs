//! Service implementations
//!
//! Concrete collaborators for the orchestrator: file-backed taxonomy and
//! template sources, product stores and cache invalidators.

pub mod catalog_file;
pub mod file_store;
pub mod invalidator;
pub mod memory_store;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use catalog_file::{CatalogFile, FileTaxonomySource, FileTemplateSource};
pub use file_store::JsonFileProductStore;
pub use invalidator::{ConfiguredInvalidator, HttpCacheInvalidator, LoggingCacheInvalidator};
pub use memory_store::InMemoryProductStore;
