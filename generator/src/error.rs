//! Generator-specific error types

use shared::{ProductId, ProductKey, SharedError};
use thiserror::Error;

use crate::core::state::RequestPhase;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Series not found: {series}")]
    SeriesNotFound { series: String },

    #[error("Template not found: {template_id}")]
    TemplateNotFound { template_id: String },

    #[error("Malformed taxonomy: {reason}")]
    MalformedTaxonomy { reason: String },

    #[error("Taxonomy node not found: {slug}")]
    NodeNotFound { slug: String },

    #[error("Taxonomy source failed: {message}")]
    SourceError { message: String },

    #[error("Persistence failed for series {series}: {message} ({rolled_back} rolled back)")]
    PersistenceFailure {
        series: String,
        message: String,
        rolled_back: usize,
    },

    #[error("Persistence failed for series {series}: {message}; products left behind: {}", format_ids(.orphaned))]
    PartialCommit {
        series: String,
        message: String,
        orphaned: Vec<ProductId>,
    },

    #[error("Conflicts on series {series} persisted after {attempts} attempts")]
    ConflictRetriesExhausted { series: String, attempts: u32 },

    #[error("Illegal request transition: {from:?} -> {to:?}")]
    InvalidTransition { from: RequestPhase, to: RequestPhase },

    #[error("Background task failed: {message}")]
    TaskError { message: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GeneratorError {
    pub fn config(field: impl Into<String>) -> Self {
        GeneratorError::ConfigurationError { field: field.into() }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        GeneratorError::MalformedTaxonomy { reason: reason.into() }
    }

    /// Whether the failure leaves products that need operator follow-up
    pub fn needs_operator(&self) -> bool {
        matches!(self, GeneratorError::PartialCommit { .. })
    }
}

/// Errors raised by product stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// Uniqueness constraint on (series, leaf slug) violated; nothing was written
    #[error("Products already exist for: {}", format_keys(.keys))]
    Conflict { keys: Vec<ProductKey> },

    #[error("Product not found: {id}")]
    NotFound { id: ProductId },

    #[error("Store backend error: {message}")]
    Backend { message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend { message: message.into() }
    }
}

/// Errors raised by cache invalidators
#[derive(Error, Debug)]
pub enum InvalidationError {
    #[error("Invalidation endpoint returned HTTP {status}")]
    Rejected { status: u16 },

    #[error("Invalidation transport failed: {message}")]
    Transport { message: String },
}

fn format_ids(ids: &[ProductId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn format_keys(keys: &[ProductKey]) -> String {
    keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
pub type StoreResult<T> = Result<T, StoreError>;
