//! Message types for the catalog generation system
//!
//! - `generation`: caller ↔ generator request and result
//! - `invalidation`: generator → cache layer scope keys

pub mod generation;
pub mod invalidation;

pub use generation::{DraftSummary, GenerationRequest, GenerationResult, SkipReason, SkippedSlug};
pub use invalidation::{InvalidationNotice, ScopeKey};
