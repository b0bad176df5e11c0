//! Shared types for the catalog product generation system
//!
//! Contains the data records exchanged between the generation engine and its
//! collaborators (taxonomy snapshots, templates, drafts, requests and results),
//! plus the logging utilities every component uses.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{
    // Caller ↔ generator
    DraftSummary, GenerationRequest, GenerationResult, SkipReason, SkippedSlug,

    // Generator → cache layer
    InvalidationNotice, ScopeKey,
};
