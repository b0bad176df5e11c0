//! Core business logic modules
//!
//! Taxonomy snapshots, leaf selection and draft generation are pure and
//! deterministic. Request state and series locks hold no I/O either.

pub mod locks;
pub mod product;
pub mod selector;
pub mod state;
pub mod taxonomy;

pub use locks::SeriesLocks;
pub use product::{slugify, ProductGenerator};
pub use selector::{GenerationPlan, LeafSelector, PlannedLeaf};
pub use state::{RequestPhase, RequestState};
pub use taxonomy::{Leaves, NodeKind, TaxonomyNode, TaxonomyTree};
