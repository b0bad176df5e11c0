//! Core shared types and identifiers

pub mod product;
pub mod taxonomy;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use product::{DraftProduct, ProductKey, ProductRecord, ProductStatus, ProductTemplate};
pub use taxonomy::{Attributes, TaxonomyNodeRecord};

use crate::errors::{SharedError, SharedResult};

/// Unique identifier for persisted products
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> SharedResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SharedError::InvalidUuid { input: s.to_string() })
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Component tag attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentId {
    /// The generation orchestrator
    Orchestrator,
    /// Product persistence services
    Store,
    /// Taxonomy and template sources
    Source,
    /// Cache invalidation services
    Invalidator,
    /// The command line front end
    Cli,
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Orchestrator => write!(f, "orchestrator"),
            ComponentId::Store => write!(f, "store"),
            ComponentId::Source => write!(f, "source"),
            ComponentId::Invalidator => write!(f, "invalidator"),
            ComponentId::Cli => write!(f, "cli"),
        }
    }
}
