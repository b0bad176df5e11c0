//! Product-side records: templates, drafts and persisted products

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Attributes, ProductId};
use crate::errors::SharedError;

/// Lifecycle status applied to generated products
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Active => write!(f, "active"),
            ProductStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for ProductStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(ProductStatus::Draft),
            "active" => Ok(ProductStatus::Active),
            "archived" => Ok(ProductStatus::Archived),
            _ => Err(SharedError::InvalidStatus { input: s.to_string() }),
        }
    }
}

/// Default field values applied underneath leaf attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub defaults: Attributes,
}

/// Idempotency key: at most one product exists per (series, leaf slug)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductKey {
    pub series: String,
    pub leaf_slug: String,
}

impl ProductKey {
    pub fn new(series: impl Into<String>, leaf_slug: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            leaf_slug: leaf_slug.into(),
        }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.series, self.leaf_slug)
    }
}

/// A product record computed from a taxonomy leaf, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftProduct {
    pub series: String,
    pub leaf_slug: String,
    pub name: String,
    pub slug: String,
    pub status: ProductStatus,
    pub template_id: Option<String>,
    /// Ancestor slugs, root first, ending with the leaf
    pub category_path: Vec<String>,
    pub fields: Attributes,
    /// Populated by the pricing workflow, never by generation
    pub price: Option<f64>,
}

impl DraftProduct {
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.series.clone(), self.leaf_slug.clone())
    }
}

/// A persisted product as held by a product store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub draft: DraftProduct,
}

impl ProductRecord {
    pub fn from_draft(draft: DraftProduct) -> Self {
        Self {
            id: ProductId::new(),
            created_at: Utc::now(),
            draft,
        }
    }

    pub fn key(&self) -> ProductKey {
        self.draft.key()
    }
}
