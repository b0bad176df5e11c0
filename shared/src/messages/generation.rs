//! Caller ↔ generator messages
//!
//! One `GenerationRequest` per call, answered by one `GenerationResult`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::invalidation::ScopeKey;
use crate::types::{Attributes, DraftProduct, ProductId, ProductStatus};

/// Bulk generation request for a set of leaves in one series
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub series: String,
    pub leaf_slugs: Vec<String>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl GenerationRequest {
    pub fn new<I, S>(series: impl Into<String>, leaf_slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            series: series.into(),
            leaf_slugs: leaf_slugs.into_iter().map(Into::into).collect(),
            dry_run: false,
            status: ProductStatus::default(),
            template_id: None,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }
}

/// Why a requested slug produced no product
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    NotFound,
    NotLeaf,
    AlreadyExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "not-found"),
            SkipReason::NotLeaf => write!(f, "not-leaf"),
            SkipReason::AlreadyExists => write!(f, "already-exists"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SkippedSlug {
    pub slug: String,
    pub reason: SkipReason,
}

impl SkippedSlug {
    pub fn new(slug: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            slug: slug.into(),
            reason,
        }
    }
}

/// Preview of a product a dry run would create
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DraftSummary {
    /// Leaf slug the product originates from
    pub slug: String,
    pub name: String,
    pub product_slug: String,
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub fields: Attributes,
}

impl From<&DraftProduct> for DraftSummary {
    fn from(draft: &DraftProduct) -> Self {
        Self {
            slug: draft.leaf_slug.clone(),
            name: draft.name.clone(),
            product_slug: draft.slug.clone(),
            status: draft.status,
            template_id: draft.template_id.clone(),
            fields: draft.fields.clone(),
        }
    }
}

/// Outcome of one generation call
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GenerationResult {
    pub dry_run: bool,
    pub created: usize,
    pub skipped: Vec<SkippedSlug>,
    /// Present on dry runs only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub would_create: Option<Vec<DraftSummary>>,
    /// Present on commits only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<ProductId>>,
    /// Cache scopes signaled after a commit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalidated: Vec<ScopeKey>,
}

impl GenerationResult {
    pub fn preview(would_create: Vec<DraftSummary>, skipped: Vec<SkippedSlug>) -> Self {
        Self {
            dry_run: true,
            created: 0,
            skipped,
            would_create: Some(would_create),
            product_ids: None,
            invalidated: Vec::new(),
        }
    }

    pub fn committed(product_ids: Vec<ProductId>, skipped: Vec<SkippedSlug>, invalidated: Vec<ScopeKey>) -> Self {
        Self {
            dry_run: false,
            created: product_ids.len(),
            skipped,
            would_create: None,
            product_ids: Some(product_ids),
            invalidated,
        }
    }

    pub fn skipped_slugs(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.slug.as_str()).collect()
    }
}
