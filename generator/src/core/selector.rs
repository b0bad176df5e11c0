//! Leaf selection and validation
//!
//! Turns a requested slug list into a deterministic plan: accepted leaves in
//! request order (first occurrence wins) and ordered rejections.

use std::collections::HashSet;
use std::sync::Arc;

use shared::{ProductTemplate, SkipReason, SkippedSlug};

use super::taxonomy::{TaxonomyNode, TaxonomyTree};

/// An accepted leaf with everything generation needs
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLeaf {
    pub slug: String,
    pub leaf: TaxonomyNode,
    /// Root-to-leaf chain, leaf included
    pub ancestors: Vec<TaxonomyNode>,
    pub template: Option<Arc<ProductTemplate>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationPlan {
    pub accepted: Vec<PlannedLeaf>,
    pub rejected: Vec<SkippedSlug>,
}

impl GenerationPlan {
    pub fn accepted_slugs(&self) -> Vec<&str> {
        self.accepted.iter().map(|entry| entry.slug.as_str()).collect()
    }

    pub fn entry(&self, slug: &str) -> Option<&PlannedLeaf> {
        self.accepted.iter().find(|entry| entry.slug == slug)
    }
}

pub struct LeafSelector;

impl LeafSelector {
    pub fn validate(
        tree: &TaxonomyTree,
        requested_slugs: &[String],
        template: Option<Arc<ProductTemplate>>,
    ) -> GenerationPlan {
        let mut plan = GenerationPlan::default();

        for slug in dedup_preserving_order(requested_slugs) {
            match tree.get(slug) {
                None => plan.rejected.push(SkippedSlug::new(slug, SkipReason::NotFound)),
                Some(node) if !node.is_leaf() => plan.rejected.push(SkippedSlug::new(slug, SkipReason::NotLeaf)),
                Some(node) => plan.accepted.push(PlannedLeaf {
                    slug: slug.to_string(),
                    leaf: node.clone(),
                    ancestors: tree.ancestors(node).into_iter().cloned().collect(),
                    template: template.clone(),
                }),
            }
        }

        plan
    }
}

/// First occurrence of each slug, in request order
pub fn dedup_preserving_order(slugs: &[String]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(slugs.len());
    slugs
        .iter()
        .map(String::as_str)
        .filter(|slug| seen.insert(*slug))
        .collect()
}
