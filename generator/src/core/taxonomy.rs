//! Immutable taxonomy snapshot for one series
//!
//! Nodes live in a flat arena indexed by id and slug. Parent links are plain
//! identifiers resolved through the index, so a snapshot is a value that can be
//! shared freely between tasks.

use std::collections::{HashMap, HashSet};

use shared::{Attributes, TaxonomyNodeRecord};

use crate::error::{GeneratorError, GeneratorResult};

/// Structural role of a node, derived when the snapshot is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Parentless node with children
    Series,
    /// Nested node with children
    Group,
    /// Node without children; the only kind that originates a product
    Leaf,
}

impl NodeKind {
    pub fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Leaf)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyNode {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub parent: Option<String>,
    /// Child identifiers in input order
    pub children: Vec<String>,
    pub kind: NodeKind,
    pub attributes: Attributes,
}

impl TaxonomyNode {
    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }
}

#[derive(Debug, Clone)]
pub struct TaxonomyTree {
    nodes: Vec<TaxonomyNode>,
    by_id: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
    roots: Vec<usize>,
}

impl TaxonomyTree {
    /// Build a snapshot from flat or nested records
    ///
    /// Fails on duplicate ids or slugs, unknown parents and parent cycles.
    pub fn build(records: Vec<TaxonomyNodeRecord>) -> GeneratorResult<Self> {
        let flat = flatten(records)?;

        let mut nodes = Vec::with_capacity(flat.len());
        let mut by_id = HashMap::with_capacity(flat.len());
        let mut by_slug = HashMap::with_capacity(flat.len());

        for record in flat {
            let index = nodes.len();
            if by_id.insert(record.id.clone(), index).is_some() {
                return Err(GeneratorError::malformed(format!("duplicate node id '{}'", record.id)));
            }
            if by_slug.insert(record.slug.clone(), index).is_some() {
                return Err(GeneratorError::malformed(format!("duplicate slug '{}'", record.slug)));
            }
            nodes.push(TaxonomyNode {
                id: record.id,
                slug: record.slug,
                name: record.name,
                parent: record.parent,
                children: Vec::new(),
                kind: NodeKind::Leaf,
                attributes: record.attributes,
            });
        }

        let mut roots = Vec::new();
        for index in 0..nodes.len() {
            match nodes[index].parent.clone() {
                None => roots.push(index),
                Some(parent_id) => {
                    let parent = *by_id.get(&parent_id).ok_or_else(|| {
                        GeneratorError::malformed(format!(
                            "node '{}' references unknown parent '{}'",
                            nodes[index].id, parent_id
                        ))
                    })?;
                    let child_id = nodes[index].id.clone();
                    nodes[parent].children.push(child_id);
                }
            }
        }

        detect_cycles(&nodes, &by_id)?;

        for node in &mut nodes {
            node.kind = match (node.children.is_empty(), node.parent.is_some()) {
                (true, _) => NodeKind::Leaf,
                (false, false) => NodeKind::Series,
                (false, true) => NodeKind::Group,
            };
        }

        Ok(Self {
            nodes,
            by_id,
            by_slug,
            roots,
        })
    }

    pub fn get(&self, slug: &str) -> Option<&TaxonomyNode> {
        self.by_slug.get(slug).map(|&index| &self.nodes[index])
    }

    pub fn find(&self, slug: &str) -> GeneratorResult<&TaxonomyNode> {
        self.get(slug).ok_or_else(|| GeneratorError::NodeNotFound { slug: slug.to_string() })
    }

    pub fn node_by_id(&self, id: &str) -> Option<&TaxonomyNode> {
        self.by_id.get(id).map(|&index| &self.nodes[index])
    }

    /// Depth-first leaf walk; each call starts a fresh traversal
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Chain from the root down to `node`, inclusive
    pub fn ancestors<'a>(&'a self, node: &'a TaxonomyNode) -> Vec<&'a TaxonomyNode> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = current.parent.as_deref().and_then(|id| self.node_by_id(id)) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    pub fn roots(&self) -> impl Iterator<Item = &TaxonomyNode> {
        self.roots.iter().map(|&index| &self.nodes[index])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lazy leaf iterator over a snapshot
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
    tree: &'a TaxonomyTree,
    stack: Vec<usize>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a TaxonomyNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.stack.pop() {
            let node = &self.tree.nodes[index];
            if node.is_leaf() {
                return Some(node);
            }
            for child in node.children.iter().rev() {
                if let Some(&child_index) = self.tree.by_id.get(child) {
                    self.stack.push(child_index);
                }
            }
        }
        None
    }
}

/// Pre-order flattening of nested records, filling in implied parents
fn flatten(records: Vec<TaxonomyNodeRecord>) -> GeneratorResult<Vec<TaxonomyNodeRecord>> {
    let mut flat = Vec::with_capacity(records.len());
    let mut stack: Vec<(TaxonomyNodeRecord, Option<String>)> =
        records.into_iter().rev().map(|record| (record, None)).collect();

    while let Some((mut record, implied_parent)) = stack.pop() {
        if let Some(implied) = implied_parent {
            match &record.parent {
                Some(declared) if *declared != implied => {
                    return Err(GeneratorError::malformed(format!(
                        "node '{}' is nested under '{}' but declares parent '{}'",
                        record.id, implied, declared
                    )));
                }
                _ => record.parent = Some(implied),
            }
        }

        let children = std::mem::take(&mut record.children);
        for child in children.into_iter().rev() {
            stack.push((child, Some(record.id.clone())));
        }
        flat.push(record);
    }

    Ok(flat)
}

fn detect_cycles(nodes: &[TaxonomyNode], by_id: &HashMap<String, usize>) -> GeneratorResult<()> {
    // Nodes already proven to reach a root
    let mut grounded: HashSet<usize> = HashSet::new();

    for start in 0..nodes.len() {
        let mut path = Vec::new();
        let mut on_path = HashSet::new();
        let mut current = Some(start);

        while let Some(index) = current {
            if grounded.contains(&index) {
                break;
            }
            if !on_path.insert(index) {
                return Err(GeneratorError::malformed(format!(
                    "parent cycle through node '{}'",
                    nodes[index].id
                )));
            }
            path.push(index);
            current = nodes[index].parent.as_ref().and_then(|id| by_id.get(id).copied());
        }

        grounded.extend(path);
    }

    Ok(())
}
