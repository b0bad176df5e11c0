//! Draft product generation
//!
//! Pure transform from a planned leaf to a `DraftProduct`. No I/O and no
//! shared state, so dry runs and commits see identical output.

use shared::{Attributes, DraftProduct, ProductStatus, ProductTemplate};

use super::selector::PlannedLeaf;
use super::taxonomy::TaxonomyNode;

pub struct ProductGenerator;

impl ProductGenerator {
    /// Build the draft for one leaf
    ///
    /// `ancestors` runs root-to-leaf and includes the leaf; its root supplies
    /// the series display name.
    pub fn generate(
        series: &str,
        leaf: &TaxonomyNode,
        ancestors: &[TaxonomyNode],
        template: Option<&ProductTemplate>,
        status: ProductStatus,
    ) -> DraftProduct {
        let name = product_name(leaf, ancestors);
        let slug = slugify(&name);

        DraftProduct {
            series: series.to_string(),
            leaf_slug: leaf.slug.clone(),
            name,
            slug,
            status,
            template_id: template.map(|t| t.id.clone()),
            category_path: ancestors.iter().map(|node| node.slug.clone()).collect(),
            fields: merge_fields(template, &leaf.attributes),
            price: None,
        }
    }

    pub fn generate_planned(series: &str, entry: &PlannedLeaf, status: ProductStatus) -> DraftProduct {
        Self::generate(series, &entry.leaf, &entry.ancestors, entry.template.as_deref(), status)
    }
}

fn product_name(leaf: &TaxonomyNode, ancestors: &[TaxonomyNode]) -> String {
    match ancestors.first() {
        Some(root) if root.id != leaf.id => format!("{} {}", root.name.trim(), leaf.name.trim()),
        _ => leaf.name.trim().to_string(),
    }
}

/// Template defaults first, leaf attributes on top
fn merge_fields(template: Option<&ProductTemplate>, attributes: &Attributes) -> Attributes {
    let mut fields = template.map(|t| t.defaults.clone()).unwrap_or_default();
    fields.extend(attributes.iter().map(|(key, value)| (key.clone(), value.clone())));
    fields
}

/// Lowercase ASCII alphanumerics joined by single hyphens
pub fn slugify(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::NodeKind;
    use serde_json::json;

    fn node(id: &str, slug: &str, name: &str, parent: Option<&str>) -> TaxonomyNode {
        TaxonomyNode {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
            parent: parent.map(Into::into),
            children: Vec::new(),
            kind: NodeKind::Leaf,
            attributes: Attributes::new(),
        }
    }

    fn chain() -> Vec<TaxonomyNode> {
        let mut leaf = node("3", "gas-oven-60", "Gas Oven 60", Some("2"));
        leaf.attributes.insert("width_cm".into(), json!(60));
        leaf.attributes.insert("fuel".into(), json!("natural gas"));
        vec![
            node("1", "ovens", "Ovens", None),
            node("2", "gas-ovens", "Gas Ovens", Some("1")),
            leaf,
        ]
    }

    fn template() -> ProductTemplate {
        let mut defaults = Attributes::new();
        defaults.insert("fuel".into(), json!("lpg"));
        defaults.insert("warranty_years".into(), json!(2));
        ProductTemplate {
            id: "kitchen".into(),
            name: "Kitchen appliance".into(),
            defaults,
        }
    }

    #[test]
    fn test_name_and_slug_combine_series_and_leaf() {
        let chain = chain();
        let draft = ProductGenerator::generate("ovens", &chain[2], &chain, None, ProductStatus::Draft);

        assert_eq!(draft.name, "Ovens Gas Oven 60");
        assert_eq!(draft.slug, "ovens-gas-oven-60");
        assert_eq!(draft.category_path, vec!["ovens", "gas-ovens", "gas-oven-60"]);
        assert_eq!(draft.leaf_slug, "gas-oven-60");
    }

    #[test]
    fn test_leaf_attributes_override_template_defaults() {
        let chain = chain();
        let template = template();
        let draft = ProductGenerator::generate("ovens", &chain[2], &chain, Some(&template), ProductStatus::Active);

        assert_eq!(draft.fields["fuel"], json!("natural gas"));
        assert_eq!(draft.fields["warranty_years"], json!(2));
        assert_eq!(draft.fields["width_cm"], json!(60));
        assert_eq!(draft.template_id.as_deref(), Some("kitchen"));
        assert_eq!(draft.status, ProductStatus::Active);
    }

    #[test]
    fn test_price_is_never_assigned() {
        let chain = chain();
        let draft = ProductGenerator::generate("ovens", &chain[2], &chain, Some(&template()), ProductStatus::Draft);
        assert_eq!(draft.price, None);
    }

    #[test]
    fn test_generation_is_repeatable() {
        let chain = chain();
        let first = ProductGenerator::generate("ovens", &chain[2], &chain, Some(&template()), ProductStatus::Draft);
        let second = ProductGenerator::generate("ovens", &chain[2], &chain, Some(&template()), ProductStatus::Draft);

        assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
    }

    #[test]
    fn test_root_leaf_uses_its_own_name() {
        let solo = node("1", "kettle", "Kettle", None);
        let draft = ProductGenerator::generate("kettle", &solo, std::slice::from_ref(&solo), None, ProductStatus::Draft);
        assert_eq!(draft.name, "Kettle");
        assert_eq!(draft.slug, "kettle");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Ovens  Gas Oven 60"), "ovens-gas-oven-60");
        assert_eq!(slugify("  Built-in / Pyrolytic (90cm) "), "built-in-pyrolytic-90cm");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("Gazlı Fırın Çelik 60"), "gazl-f-r-n-elik-60");
        assert!(slugify("Backofen Größe 60").is_ascii());
    }
}
