//! Service-specific tests
//!
//! Each service has its own test file; shared draft builders live in `common`.

mod file_store;

// Common test utilities for services
pub mod common {
    use shared::{Attributes, DraftProduct, ProductStatus};

    /// A draft as the generator would produce it for `series`/`leaf`
    pub fn draft(series: &str, leaf: &str) -> DraftProduct {
        DraftProduct {
            series: series.to_string(),
            leaf_slug: leaf.to_string(),
            name: format!("{series} {leaf}"),
            slug: format!("{series}-{leaf}"),
            status: ProductStatus::Draft,
            template_id: None,
            category_path: vec![series.to_string(), leaf.to_string()],
            fields: Attributes::new(),
            price: None,
        }
    }

    pub fn drafts(series: &str, leaves: &[&str]) -> Vec<DraftProduct> {
        leaves.iter().map(|leaf| draft(series, leaf)).collect()
    }
}
