//! Test fixtures and data for generator tests
//!
//! The standard series is a small oven range:
//!
//! ```text
//! ovens
//! ├── gas-ovens
//! │   ├── gas-oven-60
//! │   └── gas-oven-90
//! └── electric-oven-60
//! ```

use serde_json::json;
use shared::{Attributes, ProductTemplate, TaxonomyNodeRecord};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const SERIES: &'static str = "ovens";
    pub const GROUP: &'static str = "gas-ovens";
    pub const GAS_60: &'static str = "gas-oven-60";
    pub const GAS_90: &'static str = "gas-oven-90";
    pub const ELECTRIC_60: &'static str = "electric-oven-60";
    pub const UNKNOWN_SLUG: &'static str = "induction-hob";

    pub const TEMPLATE_ID: &'static str = "oven-basic";
    pub const WIDE_SERIES: &'static str = "spares";

    /// The oven series in nested form
    pub fn oven_series() -> Vec<TaxonomyNodeRecord> {
        vec![TaxonomyNodeRecord::new("1", Self::SERIES, "Ovens")
            .with_child(
                TaxonomyNodeRecord::new("2", Self::GROUP, "Gas Ovens")
                    .with_child(
                        TaxonomyNodeRecord::new("3", Self::GAS_60, "Gas Oven 60")
                            .with_attribute("width_cm", json!(60))
                            .with_attribute("fuel", json!("gas")),
                    )
                    .with_child(
                        TaxonomyNodeRecord::new("4", Self::GAS_90, "Gas Oven 90")
                            .with_attribute("width_cm", json!(90))
                            .with_attribute("fuel", json!("gas")),
                    ),
            )
            .with_child(
                TaxonomyNodeRecord::new("5", Self::ELECTRIC_60, "Electric Oven 60")
                    .with_attribute("width_cm", json!(60))
                    .with_attribute("fuel", json!("electric")),
            )]
    }

    /// A flat series with `count` leaves directly under the root
    pub fn wide_series(count: usize) -> Vec<TaxonomyNodeRecord> {
        let mut records = vec![TaxonomyNodeRecord::new("root", Self::WIDE_SERIES, "Spares")];
        records.extend((0..count).map(|i| {
            TaxonomyNodeRecord::new(format!("n{i}"), Self::wide_leaf(i), format!("Part {i:03}"))
                .with_parent("root")
                .with_attribute("index", json!(i))
        }));
        records
    }

    pub fn wide_leaf(index: usize) -> String {
        format!("part-{index:03}")
    }

    pub fn template() -> ProductTemplate {
        let mut defaults = Attributes::new();
        defaults.insert("warranty_years".to_string(), json!(2));
        defaults.insert("width_cm".to_string(), json!(0));

        ProductTemplate {
            id: Self::TEMPLATE_ID.to_string(),
            name: "Basic oven".to_string(),
            defaults,
        }
    }

    /// Slugs as a request would carry them
    pub fn slugs(slugs: &[&str]) -> Vec<String> {
        slugs.iter().map(|s| s.to_string()).collect()
    }

    /// Every leaf of the oven series, in tree order
    pub fn oven_leaves() -> Vec<String> {
        Self::slugs(&[Self::GAS_60, Self::GAS_90, Self::ELECTRIC_60])
    }
}
