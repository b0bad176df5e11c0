//! Generator → cache layer messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SharedError;

/// Identifier the cache layer uses to bulk-invalidate related reads
///
/// Serialized in its string form: `series:<slug>`, `series:<slug>:products`,
/// `products`, `catalog-products`. Inside `<slug>`, `%` is written as `%25`
/// and `:` as `%3A`, so every key has exactly one string form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(into = "String", try_from = "String")]
pub enum ScopeKey {
    Series(String),
    SeriesProducts(String),
    Products,
    CatalogProducts,
}

impl ScopeKey {
    /// Every scope touched by creating products in `series`
    pub fn for_series(series: &str) -> Vec<ScopeKey> {
        vec![
            ScopeKey::Series(series.to_string()),
            ScopeKey::SeriesProducts(series.to_string()),
            ScopeKey::Products,
            ScopeKey::CatalogProducts,
        ]
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKey::Series(series) => write!(f, "series:{}", escape_series(series)),
            ScopeKey::SeriesProducts(series) => write!(f, "series:{}:products", escape_series(series)),
            ScopeKey::Products => write!(f, "products"),
            ScopeKey::CatalogProducts => write!(f, "catalog-products"),
        }
    }
}

impl FromStr for ScopeKey {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SharedError::InvalidScopeKey { input: s.to_string() };

        match s {
            "products" => Ok(ScopeKey::Products),
            "catalog-products" => Ok(ScopeKey::CatalogProducts),
            _ => {
                let rest = s.strip_prefix("series:").ok_or_else(invalid)?;
                let key = match rest.split_once(':') {
                    Some((series, "products")) => unescape_series(series).map(ScopeKey::SeriesProducts),
                    Some(_) => None,
                    None => unescape_series(rest).map(ScopeKey::Series),
                };
                key.ok_or_else(invalid)
            }
        }
    }
}

fn escape_series(series: &str) -> String {
    series.replace('%', "%25").replace(':', "%3A")
}

/// Inverse of `escape_series`; `None` on a raw `:` or an unknown escape
fn unescape_series(escaped: &str) -> Option<String> {
    let mut series = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => match (chars.next(), chars.next()) {
                (Some('2'), Some('5')) => series.push('%'),
                (Some('3'), Some('A')) => series.push(':'),
                _ => return None,
            },
            ':' => return None,
            c => series.push(c),
        }
    }
    Some(series)
}

impl From<ScopeKey> for String {
    fn from(key: ScopeKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for ScopeKey {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Body sent to a remote cache layer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InvalidationNotice {
    pub scope_keys: Vec<ScopeKey>,
    pub issued_at: DateTime<Utc>,
}

impl InvalidationNotice {
    pub fn new(scope_keys: Vec<ScopeKey>) -> Self {
        Self {
            scope_keys,
            issued_at: Utc::now(),
        }
    }
}
