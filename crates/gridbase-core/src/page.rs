//! Collection response envelope.
//!
//! List endpoints return either a raw JSON array or a paginated
//! `{count, next, previous, results}` envelope; callers must accept both.

use serde::{Deserialize, Serialize};

/// A paginated collection envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Either shape a list endpoint may return.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    Paginated(Paginated<T>),
    Plain(Vec<T>),
}

impl<T> Page<T> {
    /// Unwraps the items regardless of envelope shape.
    pub fn into_results(self) -> Vec<T> {
        match self {
            Self::Paginated(page) => page.results,
            Self::Plain(items) => items,
        }
    }

    /// Total item count when known; plain collections report their length.
    pub fn count(&self) -> u64 {
        match self {
            Self::Paginated(page) => page.count,
            Self::Plain(items) => items.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_collection() {
        let page: Page<i64> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(page.count(), 3);
        assert_eq!(page.into_results(), vec![1, 2, 3]);
    }

    #[test]
    fn test_paginated_envelope() {
        let page: Page<i64> = serde_json::from_value(json!({
            "count": 42,
            "next": "http://x/api/records?page=2",
            "previous": null,
            "results": [1, 2]
        }))
        .unwrap();
        assert_eq!(page.count(), 42);
        assert_eq!(page.into_results(), vec![1, 2]);
    }
}
