//! View domain model.

use serde::{Deserialize, Serialize};

/// Declarative sort/filter configuration stored on a view.
///
/// The string entries are the storage form as well as the wire form
/// (`"field:asc"`, `"field:op:value"`); see [`crate::view::codec`] for
/// the structured counterparts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Ordered `"<field>:<asc|desc>"` entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,
    /// Ordered `"<field>:<operator>:<value>"` entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<String>,
    /// Presentation-only; never affects the query
    #[serde(
        default,
        rename = "hiddenFields",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub hidden_fields: Vec<String>,
}

impl ViewConfig {
    /// True when neither sort nor filter entries are present.
    pub fn is_empty(&self) -> bool {
        self.sort.is_empty() && self.filter.is_empty()
    }
}

/// A named, persisted snapshot of a query over a table's records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    /// Unique identifier for the view
    pub id: i64,
    /// Owning table
    pub table: i64,
    /// Display name
    pub name: String,
    /// Sort/filter configuration
    #[serde(default)]
    pub config: ViewConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let config = ViewConfig {
            sort: vec!["Name:asc".into()],
            filter: vec![],
            hidden_fields: vec!["Secret".into()],
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, json!({"sort": ["Name:asc"], "hiddenFields": ["Secret"]}));
    }

    #[test]
    fn test_missing_config_defaults_empty() {
        let view: View = serde_json::from_value(json!({
            "id": 1, "table": 2, "name": "All"
        }))
        .unwrap();
        assert!(view.config.is_empty());
    }
}
