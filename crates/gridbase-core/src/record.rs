//! Record domain model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a table: an opaque key/value payload keyed by field name.
///
/// The payload is only as typed as the schema snapshot that validated it;
/// keys the current schema does not know about are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier for the record
    pub id: i64,
    /// Owning table
    pub table: i64,
    /// Field name to value mapping
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Record {
    /// Returns the value stored under a field name, if present.
    pub fn value(&self, field_name: &str) -> Option<&Value> {
        self.data.get(field_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_with_unknown_keys() {
        let record: Record = serde_json::from_value(json!({
            "id": 10,
            "table": 7,
            "data": {"Name": "Ada", "Age": 36, "Legacy": ["x"]},
            "created_by": 1
        }))
        .unwrap();
        assert_eq!(record.value("Age"), Some(&json!(36)));
        assert_eq!(record.value("Legacy"), Some(&json!(["x"])));
        assert_eq!(record.value("Missing"), None);
    }
}
