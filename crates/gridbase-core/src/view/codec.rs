//! View codec: the flat sort/filter wire format.
//!
//! Sort entries are `"<field>:<asc|desc>"`, filter entries are
//! `"<field>:<operator>:<value>"`, and sibling entries are joined with
//! `,`. A filter entry is split at most twice, so a value may itself
//! contain `:`; there is no escaping for `,` in values (known format
//! limitation, left as-is rather than changing the wire contract).

use super::model::ViewConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing the flat string forms.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewCodecError {
    #[error("Malformed sort entry '{0}' (expected field:asc|desc)")]
    MalformedSort(String),
    #[error("Unknown sort direction '{0}'")]
    UnknownDirection(String),
    #[error("Malformed filter entry '{0}' (expected field:operator:value)")]
    MalformedFilter(String),
    #[error("Unknown filter operator '{0}'")]
    UnknownOperator(String),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One structured sort entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Renders the `"field:direction"` wire entry.
    pub fn encode(&self) -> String {
        format!("{}:{}", self.field, self.direction.as_str())
    }

    /// Parses a `"field:direction"` wire entry.
    pub fn parse(entry: &str) -> Result<Self, ViewCodecError> {
        let mut parts = entry.split(':');
        let (Some(field), Some(direction), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ViewCodecError::MalformedSort(entry.to_string()));
        };
        if field.is_empty() {
            return Err(ViewCodecError::MalformedSort(entry.to_string()));
        }
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(ViewCodecError::UnknownDirection(other.to_string())),
        };
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// The filter operators the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Contains,
    Gt,
    Lt,
    /// Value is `"<start>|<end>"`
    Between,
    /// Value is a `|`-separated list
    In,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Contains => "contains",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Between => "between",
            Self::In => "in",
        }
    }

    fn parse(tag: &str) -> Result<Self, ViewCodecError> {
        match tag {
            "eq" => Ok(Self::Eq),
            "ne" => Ok(Self::Ne),
            "contains" => Ok(Self::Contains),
            "gt" => Ok(Self::Gt),
            "lt" => Ok(Self::Lt),
            "between" => Ok(Self::Between),
            "in" => Ok(Self::In),
            other => Err(ViewCodecError::UnknownOperator(other.to_string())),
        }
    }
}

/// One structured filter entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterSpec {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Renders the `"field:operator:value"` wire entry.
    pub fn encode(&self) -> String {
        format!("{}:{}:{}", self.field, self.operator.as_str(), self.value)
    }

    /// Parses a `"field:operator:value"` wire entry. The entry is split at
    /// most twice, so the value keeps any further `:` characters.
    pub fn parse(entry: &str) -> Result<Self, ViewCodecError> {
        let mut parts = entry.splitn(3, ':');
        let (Some(field), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ViewCodecError::MalformedFilter(entry.to_string()));
        };
        if field.is_empty() {
            return Err(ViewCodecError::MalformedFilter(entry.to_string()));
        }
        Ok(Self {
            field: field.to_string(),
            operator: FilterOperator::parse(operator)?,
            value: value.to_string(),
        })
    }
}

/// Joins sort specs into the `sort` query parameter value.
pub fn encode_sort(specs: &[SortSpec]) -> String {
    specs
        .iter()
        .map(SortSpec::encode)
        .collect::<Vec<_>>()
        .join(",")
}

/// Joins filter specs into the `filter` query parameter value.
pub fn encode_filter(specs: &[FilterSpec]) -> String {
    specs
        .iter()
        .map(FilterSpec::encode)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a comma-joined sort parameter back into structured specs.
pub fn parse_sort(raw: &str) -> Result<Vec<SortSpec>, ViewCodecError> {
    raw.split(',')
        .filter(|entry| !entry.is_empty())
        .map(SortSpec::parse)
        .collect()
}

/// Parses a comma-joined filter parameter back into structured specs.
pub fn parse_filter(raw: &str) -> Result<Vec<FilterSpec>, ViewCodecError> {
    raw.split(',')
        .filter(|entry| !entry.is_empty())
        .map(FilterSpec::parse)
        .collect()
}

/// Translates a view configuration into record-list query parameters.
///
/// Empty sort/filter lists produce no parameter at all, so the server's
/// default ordering and visibility apply. `hidden_fields` is presentation
/// state and is never sent.
pub fn query_params(config: &ViewConfig) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if !config.sort.is_empty() {
        params.push(("sort", config.sort.join(",")));
    }
    if !config.filter.is_empty() {
        params.push(("filter", config.filter.join(",")));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_round_trip() {
        let specs = vec![SortSpec::asc("Name"), SortSpec::desc("Age")];
        let encoded = encode_sort(&specs);
        assert_eq!(encoded, "Name:asc,Age:desc");
        assert_eq!(parse_sort(&encoded).unwrap(), specs);
    }

    #[test]
    fn test_sort_rejects_malformed() {
        assert!(matches!(
            SortSpec::parse("Name"),
            Err(ViewCodecError::MalformedSort(_))
        ));
        assert!(matches!(
            SortSpec::parse("Name:up"),
            Err(ViewCodecError::UnknownDirection(_))
        ));
        assert!(matches!(
            SortSpec::parse("Name:asc:extra"),
            Err(ViewCodecError::MalformedSort(_))
        ));
    }

    #[test]
    fn test_filter_round_trip() {
        let specs = vec![
            FilterSpec::new("Status", FilterOperator::Eq, "open"),
            FilterSpec::new("Age", FilterOperator::Between, "18|65"),
            FilterSpec::new("Tag", FilterOperator::In, "a|b|c"),
        ];
        let encoded = encode_filter(&specs);
        assert_eq!(encoded, "Status:eq:open,Age:between:18|65,Tag:in:a|b|c");
        assert_eq!(parse_filter(&encoded).unwrap(), specs);
    }

    #[test]
    fn test_filter_value_keeps_colons() {
        let spec = FilterSpec::parse("When:gt:2024-01-01T10:30:00").unwrap();
        assert_eq!(spec.value, "2024-01-01T10:30:00");
        assert_eq!(FilterSpec::parse(&spec.encode()).unwrap(), spec);
    }

    #[test]
    fn test_filter_rejects_malformed() {
        assert!(matches!(
            FilterSpec::parse("Status:eq"),
            Err(ViewCodecError::MalformedFilter(_))
        ));
        assert!(matches!(
            FilterSpec::parse("Status:like:x"),
            Err(ViewCodecError::UnknownOperator(_))
        ));
    }

    #[test]
    fn test_query_params_skip_empty_lists() {
        assert!(query_params(&ViewConfig::default()).is_empty());

        let config = ViewConfig {
            sort: vec!["Name:asc".into()],
            filter: vec!["Status:eq:open".into(), "Age:gt:18".into()],
            hidden_fields: vec!["Secret".into()],
        };
        let params = query_params(&config);
        assert_eq!(
            params,
            vec![
                ("sort", "Name:asc".to_string()),
                ("filter", "Status:eq:open,Age:gt:18".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_skips_empty_entries() {
        assert_eq!(parse_sort("").unwrap(), vec![]);
        assert_eq!(parse_sort("Name:asc,").unwrap(), vec![SortSpec::asc("Name")]);
    }
}
