//! Field domain model.
//!
//! A field is one column of a table's dynamically defined schema. The set
//! of field types is closed; the compiler enforces that every type has a
//! coercion rule in the registry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The closed set of field type tags.
///
/// Serialized as the snake_case tag the server stores (`"long_text"`,
/// `"single_select"`, ...). Adding a variant here forces the registry's
/// coercion match to be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    LongText,
    Number,
    Decimal,
    Boolean,
    Date,
    SingleSelect,
    MultiSelect,
    Attachment,
}

impl FieldType {
    /// Parses a free-form type tag. Returns `None` for unregistered tags;
    /// callers must treat that as a coercion failure, never as "text".
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(Self::Text),
            "long_text" => Some(Self::LongText),
            "number" => Some(Self::Number),
            "decimal" => Some(Self::Decimal),
            "boolean" => Some(Self::Boolean),
            "date" => Some(Self::Date),
            "single_select" => Some(Self::SingleSelect),
            "multi_select" => Some(Self::MultiSelect),
            "attachment" => Some(Self::Attachment),
            _ => None,
        }
    }

    /// Returns the wire tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::LongText => "long_text",
            Self::Number => "number",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::SingleSelect => "single_select",
            Self::MultiSelect => "multi_select",
            Self::Attachment => "attachment",
        }
    }

    /// True for the two select types that carry a `choices` option.
    pub fn is_select(&self) -> bool {
        matches!(self, Self::SingleSelect | Self::MultiSelect)
    }

    /// True for the types the server's free-text search scans.
    pub fn is_searchable_text(&self) -> bool {
        matches!(self, Self::Text | Self::LongText)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific field options.
///
/// Only `choices` is interpreted client-side (select types); everything
/// else is preserved untouched for forward compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldOptions {
    /// Ordered choice list for single/multi select fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Options this client version does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FieldOptions {
    /// Options with the given choice list.
    pub fn with_choices<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            extra: BTreeMap::new(),
        }
    }
}

/// One column of a table's schema.
///
/// `name` is unique within a table (enforced server-side) and doubles as
/// the record-payload key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Unique identifier for the field
    pub id: i64,
    /// Owning table
    pub table: i64,
    /// Field name; the key under which record values are stored
    pub name: String,
    /// Type tag driving coercion and validation
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether a value must be present on every record
    #[serde(default)]
    pub required: bool,
    /// Whether values must be unique across the table (server-enforced)
    #[serde(default)]
    pub unique: bool,
    /// Display/order position within the table
    #[serde(default)]
    pub order: u32,
    /// Type-specific options
    #[serde(default)]
    pub options: FieldOptions,
}

impl Field {
    /// A minimal field definition, useful for building schemas in tests
    /// and for create requests where the server assigns `id` and `order`.
    pub fn new(table: i64, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: 0,
            table,
            name: name.into(),
            field_type,
            required: false,
            unique: false,
            order: 0,
            options: FieldOptions::default(),
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the choice list for select fields.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = FieldOptions::with_choices(choices);
        self
    }
}
