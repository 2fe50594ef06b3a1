//! Schema coercion engine.
//!
//! Builds a per-table validator from an ordered field list and applies it
//! uniformly to record payloads before they are transmitted.

use crate::field::{self, Field, SelectPolicy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One field's validation failure within a record submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A validator built from a table's field list.
///
/// Validation walks the schema in field order, applies the `required`
/// check before type coercion, and collects every field error instead of
/// failing fast. Empty submissions (absent, `null`, or `""`) on optional
/// fields pass through untouched, which is how the server stores them.
/// Payload keys the schema does not know about pass through unvalidated,
/// so a payload written by a newer schema snapshot survives.
///
/// Validation is idempotent: feeding a coerced payload back in yields the
/// same payload and no errors.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    fields: Vec<Field>,
    select_policy: SelectPolicy,
}

impl SchemaValidator {
    /// Builds a validator over the given fields with the default
    /// (strict) select policy.
    pub fn new(mut fields: Vec<Field>) -> Self {
        fields.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        Self {
            fields,
            select_policy: SelectPolicy::default(),
        }
    }

    /// Overrides how select values are checked against `choices`.
    pub fn with_select_policy(mut self, policy: SelectPolicy) -> Self {
        self.select_policy = policy;
        self
    }

    /// The fields this validator was built from, in schema order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Validates and coerces a record payload.
    ///
    /// Returns the coerced payload, or every field error found.
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<Map<String, Value>, Vec<FieldError>> {
        let mut coerced = payload.clone();
        let mut errors = Vec::new();

        for field in &self.fields {
            let value = payload.get(&field.name);
            let is_empty = matches!(value, None | Some(Value::Null))
                || matches!(value, Some(Value::String(s)) if s.is_empty());

            if is_empty {
                if field.required {
                    errors.push(FieldError::new(&field.name, "This field is required."));
                }
                // Empty submissions on optional fields are stored as
                // submitted; coercing `null` would reject a payload this
                // validator produced itself.
                continue;
            }

            let Some(value) = value else {
                continue;
            };

            match field::coerce(field.field_type, value, &field.options, self.select_policy) {
                Ok(clean) => {
                    coerced.insert(field.name.clone(), clean);
                }
                Err(err) => errors.push(FieldError::new(&field.name, err.message)),
            }
        }

        if errors.is_empty() { Ok(coerced) } else { Err(errors) }
    }

    /// Convenience wrapper over [`validate`](Self::validate) accepting any
    /// JSON object value.
    pub fn validate_value(&self, payload: &Value) -> Result<Map<String, Value>, Vec<FieldError>> {
        match payload {
            Value::Object(map) => self.validate(map),
            _ => Err(vec![FieldError::new("", "Payload must be a JSON object.")]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn age_schema() -> SchemaValidator {
        SchemaValidator::new(vec![Field::new(1, "Age", FieldType::Number).required()])
    }

    #[test]
    fn test_required_missing_field() {
        let errors = age_schema().validate(&obj(json!({}))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Age");
    }

    #[test]
    fn test_required_null_and_empty_string() {
        let validator = age_schema();
        assert!(validator.validate(&obj(json!({"Age": null}))).is_err());
        assert!(validator.validate(&obj(json!({"Age": ""}))).is_err());
    }

    #[test]
    fn test_numeric_string_coerced() {
        let coerced = age_schema().validate(&obj(json!({"Age": "30"}))).unwrap();
        assert_eq!(Value::Object(coerced), json!({"Age": 30}));
    }

    #[test]
    fn test_errors_collected_not_fail_fast() {
        let validator = SchemaValidator::new(vec![
            Field::new(1, "Age", FieldType::Number),
            Field::new(1, "Name", FieldType::Text).required(),
            Field::new(1, "Active", FieldType::Boolean),
        ]);
        let errors = validator
            .validate(&obj(json!({"Age": "abc", "Active": "maybe"})))
            .unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["Age", "Name", "Active"]);
    }

    #[test]
    fn test_one_bad_field_does_not_block_others() {
        let validator = SchemaValidator::new(vec![
            Field::new(1, "Age", FieldType::Number),
            Field::new(1, "Name", FieldType::Text),
        ]);
        let errors = validator
            .validate(&obj(json!({"Age": "abc", "Name": "ok"})))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Age");
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let coerced = age_schema()
            .validate(&obj(json!({"Age": "30", "Legacy": {"nested": true}})))
            .unwrap();
        assert_eq!(coerced["Legacy"], json!({"nested": true}));
    }

    #[test]
    fn test_absent_optional_fields_stay_absent() {
        let validator = SchemaValidator::new(vec![
            Field::new(1, "Age", FieldType::Number),
            Field::new(1, "Name", FieldType::Text),
        ]);
        let coerced = validator.validate(&obj(json!({"Name": "x"}))).unwrap();
        assert!(!coerced.contains_key("Age"));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = SchemaValidator::new(vec![
            Field::new(1, "Age", FieldType::Number).required(),
            Field::new(1, "Score", FieldType::Decimal),
            Field::new(1, "Active", FieldType::Boolean),
            Field::new(1, "Born", FieldType::Date),
            Field::new(1, "Bio", FieldType::LongText),
            Field::new(1, "Tags", FieldType::MultiSelect).with_choices(["a", "b"]),
        ]);
        let payload = obj(json!({
            "Age": "30",
            "Score": "12.5",
            "Active": "true",
            "Born": "1994-01-15",
            "Bio": null,
            "Tags": ["b", "a"],
        }));
        let first = validator.validate(&payload).unwrap();
        let second = validator.validate(&first).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_null_on_optional_typed_fields_accepted() {
        let validator = SchemaValidator::new(vec![
            Field::new(1, "Age", FieldType::Number),
            Field::new(1, "Born", FieldType::Date),
            Field::new(1, "Status", FieldType::SingleSelect).with_choices(["open"]),
        ]);
        let payload = obj(json!({"Age": null, "Born": null, "Status": null}));
        let coerced = validator.validate(&payload).unwrap();
        assert_eq!(
            Value::Object(coerced.clone()),
            json!({"Age": null, "Born": null, "Status": null})
        );
        assert_eq!(validator.validate(&coerced).unwrap(), coerced);
    }

    #[test]
    fn test_empty_submission_on_optional_field_revalidates() {
        let validator = SchemaValidator::new(vec![
            Field::new(1, "Age", FieldType::Number),
            Field::new(1, "Active", FieldType::Boolean),
        ]);
        let first = validator
            .validate(&obj(json!({"Age": "", "Active": ""})))
            .unwrap();
        let second = validator.validate(&first).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lenient_policy_applies_to_selects() {
        let fields = vec![Field::new(1, "Status", FieldType::SingleSelect).with_choices(["open"])];
        let payload = obj(json!({"Status": "archived"}));

        assert!(SchemaValidator::new(fields.clone()).validate(&payload).is_err());
        let lenient = SchemaValidator::new(fields).with_select_policy(SelectPolicy::Lenient);
        assert!(lenient.validate(&payload).is_ok());
    }

    #[test]
    fn test_non_object_payload() {
        let errors = age_schema().validate_value(&json!([1, 2])).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
