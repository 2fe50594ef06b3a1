//! Field type registry: per-type coercion and validation rules.
//!
//! Every [`FieldType`] maps to exactly one coercion rule. The match in
//! [`coerce`] is exhaustive over the closed type set, so a new field type
//! cannot be added without also defining its rule here.

use super::model::{FieldOptions, FieldType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

/// A single field/value pair failed type coercion.
///
/// Recoverable: collected into a batch by the schema validator rather
/// than aborting unrelated fields.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct CoercionError {
    pub message: String,
}

impl CoercionError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Whether select values must belong to the declared `choices` set.
///
/// The reference behavior is ambiguous here (the server enforces
/// membership, the form layer does not), so it is a configuration knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectPolicy {
    /// Values must be members of non-empty `choices` lists.
    #[default]
    Strict,
    /// Membership is left to the server.
    Lenient,
}

/// Coerces a raw value into the canonical representation for a type tag.
///
/// Unregistered tags are rejected; the registry never silently accepts
/// an unknown type.
pub fn coerce_tag(
    tag: &str,
    raw: &Value,
    options: &FieldOptions,
    policy: SelectPolicy,
) -> Result<Value, CoercionError> {
    let ty = FieldType::parse(tag)
        .ok_or_else(|| CoercionError::new(format!("Unknown field type '{tag}'")))?;
    coerce(ty, raw, options, policy)
}

/// Coerces a raw value into the canonical representation for its field type.
///
/// Rules:
/// - number/decimal: numbers pass through; numeric strings parse; the
///   empty string coerces to `null`
/// - boolean: booleans pass through; the literal strings `"true"` and
///   `"false"` (case-sensitive) coerce
/// - date: ISO `YYYY-MM-DD` strings only; the empty string coerces to `null`
/// - single/multi select: strings checked against `choices` per `policy`
/// - text/long_text/attachment: any scalar stringified; `null` becomes `""`
pub fn coerce(
    ty: FieldType,
    raw: &Value,
    options: &FieldOptions,
    policy: SelectPolicy,
) -> Result<Value, CoercionError> {
    match ty {
        FieldType::Number => coerce_numeric(raw, true),
        FieldType::Decimal => coerce_numeric(raw, false),
        FieldType::Boolean => coerce_boolean(raw),
        FieldType::Date => coerce_date(raw),
        FieldType::SingleSelect => coerce_single_select(raw, options, policy),
        FieldType::MultiSelect => coerce_multi_select(raw, options, policy),
        FieldType::Text | FieldType::LongText | FieldType::Attachment => coerce_text(raw),
    }
}

/// Returns the canonical "empty" value for a field type.
pub fn default_value(ty: FieldType) -> Value {
    match ty {
        FieldType::Text | FieldType::LongText | FieldType::Attachment => {
            Value::String(String::new())
        }
        FieldType::Number | FieldType::Decimal | FieldType::Date | FieldType::SingleSelect => {
            Value::Null
        }
        FieldType::Boolean => Value::Bool(false),
        FieldType::MultiSelect => Value::Array(Vec::new()),
    }
}

fn coerce_numeric(raw: &Value, integral: bool) -> Result<Value, CoercionError> {
    match raw {
        Value::Number(_) => Ok(raw.clone()),
        Value::String(s) if s.is_empty() => Ok(Value::Null),
        Value::String(s) => {
            let parsed: f64 = s
                .trim()
                .parse()
                .map_err(|_| CoercionError::new(format!("'{s}' is not a number")))?;
            Ok(number_value(parsed, integral))
        }
        other => Err(CoercionError::new(format!(
            "Expected a number, got {}",
            kind_of(other)
        ))),
    }
}

// Integral number fields emit JSON integers when the value has no
// fractional part, matching what the server stores.
fn number_value(parsed: f64, integral: bool) -> Value {
    if integral && parsed.fract() == 0.0 && parsed.abs() < i64::MAX as f64 {
        Value::Number(Number::from(parsed as i64))
    } else {
        Number::from_f64(parsed).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn coerce_boolean(raw: &Value) -> Result<Value, CoercionError> {
    match raw {
        Value::Bool(_) => Ok(raw.clone()),
        Value::String(s) if s == "true" => Ok(Value::Bool(true)),
        Value::String(s) if s == "false" => Ok(Value::Bool(false)),
        Value::String(s) => Err(CoercionError::new(format!(
            "'{s}' is not a boolean (expected \"true\" or \"false\")"
        ))),
        other => Err(CoercionError::new(format!(
            "Expected a boolean, got {}",
            kind_of(other)
        ))),
    }
}

fn coerce_date(raw: &Value) -> Result<Value, CoercionError> {
    match raw {
        Value::String(s) if s.is_empty() => Ok(Value::Null),
        Value::String(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| CoercionError::new(format!("'{s}' is not an ISO date (YYYY-MM-DD)")))?;
            Ok(raw.clone())
        }
        other => Err(CoercionError::new(format!(
            "Expected an ISO date string, got {}",
            kind_of(other)
        ))),
    }
}

fn coerce_single_select(
    raw: &Value,
    options: &FieldOptions,
    policy: SelectPolicy,
) -> Result<Value, CoercionError> {
    match raw {
        Value::String(s) => {
            check_choice(s, options, policy)?;
            Ok(raw.clone())
        }
        other => Err(CoercionError::new(format!(
            "Expected a string choice, got {}",
            kind_of(other)
        ))),
    }
}

fn coerce_multi_select(
    raw: &Value,
    options: &FieldOptions,
    policy: SelectPolicy,
) -> Result<Value, CoercionError> {
    let Value::Array(items) = raw else {
        return Err(CoercionError::new(format!(
            "Expected a list of choices, got {}",
            kind_of(raw)
        )));
    };
    for item in items {
        let Value::String(s) = item else {
            return Err(CoercionError::new(format!(
                "Choices must be strings, got {}",
                kind_of(item)
            )));
        };
        check_choice(s, options, policy)?;
    }
    // Submitted order is preserved on the wire.
    Ok(raw.clone())
}

fn check_choice(
    value: &str,
    options: &FieldOptions,
    policy: SelectPolicy,
) -> Result<(), CoercionError> {
    if policy == SelectPolicy::Strict
        && !options.choices.is_empty()
        && !options.choices.iter().any(|c| c == value)
    {
        return Err(CoercionError::new(format!("'{value}' is not a valid choice")));
    }
    Ok(())
}

fn coerce_text(raw: &Value) -> Result<Value, CoercionError> {
    match raw {
        Value::String(_) => Ok(raw.clone()),
        Value::Null => Ok(Value::String(String::new())),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(CoercionError::new(format!(
            "Expected a scalar, got {}",
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
