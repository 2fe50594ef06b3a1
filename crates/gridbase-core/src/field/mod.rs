//! Field definitions and the field type registry.

pub mod model;
pub mod registry;

pub use model::{Field, FieldOptions, FieldType};
pub use registry::{CoercionError, SelectPolicy, coerce, coerce_tag, default_value};
