//! Entity contract for cacheable records
//!
//! An entity reports its logical category name and its declared fields in
//! order, each field carrying the annotations that mark it as part of the
//! entity's identity. Key derivation works off this explicit field list, so
//! identity resolution is checked at compile time instead of discovered
//! through runtime reflection.

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};

/// A record type that can be looked up and cached as a unit.
///
/// `entry_fields` must list fields in declaration order; key derivation
/// depends on that order for key stability.
pub trait CacheEntry: Serialize + DeserializeOwned + Send + Sync {
    /// Stable logical category name, used as the type segment of cache keys.
    fn entry_name() -> &'static str;

    /// The declared fields of this entity, in declaration order.
    fn entry_fields(&self) -> Vec<EntryField>;
}

/// One declared field of an entity: name, annotations, and current value.
#[derive(Debug, Clone)]
pub struct EntryField {
    name: &'static str,
    tags: &'static [(&'static str, &'static str)],
    value: FieldValue,
}

impl EntryField {
    /// An untagged field.
    pub fn new(name: &'static str, value: impl Into<FieldValue>) -> Self {
        Self {
            name,
            tags: &[],
            value: value.into(),
        }
    }

    /// A field annotated with `(annotation name, key-component name)` pairs.
    pub fn tagged(
        name: &'static str,
        tags: &'static [(&'static str, &'static str)],
        value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            name,
            tags,
            value: value.into(),
        }
    }

    /// Declared field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The key-component name this field carries under `tag`, if any.
    pub fn tag_value(&self, tag: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, value)| *value)
    }

    /// Current field value.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

/// A field value in its string-formattable form.
///
/// `Display` is the default textual conversion used in cache keys: numbers in
/// decimal, strings as-is, absent values as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Signed integer, rendered in decimal.
    Int(i64),
    /// Unsigned integer, rendered in decimal.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean, rendered as `true`/`false`.
    Bool(bool),
    /// String, rendered as-is.
    Str(String),
    /// An unset optional value, rendered as `null`.
    Absent,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "{}", value),
            FieldValue::UInt(value) => write!(f, "{}", value),
            FieldValue::Float(value) => write!(f, "{}", value),
            FieldValue::Bool(value) => write!(f, "{}", value),
            FieldValue::Str(value) => f.write_str(value),
            FieldValue::Absent => f.write_str("null"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::UInt(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::UInt(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_owned())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => FieldValue::Absent,
        }
    }
}
