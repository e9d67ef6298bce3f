//! Schema module: field descriptors and the field mapping catalog.
//!
//! A FieldType describes where a logical query field physically lives. Fields with a
//! non-empty path live inside nested sub-documents of the form
//! `{"k": <field name>, "i"|"f"|"b"|"t"|"v": <value>}`, one value slot per physical type.

use crate::types::{parse_bool, parse_finite, Scalar, ValueType};
use crate::{DocfilterError, Result};
use std::collections::HashMap;
use serde::{Serialize, Deserialize};

/// Lookup capability from logical field name to descriptor.
pub trait FieldMapper {
    fn map(&self, name: &str) -> Option<&FieldType>;
}

impl FieldMapper for HashMap<String, FieldType> {
    fn map(&self, name: &str) -> Option<&FieldType> {
        self.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldType {
    /// Physical field name.
    pub field: String,
    /// Owning nested-document path, empty if not nested.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub value_type: ValueType,
}

// Value slot of a nested sub-document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Int,
    Float,
    Bool,
    Time,
    Str,
}

impl Slot {
    fn suffix(self) -> &'static str {
        match self {
            Slot::Int => "i",
            Slot::Float => "f",
            Slot::Bool => "b",
            Slot::Time => "t",
            Slot::Str => "v",
        }
    }

    fn for_type(ty: ValueType) -> Option<Slot> {
        match ty {
            ValueType::Int => Some(Slot::Int),
            ValueType::Number => Some(Slot::Float),
            ValueType::Bool => Some(Slot::Bool),
            ValueType::Time => Some(Slot::Time),
            _ => None,
        }
    }

    fn infer_text(s: &str) -> Slot {
        if s.parse::<i64>().is_ok() {
            Slot::Int
        } else if parse_finite(s).is_some() {
            Slot::Float
        } else if parse_bool(s).is_some() {
            Slot::Bool
        } else {
            Slot::Str
        }
    }

    fn infer(value: &Scalar) -> Slot {
        match value {
            Scalar::Int(_) => Slot::Int,
            Scalar::Float(_) => Slot::Float,
            Scalar::Bool(_) => Slot::Bool,
            Scalar::Str(s) => Slot::infer_text(s),
        }
    }

    fn coerce(self, value: Scalar) -> Scalar {
        match (self, value) {
            (Slot::Int, Scalar::Str(s)) => match s.parse::<i64>() {
                Ok(i) => Scalar::Int(i),
                Err(_) => Scalar::Str(s),
            },
            // Only narrow floats that fit; `as` would saturate
            (Slot::Int, Scalar::Float(f))
                if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&f) =>
            {
                Scalar::Int(f as i64)
            }
            (Slot::Float, Scalar::Str(s)) => match parse_finite(&s) {
                Some(f) => Scalar::Float(f),
                None => Scalar::Str(s),
            },
            (Slot::Float, Scalar::Int(i)) => Scalar::Float(i as f64),
            (Slot::Bool, Scalar::Str(s)) => match parse_bool(&s) {
                Some(b) => Scalar::Bool(b),
                None => Scalar::Str(s),
            },
            (_, value) => value,
        }
    }
}

impl FieldType {
    pub fn new(field: impl Into<String>, value_type: ValueType) -> Self {
        Self { field: field.into(), path: String::new(), value_type }
    }

    /// A field stored as a keyed entry of the nested document at `path`.
    pub fn nested_in(path: impl Into<String>, field: impl Into<String>, value_type: ValueType) -> Self {
        Self { field: field.into(), path: path.into(), value_type }
    }

    pub fn nested(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn numeric(&self) -> bool {
        self.value_type.is_numeric()
    }

    /// Qualified value-slot field name plus the value coerced into that slot's type.
    ///
    /// The slot comes from the declared value type when it names one, otherwise it is
    /// inferred from the value.
    pub fn prefix_and_value(&self, value: Scalar) -> (String, Scalar) {
        let slot = Slot::for_type(self.value_type).unwrap_or_else(|| Slot::infer(&value));
        (self.qualify(slot), slot.coerce(value))
    }

    /// Qualified value-slot field name for a single match against `value`.
    pub fn path_and_prefix(&self, value: &str) -> String {
        self.qualify(Slot::infer_text(value))
    }

    fn qualify(&self, slot: Slot) -> String {
        format!("{}.{}", self.path, slot.suffix())
    }
}

/// The field mapping catalog, keyed by logical field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: HashMap<String, FieldType>,
}

impl FieldCatalog {
    /// Load a catalog from a JSON object of `name -> descriptor`.
    pub fn from_json(doc: &str) -> Result<Self> {
        let catalog: FieldCatalog = serde_json::from_str(doc)
            .map_err(|e| DocfilterError::Config(format!("invalid field catalog: {}", e)))?;
        if let Some((name, _)) = catalog.fields.iter().find(|(_, ft)| ft.field.is_empty()) {
            return Err(DocfilterError::Config(format!("field '{}' has an empty physical name", name)));
        }
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }
    pub fn fields(&self) -> &HashMap<String, FieldType> {
        &self.fields
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldMapper for FieldCatalog {
    fn map(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }
}

#[derive(Debug, Default)]
pub struct FieldCatalogBuilder {
    fields: HashMap<String, FieldType>,
}

impl FieldCatalogBuilder {
    pub fn new() -> Self {
        Self { fields: HashMap::new() }
    }
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }
    pub fn build(self) -> FieldCatalog {
        FieldCatalog { fields: self.fields }
    }
}
