//! # Model Definitions
//!
//! Plain, declarative data-shape declarations: an ordered set of named
//! fields, each with a semantic type, an optional default, and optional
//! validation constraints. A [`ModelDef`] is immutable once built and is
//! the single source of truth a [`Schema`](crate::schema::Schema) is
//! derived from — no reflection, the field list is explicit and
//! inspectable.
//!
//! Model identity is the declared name plus the field set. Two models
//! that happen to share structure but carry different names are distinct
//! (the documentation registry keys on the name).

use std::sync::Arc;

use serde_json::Value;

/// Semantic type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// 64-bit signed integer.
    Integer,
    /// UTF-8 string.
    String,
    /// Boolean.
    Boolean,
    /// Optional-of-T: absent or null loads as null.
    Optional(Box<FieldType>),
    /// Ordered sequence of T.
    List(Box<FieldType>),
    /// Nested model. Nested models participate in documentation under
    /// their own declared name.
    Nested(Arc<ModelDef>),
}

impl FieldType {
    /// Human-readable name used in validation messages.
    pub fn describe(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Optional(inner) => inner.describe(),
            FieldType::List(_) => "list",
            FieldType::Nested(_) => "object",
        }
    }
}

/// Per-field validation constraint, enforced during load.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Maximum string length, counted in characters.
    MaxLength(usize),
    /// Inclusive numeric range for integer fields.
    Range { min: Option<i64>, max: Option<i64> },
}

/// A single named field of a model definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    ty: FieldType,
    default: Option<Value>,
    constraints: Vec<Constraint>,
}

impl FieldDef {
    /// Declare a field with the given name and type.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Wire-shaped default applied when the field is absent from input.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Constrain string length.
    pub fn max_length(mut self, max: usize) -> Self {
        self.constraints.push(Constraint::MaxLength(max));
        self
    }

    /// Constrain an integer field to an inclusive range.
    pub fn range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.constraints.push(Constraint::Range { min, max });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

/// An ordered, immutable set of named fields under a declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    name: String,
    fields: Vec<FieldDef>,
}

impl ModelDef {
    /// Start declaring a model.
    pub fn builder(name: impl Into<String>) -> ModelDefBuilder {
        ModelDefBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The declared name. Documentation identity keys on this.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builder for [`ModelDef`]. Field declaration order is preserved and
/// becomes the wire field order on dump.
pub struct ModelDefBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl ModelDefBuilder {
    /// Add a field. Declaration order is significant.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Finish the declaration. The result is shared via `Arc` so nested
    /// models and derived schemas reference one immutable definition.
    pub fn build(self) -> Arc<ModelDef> {
        Arc::new(ModelDef {
            name: self.name,
            fields: self.fields,
        })
    }
}
