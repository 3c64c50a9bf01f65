//! # Schema Deriver
//!
//! Converts a [`ModelDef`] into a reusable validator/serializer pair.
//! Derivation is a deterministic, side-effect-free function of the model
//! definition plus [`SchemaOptions`] — the same inputs always yield a
//! structurally equal [`Schema`], so racing redundant derivations is safe
//! and documentation emission stays consistent. Derivation never touches
//! the documentation registry.
//!
//! Two concerns are bundled:
//!
//! - **load** — raw wire data → typed, validated value. Enforces
//!   constraints, fills defaults, rejects unknown and wrong-typed data.
//!   [`Schema::load`] takes parsed JSON (strict types);
//!   [`Schema::load_query`] takes the query string's ordered key/value
//!   pairs and coerces string-typed wire values to the declared field
//!   types (`"5"` → 5, `"true"` → true).
//! - **dump** — typed value → wire-shaped data, declared field order
//!   preserved, only declared fields emitted. A missing required field is
//!   a failure: the handler promised a shape it did not deliver.
//!
//! Both directions are all-or-nothing: every offending field is collected
//! into one aggregated [`ValidationFailure`].

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{IssueCollector, ValidationFailure};
use crate::model::{Constraint, FieldDef, FieldType, ModelDef};

/// What to do with input fields the model does not declare.
///
/// The default is [`Reject`](UnknownFieldPolicy::Reject) for both body and
/// query schemas: an undeclared key is a validation failure unless the
/// schema explicitly opts into `Ignore` or `Include`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Undeclared fields fail validation.
    #[default]
    Reject,
    /// Undeclared fields are dropped.
    Ignore,
    /// Undeclared fields pass through after the declared fields.
    Include,
}

/// Schema-level behavior knobs recognized at derivation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaOptions {
    pub unknown_fields: UnknownFieldPolicy,
}

impl SchemaOptions {
    pub fn unknown_fields(policy: UnknownFieldPolicy) -> Self {
        Self {
            unknown_fields: policy,
        }
    }
}

/// How wire values are interpreted during load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    /// JSON body: values must already carry the declared type.
    Strict,
    /// Query string: values arrive as strings and are coerced.
    Coerce,
}

/// Derived, immutable validator/serializer bound to one [`ModelDef`].
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    model: Arc<ModelDef>,
    options: SchemaOptions,
}

impl Schema {
    /// Derive a schema from a model definition.
    pub fn derive(model: &Arc<ModelDef>, options: SchemaOptions) -> Self {
        Self {
            model: Arc::clone(model),
            options,
        }
    }

    /// The bound model definition.
    pub fn model(&self) -> &ModelDef {
        &self.model
    }

    /// The options the schema was derived with.
    pub fn options(&self) -> SchemaOptions {
        self.options
    }

    /// Load parsed JSON wire data into a typed, validated value.
    ///
    /// Defaults are filled for absent fields; declared field order is
    /// established here so a later dump round-trips cleanly.
    pub fn load(&self, raw: &Value) -> Result<Value, ValidationFailure> {
        let mut collector = IssueCollector::new();
        let object = match raw.as_object() {
            Some(object) => object,
            None => {
                collector.push("", "not a valid object");
                return collector.into_result(Value::Null);
            }
        };
        let loaded = self.load_object(&self.model, object, LoadMode::Strict, "", &mut collector);
        collector.into_result(Value::Object(loaded))
    }

    /// Load a query string's ordered key/value pairs.
    ///
    /// Wire values are string-typed; this coerces them to the declared
    /// field types. Repeated keys feed list-typed fields; for scalar
    /// fields the last occurrence wins.
    pub fn load_query(&self, pairs: &[(String, String)]) -> Result<Value, ValidationFailure> {
        let mut raw = Map::new();
        for field in self.model.fields() {
            let values: Vec<&str> = pairs
                .iter()
                .filter(|(key, _)| key == field.name())
                .map(|(_, value)| value.as_str())
                .collect();
            if values.is_empty() {
                continue;
            }
            if wants_list(field.ty()) {
                raw.insert(
                    field.name().to_string(),
                    Value::Array(values.iter().map(|v| Value::String(v.to_string())).collect()),
                );
            } else {
                // Last occurrence wins for scalar fields.
                let last = values[values.len() - 1];
                raw.insert(field.name().to_string(), Value::String(last.to_string()));
            }
        }
        // Carry undeclared keys into the raw object so the unknown-field
        // policy applies uniformly to body and query loads.
        for (key, value) in pairs {
            if self.model.field(key).is_none() && !raw.contains_key(key) {
                raw.insert(key.clone(), Value::String(value.clone()));
            }
        }

        let mut collector = IssueCollector::new();
        let loaded = self.load_object(&self.model, &raw, LoadMode::Coerce, "", &mut collector);
        collector.into_result(Value::Object(loaded))
    }

    /// Dump a typed value into wire-shaped data.
    ///
    /// Only declared fields are emitted, in declaration order. Extra
    /// fields on the value are dropped; a missing required field fails.
    pub fn dump(&self, value: &Value) -> Result<Value, ValidationFailure> {
        let mut collector = IssueCollector::new();
        let dumped = self.dump_root(value, "", &mut collector);
        collector.into_result(dumped)
    }

    /// Dump a sequence of typed values element-wise, preserving order.
    pub fn dump_many(&self, values: &[Value]) -> Result<Value, ValidationFailure> {
        let mut collector = IssueCollector::new();
        let mut out = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            out.push(self.dump_root(value, &index.to_string(), &mut collector));
        }
        collector.into_result(Value::Array(out))
    }

    fn dump_root(&self, value: &Value, prefix: &str, collector: &mut IssueCollector) -> Value {
        match value.as_object() {
            Some(object) => {
                Value::Object(dump_object(&self.model, object, prefix, collector))
            }
            None => {
                collector.push(prefix, "not a valid object");
                Value::Null
            }
        }
    }

    fn load_object(
        &self,
        model: &ModelDef,
        raw: &Map<String, Value>,
        mode: LoadMode,
        prefix: &str,
        collector: &mut IssueCollector,
    ) -> Map<String, Value> {
        let mut out = Map::new();
        for field in model.fields() {
            let path = join_path(prefix, field.name());
            match raw.get(field.name()) {
                Some(value) => {
                    if let Some(loaded) = self.load_value(field, field.ty(), value, mode, &path, collector)
                    {
                        out.insert(field.name().to_string(), loaded);
                    }
                }
                None => match field.default() {
                    // Defaults are declared by the service author and are
                    // trusted as already wire-shaped.
                    Some(default) => {
                        out.insert(field.name().to_string(), default.clone());
                    }
                    None if matches!(field.ty(), FieldType::Optional(_)) => {
                        out.insert(field.name().to_string(), Value::Null);
                    }
                    None => collector.push(&path, "missing required field"),
                },
            }
        }

        for key in raw.keys() {
            if model.field(key).is_none() {
                match self.options.unknown_fields {
                    UnknownFieldPolicy::Reject => {
                        collector.push(&join_path(prefix, key), "unknown field");
                    }
                    UnknownFieldPolicy::Ignore => {}
                    UnknownFieldPolicy::Include => {
                        out.insert(key.clone(), raw[key].clone());
                    }
                }
            }
        }
        out
    }

    fn load_value(
        &self,
        field: &FieldDef,
        ty: &FieldType,
        raw: &Value,
        mode: LoadMode,
        path: &str,
        collector: &mut IssueCollector,
    ) -> Option<Value> {
        match ty {
            FieldType::Optional(inner) => {
                if raw.is_null() {
                    Some(Value::Null)
                } else {
                    self.load_value(field, inner, raw, mode, path, collector)
                }
            }
            FieldType::Integer => {
                let parsed = match (mode, raw) {
                    (_, Value::Number(n)) => n.as_i64(),
                    (LoadMode::Coerce, Value::String(s)) => s.trim().parse::<i64>().ok(),
                    _ => None,
                };
                match parsed {
                    Some(n) if check_range(field.constraints(), n, path, collector) => {
                        Some(Value::Number(n.into()))
                    }
                    Some(_) => None,
                    None => {
                        collector.push(path, "not a valid integer");
                        None
                    }
                }
            }
            FieldType::String => match raw.as_str() {
                Some(s) if check_length(field.constraints(), s, path, collector) => {
                    Some(Value::String(s.to_string()))
                }
                Some(_) => None,
                None => {
                    collector.push(path, "not a valid string");
                    None
                }
            },
            FieldType::Boolean => {
                let parsed = match (mode, raw) {
                    (_, Value::Bool(b)) => Some(*b),
                    (LoadMode::Coerce, Value::String(s)) => {
                        match s.to_ascii_lowercase().as_str() {
                            "true" | "1" => Some(true),
                            "false" | "0" => Some(false),
                            _ => None,
                        }
                    }
                    _ => None,
                };
                match parsed {
                    Some(b) => Some(Value::Bool(b)),
                    None => {
                        collector.push(path, "not a valid boolean");
                        None
                    }
                }
            }
            FieldType::List(inner) => match raw.as_array() {
                Some(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        let item_path = format!("{path}.{index}");
                        if let Some(loaded) =
                            self.load_value(field, inner, item, mode, &item_path, collector)
                        {
                            out.push(loaded);
                        }
                    }
                    Some(Value::Array(out))
                }
                None => {
                    collector.push(path, "not a valid list");
                    None
                }
            },
            FieldType::Nested(model) => match raw.as_object() {
                Some(object) => {
                    Some(Value::Object(self.load_object(model, object, mode, path, collector)))
                }
                None => {
                    collector.push(path, "not a valid object");
                    None
                }
            },
        }
    }
}

/// Dump one object against a model: declared fields only, in order.
fn dump_object(
    model: &ModelDef,
    raw: &Map<String, Value>,
    prefix: &str,
    collector: &mut IssueCollector,
) -> Map<String, Value> {
    let mut out = Map::new();
    for field in model.fields() {
        let path = join_path(prefix, field.name());
        match raw.get(field.name()) {
            Some(value) => {
                if let Some(dumped) = dump_value(field.ty(), value, &path, collector) {
                    out.insert(field.name().to_string(), dumped);
                }
            }
            None if matches!(field.ty(), FieldType::Optional(_)) => {
                out.insert(field.name().to_string(), Value::Null);
            }
            None => collector.push(&path, "missing required field"),
        }
    }
    out
}

/// Type-check one value on the dump path. Constraints are a load-time
/// concern; dump only verifies the promised shape.
fn dump_value(
    ty: &FieldType,
    raw: &Value,
    path: &str,
    collector: &mut IssueCollector,
) -> Option<Value> {
    match ty {
        FieldType::Optional(inner) => {
            if raw.is_null() {
                Some(Value::Null)
            } else {
                dump_value(inner, raw, path, collector)
            }
        }
        FieldType::Integer => match raw.as_i64() {
            Some(n) => Some(Value::Number(n.into())),
            None => {
                collector.push(path, "not a valid integer");
                None
            }
        },
        FieldType::String => match raw.as_str() {
            Some(s) => Some(Value::String(s.to_string())),
            None => {
                collector.push(path, "not a valid string");
                None
            }
        },
        FieldType::Boolean => match raw.as_bool() {
            Some(b) => Some(Value::Bool(b)),
            None => {
                collector.push(path, "not a valid boolean");
                None
            }
        },
        FieldType::List(inner) => match raw.as_array() {
            Some(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{path}.{index}");
                    if let Some(dumped) = dump_value(inner, item, &item_path, collector) {
                        out.push(dumped);
                    }
                }
                Some(Value::Array(out))
            }
            None => {
                collector.push(path, "not a valid list");
                None
            }
        },
        FieldType::Nested(model) => match raw.as_object() {
            Some(object) => Some(Value::Object(dump_object(model, object, path, collector))),
            None => {
                collector.push(path, "not a valid object");
                None
            }
        },
    }
}

fn check_range(
    constraints: &[Constraint],
    value: i64,
    path: &str,
    collector: &mut IssueCollector,
) -> bool {
    let mut ok = true;
    for constraint in constraints {
        if let Constraint::Range { min, max } = constraint {
            if let Some(min) = min {
                if value < *min {
                    collector.push(path, format!("less than minimum {min}"));
                    ok = false;
                }
            }
            if let Some(max) = max {
                if value > *max {
                    collector.push(path, format!("greater than maximum {max}"));
                    ok = false;
                }
            }
        }
    }
    ok
}

fn check_length(
    constraints: &[Constraint],
    value: &str,
    path: &str,
    collector: &mut IssueCollector,
) -> bool {
    let mut ok = true;
    for constraint in constraints {
        if let Constraint::MaxLength(max) = constraint {
            if value.chars().count() > *max {
                collector.push(path, format!("longer than maximum length {max}"));
                ok = false;
            }
        }
    }
    ok
}

/// True when the field consumes repeated query keys as a sequence.
fn wants_list(ty: &FieldType) -> bool {
    match ty {
        FieldType::List(_) => true,
        FieldType::Optional(inner) => wants_list(inner),
        _ => false,
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
