//! # Response Serializer
//!
//! Converts a handler's typed return value into wire-shaped data against
//! a declared response model. Like the request binder, a
//! [`ResponseContract`] is built once per handler at route-binding time;
//! serialization runs once per response.
//!
//! The serializer never chooses an HTTP status code — it returns the
//! serialized body, and pairing it with a status integer is the routing
//! layer's job. `status_code` and `description` exist only to feed the
//! documentation annotator.

use std::sync::Arc;

use serde_json::Value;

use crate::docs::DocEntry;
use crate::error::ValidationFailure;
use crate::model::ModelDef;
use crate::schema::{Schema, SchemaOptions};

/// Declarative response contract for one handler.
#[derive(Debug, Clone)]
pub struct ResponseContract {
    schema: Schema,
    many: bool,
    status_code: String,
    description: String,
}

impl ResponseContract {
    /// Declare the response model with default options.
    pub fn new(model: &Arc<ModelDef>) -> Self {
        Self::with_options(model, SchemaOptions::default())
    }

    /// Declare the response model with explicit schema options.
    pub fn with_options(model: &Arc<ModelDef>, options: SchemaOptions) -> Self {
        Self {
            schema: Schema::derive(model, options),
            many: false,
            status_code: "200".to_string(),
            description: String::new(),
        }
    }

    /// The handler returns a sequence of model instances; each element is
    /// dumped independently, preserving order.
    pub fn many(mut self, many: bool) -> Self {
        self.many = many;
        self
    }

    /// Status-code key for the documentation entry. Does not affect the
    /// response sent on the wire.
    pub fn status_code(mut self, status_code: impl Into<String>) -> Self {
        self.status_code = status_code.into();
        self
    }

    /// Response description for the documentation entry.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The documentation entry recorded for this response at decoration
    /// time.
    pub fn doc_entry(&self) -> DocEntry {
        DocEntry::response(
            self.schema.clone(),
            self.many,
            self.status_code.clone(),
            self.description.clone(),
        )
    }

    /// Dump the handler's return value into wire-shaped data.
    ///
    /// A failure here means the handler promised a shape it did not
    /// deliver — a server-side bug the boundary surfaces as an internal
    /// error, never a client error.
    pub fn serialize(&self, value: &Value) -> Result<Value, ValidationFailure> {
        if self.many {
            let items = value.as_array().ok_or_else(|| {
                ValidationFailure::single("", "expected a sequence of values for many=true")
            })?;
            self.schema.dump_many(items)
        } else {
            self.schema.dump(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::DocLocation;
    use crate::model::{FieldDef, FieldType};
    use serde_json::json;

    fn item_model() -> Arc<ModelDef> {
        ModelDef::builder("Item")
            .field(FieldDef::new("id", FieldType::Integer))
            .field(FieldDef::new("code", FieldType::String))
            .build()
    }

    #[test]
    fn serializes_single_value_in_declared_order() {
        let contract = ResponseContract::new(&item_model());
        let wire = contract
            .serialize(&json!({"code": "A", "id": 7}))
            .unwrap();
        assert_eq!(
            serde_json::to_string(&wire).unwrap(),
            r#"{"id":7,"code":"A"}"#
        );
    }

    #[test]
    fn many_serializes_three_items_preserving_order() {
        let contract = ResponseContract::new(&item_model()).many(true);
        let items = json!([
            {"id": 3, "code": "c"},
            {"id": 1, "code": "a"},
            {"id": 2, "code": "b"},
        ]);
        let wire = contract.serialize(&items).unwrap();
        let ids: Vec<i64> = wire
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn many_with_non_sequence_value_fails() {
        let contract = ResponseContract::new(&item_model()).many(true);
        assert!(contract.serialize(&json!({"id": 1, "code": "a"})).is_err());
    }

    #[test]
    fn missing_promised_field_fails() {
        let contract = ResponseContract::new(&item_model());
        let failure = contract.serialize(&json!({"id": 1})).unwrap_err();
        assert!(failure.cites("code"));
    }

    #[test]
    fn doc_entry_carries_status_and_description() {
        let contract = ResponseContract::new(&item_model())
            .status_code("201")
            .description("created");
        let entry = contract.doc_entry();
        assert_eq!(entry.location, DocLocation::Response);
        assert_eq!(entry.status_code.as_deref(), Some("201"));
        assert_eq!(entry.description.as_deref(), Some("created"));
        assert!(!entry.many);
    }

    #[test]
    fn serialization_does_not_consult_status_code() {
        // status_code feeds documentation only; the wire body is the same.
        let plain = ResponseContract::new(&item_model());
        let keyed = ResponseContract::new(&item_model()).status_code("418");
        let value = json!({"id": 1, "code": "a"});
        assert_eq!(
            plain.serialize(&value).unwrap(),
            keyed.serialize(&value).unwrap()
        );
    }
}
