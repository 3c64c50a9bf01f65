//! # Request Binder
//!
//! Binds an inbound request's body and/or query string to declared
//! models before the handler runs. A [`RequestContract`] is built once
//! per handler at route-binding time (schemas are derived there, never
//! per request) and [`RequestContract::bind`] runs once per request with
//! no retries and no caching of validated values.
//!
//! The binder is transport-agnostic: it sees only raw body bytes and the
//! query string's ordered key/value pairs. Wiring it to a concrete HTTP
//! framework is the routing layer's job.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::docs::DocEntry;
use crate::error::ValidationFailure;
use crate::model::ModelDef;
use crate::schema::{Schema, SchemaOptions};

/// Failure raised by [`RequestContract::bind`].
#[derive(Debug, Error)]
pub enum BindError {
    /// The handler accepted a body without declaring a body model. A
    /// programming mistake, not a client error: the boundary must surface
    /// it as an internal error, never a 4xx.
    #[error("request binder misconfigured: {0}")]
    Config(String),

    /// The client's data failed to parse or validate.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

/// The validated, typed values injected into a handler invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundRequest {
    /// Loaded request body, present when a body model was declared.
    pub payload: Option<Value>,
    /// Loaded query arguments, present when a query model was declared.
    pub query_args: Option<Value>,
}

/// Declarative request contract for one handler.
#[derive(Debug, Clone)]
pub struct RequestContract {
    body: Option<Schema>,
    query: Option<Schema>,
}

impl RequestContract {
    pub fn new() -> Self {
        Self {
            body: None,
            query: None,
        }
    }

    /// Declare the body model. The loaded body becomes
    /// [`BoundRequest::payload`].
    pub fn body(mut self, model: &Arc<ModelDef>, options: SchemaOptions) -> Self {
        self.body = Some(Schema::derive(model, options));
        self
    }

    /// Declare the query model. The loaded query string becomes
    /// [`BoundRequest::query_args`].
    pub fn query(mut self, model: &Arc<ModelDef>, options: SchemaOptions) -> Self {
        self.query = Some(Schema::derive(model, options));
        self
    }

    /// Documentation entries for the declared models, in declaration
    /// order (body before query). Recorded per handler at decoration
    /// time by the documentation builder.
    pub fn doc_entries(&self) -> Vec<DocEntry> {
        let mut entries = Vec::new();
        if let Some(schema) = &self.body {
            entries.push(DocEntry::request_body(schema.clone()));
        }
        if let Some(schema) = &self.query {
            entries.push(DocEntry::query_parameters(schema.clone()));
        }
        entries
    }

    /// Validate one request. Runs exactly once per request.
    pub fn bind(
        &self,
        body: Option<&[u8]>,
        query: &[(String, String)],
    ) -> Result<BoundRequest, BindError> {
        let payload = match &self.body {
            Some(schema) => {
                let bytes = body.unwrap_or_default();
                let raw: Value = serde_json::from_slice(bytes).map_err(|err| {
                    ValidationFailure::single("", format!("invalid JSON body: {err}"))
                })?;
                Some(schema.load(&raw)?)
            }
            None => {
                if body.is_some_and(|bytes| !bytes.is_empty()) {
                    return Err(BindError::Config(
                        "a body model must be declared for handlers that receive request bodies"
                            .to_string(),
                    ));
                }
                None
            }
        };

        let query_args = match &self.query {
            Some(schema) => Some(schema.load_query(query)?),
            None => None,
        };

        Ok(BoundRequest {
            payload,
            query_args,
        })
    }
}

impl Default for RequestContract {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::DocLocation;
    use crate::model::{FieldDef, FieldType};
    use serde_json::json;

    fn post_model() -> Arc<ModelDef> {
        ModelDef::builder("BrandPostRequest")
            .field(FieldDef::new("code", FieldType::String).default_value(json!("")))
            .field(FieldDef::new("name", FieldType::String).default_value(json!("")))
            .field(FieldDef::new("is_active", FieldType::Boolean).default_value(json!(true)))
            .build()
    }

    fn query_model() -> Arc<ModelDef> {
        ModelDef::builder("BrandListQuery")
            .field(FieldDef::new("page", FieldType::Integer).default_value(json!(1)))
            .build()
    }

    #[test]
    fn binds_body_with_defaults_filled() {
        let contract = RequestContract::new().body(&post_model(), SchemaOptions::default());
        let bound = contract
            .bind(Some(br#"{"code":"ACME"}"#), &[])
            .expect("bind should succeed");
        assert_eq!(
            bound.payload,
            Some(json!({"code": "ACME", "name": "", "is_active": true}))
        );
        assert!(bound.query_args.is_none());
    }

    #[test]
    fn wrong_typed_body_field_is_a_validation_failure() {
        let contract = RequestContract::new().body(&post_model(), SchemaOptions::default());
        let err = contract.bind(Some(br#"{"code":123}"#), &[]).unwrap_err();
        match err {
            BindError::Validation(failure) => assert!(failure.cites("code")),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_validation_failure() {
        let contract = RequestContract::new().body(&post_model(), SchemaOptions::default());
        let err = contract.bind(Some(b"not json"), &[]).unwrap_err();
        assert!(matches!(err, BindError::Validation(_)));
    }

    #[test]
    fn undeclared_body_with_content_is_a_config_error() {
        let contract = RequestContract::new().query(&query_model(), SchemaOptions::default());
        let err = contract.bind(Some(br#"{"code":"ACME"}"#), &[]).unwrap_err();
        assert!(
            matches!(err, BindError::Config(_)),
            "expected config error, got {err:?}"
        );
    }

    #[test]
    fn undeclared_body_without_content_binds() {
        let contract = RequestContract::new().query(&query_model(), SchemaOptions::default());
        assert!(contract.bind(None, &[]).is_ok());
        assert!(contract.bind(Some(b""), &[]).is_ok());
    }

    #[test]
    fn binds_query_args_with_coercion() {
        let contract = RequestContract::new().query(&query_model(), SchemaOptions::default());
        let pairs = vec![("page".to_string(), "3".to_string())];
        let bound = contract.bind(None, &pairs).unwrap();
        assert_eq!(bound.query_args, Some(json!({"page": 3})));
    }

    #[test]
    fn doc_entries_cover_declared_models_in_order() {
        let contract = RequestContract::new()
            .body(&post_model(), SchemaOptions::default())
            .query(&query_model(), SchemaOptions::default());
        let entries = contract.doc_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].location, DocLocation::RequestBody);
        assert_eq!(entries[1].location, DocLocation::QueryParameters);
    }

    #[test]
    fn contract_without_models_has_no_doc_entries() {
        assert!(RequestContract::new().doc_entries().is_empty());
    }
}
