//! # Documentation Entries & OpenAPI Assembly
//!
//! Pure metadata attachment: request binders and response serializers
//! record [`DocEntry`] values at decoration time, and [`ApiDocBuilder`]
//! later folds them into an OpenAPI document through utoipa's
//! programmatic builders (model definitions are runtime values, so the
//! derive macros don't apply). Removing documentation assembly never
//! changes runtime behavior, only documentation completeness.
//!
//! Body and response models land in the document's components exactly
//! once each, deduplicated by declared name via [`SchemaRegistry`];
//! later references are emitted as `$ref` only. Query models are
//! expanded into individual query parameters instead of components.

use std::collections::BTreeMap;

use thiserror::Error;
use utoipa::openapi::path::{OperationBuilder, ParameterBuilder, ParameterIn};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::{
    ArrayBuilder, ComponentsBuilder, Content, InfoBuilder, ObjectBuilder, OpenApi, OpenApiBuilder,
    PathItem, PathItemType, PathsBuilder, Ref, RefOr, Required, ResponseBuilder,
    Schema as ApiSchema, SchemaType,
};

use crate::model::{Constraint, FieldDef, FieldType, ModelDef};
use crate::registry::{ResolvedName, SchemaRegistry};
use crate::schema::Schema;

/// Where a documented schema applies for a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocLocation {
    RequestBody,
    QueryParameters,
    Response,
}

/// A (location, schema-reference) record attached to a handler for later
/// extraction by the documentation builder.
#[derive(Debug, Clone)]
pub struct DocEntry {
    pub location: DocLocation,
    pub schema: Schema,
    /// Response-only: the wire shape is a sequence of the schema's model.
    pub many: bool,
    /// Response-only: status-code key ("200", "default", ...).
    pub status_code: Option<String>,
    /// Response-only: human description.
    pub description: Option<String>,
}

impl DocEntry {
    pub fn request_body(schema: Schema) -> Self {
        Self {
            location: DocLocation::RequestBody,
            schema,
            many: false,
            status_code: None,
            description: None,
        }
    }

    pub fn query_parameters(schema: Schema) -> Self {
        Self {
            location: DocLocation::QueryParameters,
            schema,
            many: false,
            status_code: None,
            description: None,
        }
    }

    pub fn response(
        schema: Schema,
        many: bool,
        status_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            location: DocLocation::Response,
            schema,
            many,
            status_code: Some(status_code.into()),
            description: Some(description.into()),
        }
    }
}

/// A documentation mistake detected while attaching entries. These are
/// programming errors surfaced at start-up, not request failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocError {
    #[error("duplicate response documentation for status code {0}")]
    DuplicateResponse(String),
}

/// Per-handler collection of documentation entries.
#[derive(Debug, Clone, Default)]
pub struct HandlerDocs {
    entries: Vec<DocEntry>,
}

impl HandlerDocs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an entry. Two responses for the same status-code key on one
    /// handler are rejected.
    pub fn attach(&mut self, entry: DocEntry) -> Result<(), DocError> {
        if entry.location == DocLocation::Response {
            if let Some(code) = &entry.status_code {
                let duplicate = self.entries.iter().any(|e| {
                    e.location == DocLocation::Response && e.status_code.as_deref() == Some(code)
                });
                if duplicate {
                    return Err(DocError::DuplicateResponse(code.clone()));
                }
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Attach every entry from an iterator (binder + serializer output).
    pub fn attach_all(
        &mut self,
        entries: impl IntoIterator<Item = DocEntry>,
    ) -> Result<(), DocError> {
        for entry in entries {
            self.attach(entry)?;
        }
        Ok(())
    }

    pub fn entries(&self) -> &[DocEntry] {
        &self.entries
    }
}

/// Assembles handler documentation into a single OpenAPI document.
///
/// Owns the [`SchemaRegistry`]; construct one builder at start-up, feed
/// it every route's [`HandlerDocs`], and build once.
pub struct ApiDocBuilder {
    title: String,
    version: String,
    registry: SchemaRegistry,
    components: Vec<(String, RefOr<ApiSchema>)>,
    operations: Vec<(String, PathItemType, utoipa::openapi::path::Operation)>,
}

impl ApiDocBuilder {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            registry: SchemaRegistry::new(),
            components: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// The registry backing component deduplication.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Record one handler's documentation under a method + path + tag.
    pub fn operation(
        &mut self,
        method: PathItemType,
        path: impl Into<String>,
        tag: &str,
        docs: &HandlerDocs,
    ) {
        let mut op = OperationBuilder::new().tag(tag);
        for entry in docs.entries() {
            match entry.location {
                DocLocation::RequestBody => {
                    let name = self.register_model(entry.schema.model());
                    op = op.request_body(Some(
                        RequestBodyBuilder::new()
                            .content(
                                "application/json",
                                Content::new(Ref::from_schema_name(&name)),
                            )
                            .required(Some(Required::True))
                            .build(),
                    ));
                }
                DocLocation::QueryParameters => {
                    for field in entry.schema.model().fields() {
                        let required = field.default().is_none()
                            && !matches!(field.ty(), FieldType::Optional(_));
                        op = op.parameter(
                            ParameterBuilder::new()
                                .name(field.name())
                                .parameter_in(ParameterIn::Query)
                                .required(if required {
                                    Required::True
                                } else {
                                    Required::False
                                })
                                .schema(Some(self.field_schema(field)))
                                .build(),
                        );
                    }
                }
                DocLocation::Response => {
                    let name = self.register_model(entry.schema.model());
                    let schema_ref: RefOr<ApiSchema> = if entry.many {
                        ArrayBuilder::new()
                            .items(Ref::from_schema_name(&name))
                            .build()
                            .into()
                    } else {
                        Ref::from_schema_name(&name).into()
                    };
                    let status = entry.status_code.as_deref().unwrap_or("200").to_string();
                    op = op.response(
                        status,
                        ResponseBuilder::new()
                            .description(entry.description.clone().unwrap_or_default())
                            .content("application/json", Content::new(schema_ref))
                            .build(),
                    );
                }
            }
        }
        self.operations.push((path.into(), method, op.build()));
    }

    /// Build the OpenAPI document. Operations on the same path merge into
    /// one path item.
    pub fn build(self) -> OpenApi {
        let mut items: BTreeMap<String, PathItem> = BTreeMap::new();
        for (path, method, operation) in self.operations {
            match items.get_mut(&path) {
                Some(item) => {
                    item.operations.insert(method, operation);
                }
                None => {
                    items.insert(path, PathItem::new(method, operation));
                }
            }
        }
        let mut paths = PathsBuilder::new();
        for (path, item) in items {
            paths = paths.path(path, item);
        }

        let mut components = ComponentsBuilder::new();
        for (name, schema) in self.components {
            components = components.schema(name, schema);
        }

        OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title(self.title.clone())
                    .version(self.version.clone())
                    .build(),
            )
            .paths(paths.build())
            .components(Some(components.build()))
            .build()
    }

    /// Register a model as a component schema, once per declared name.
    /// Returns the component name to reference.
    fn register_model(&mut self, model: &ModelDef) -> String {
        let name = model.name().to_string();
        if let ResolvedName::First(_) = self.registry.resolve_name(&name) {
            let object = self.model_object(model);
            self.components.push((name.clone(), object));
        }
        name
    }

    fn model_object(&mut self, model: &ModelDef) -> RefOr<ApiSchema> {
        let mut object = ObjectBuilder::new();
        for field in model.fields() {
            let schema = self.field_schema(field);
            object = object.property(field.name(), schema);
            if field.default().is_none() && !matches!(field.ty(), FieldType::Optional(_)) {
                object = object.required(field.name());
            }
        }
        RefOr::T(ApiSchema::Object(object.build()))
    }

    fn field_schema(&mut self, field: &FieldDef) -> RefOr<ApiSchema> {
        self.type_schema(field.ty(), field)
    }

    fn type_schema(&mut self, ty: &FieldType, field: &FieldDef) -> RefOr<ApiSchema> {
        match ty {
            FieldType::Integer => {
                let mut object = ObjectBuilder::new().schema_type(SchemaType::Integer);
                for constraint in field.constraints() {
                    if let Constraint::Range { min, max } = constraint {
                        object = object
                            .minimum(min.map(|m| m as f64))
                            .maximum(max.map(|m| m as f64));
                    }
                }
                if let Some(default) = field.default() {
                    object = object.default(Some(default.clone()));
                }
                object.build().into()
            }
            FieldType::String => {
                let mut object = ObjectBuilder::new().schema_type(SchemaType::String);
                for constraint in field.constraints() {
                    if let Constraint::MaxLength(max) = constraint {
                        object = object.max_length(Some(*max));
                    }
                }
                if let Some(default) = field.default() {
                    object = object.default(Some(default.clone()));
                }
                object.build().into()
            }
            FieldType::Boolean => {
                let mut object = ObjectBuilder::new().schema_type(SchemaType::Boolean);
                if let Some(default) = field.default() {
                    object = object.default(Some(default.clone()));
                }
                object.build().into()
            }
            FieldType::Optional(inner) => self.type_schema(inner, field),
            FieldType::List(inner) => ArrayBuilder::new()
                .items(self.type_schema(inner, field))
                .build()
                .into(),
            FieldType::Nested(model) => {
                let name = self.register_model(model);
                Ref::from_schema_name(name).into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDef, FieldType, ModelDef};
    use crate::schema::SchemaOptions;
    use serde_json::json;
    use std::sync::Arc;

    fn brand_model() -> Arc<ModelDef> {
        ModelDef::builder("Brand")
            .field(FieldDef::new("id", FieldType::Integer))
            .field(FieldDef::new("code", FieldType::String))
            .field(FieldDef::new("name", FieldType::String))
            .field(FieldDef::new("is_active", FieldType::Boolean))
            .build()
    }

    fn response_model() -> Arc<ModelDef> {
        ModelDef::builder("BrandResponse")
            .field(FieldDef::new("data", FieldType::Nested(brand_model())))
            .build()
    }

    fn schema(model: &Arc<ModelDef>) -> Schema {
        Schema::derive(model, SchemaOptions::default())
    }

    #[test]
    fn handler_docs_rejects_duplicate_response_status() {
        let mut docs = HandlerDocs::new();
        docs.attach(DocEntry::response(schema(&response_model()), false, "200", ""))
            .unwrap();
        let err = docs
            .attach(DocEntry::response(schema(&brand_model()), false, "200", ""))
            .unwrap_err();
        assert_eq!(err, DocError::DuplicateResponse("200".to_string()));
    }

    #[test]
    fn handler_docs_allows_distinct_response_statuses() {
        let mut docs = HandlerDocs::new();
        docs.attach(DocEntry::response(schema(&response_model()), false, "200", ""))
            .unwrap();
        docs.attach(DocEntry::response(schema(&brand_model()), false, "404", ""))
            .unwrap();
        assert_eq!(docs.entries().len(), 2);
    }

    #[test]
    fn shared_model_is_emitted_as_component_once() {
        let mut builder = ApiDocBuilder::new("Test API", "v1");

        let mut get_docs = HandlerDocs::new();
        get_docs
            .attach(DocEntry::response(schema(&response_model()), false, "200", ""))
            .unwrap();
        let mut post_docs = HandlerDocs::new();
        post_docs
            .attach(DocEntry::response(schema(&response_model()), false, "200", ""))
            .unwrap();

        builder.operation(PathItemType::Get, "/v1/brands/{id}", "brand", &get_docs);
        builder.operation(PathItemType::Post, "/v1/brands", "brand", &post_docs);

        let spec = builder.build();
        let schemas = &spec.components.as_ref().unwrap().schemas;
        // BrandResponse plus the nested Brand, each exactly once.
        assert!(schemas.contains_key("BrandResponse"));
        assert!(schemas.contains_key("Brand"));
        assert_eq!(schemas.len(), 2);
    }

    #[test]
    fn query_model_expands_into_parameters_not_components() {
        let query = ModelDef::builder("BrandListQuery")
            .field(FieldDef::new("page", FieldType::Integer).default_value(json!(1)))
            .field(
                FieldDef::new("per_page", FieldType::Integer)
                    .default_value(json!(100))
                    .range(None, Some(100)),
            )
            .build();
        let mut docs = HandlerDocs::new();
        docs.attach(DocEntry::query_parameters(schema(&query))).unwrap();

        let mut builder = ApiDocBuilder::new("Test API", "v1");
        builder.operation(PathItemType::Get, "/v1/brands", "brand", &docs);
        let spec = builder.build();

        assert!(!spec.components.as_ref().unwrap().schemas.contains_key("BrandListQuery"));
        let item = spec.paths.paths.get("/v1/brands").unwrap();
        let op = item.operations.get(&PathItemType::Get).unwrap();
        let params = op.parameters.as_ref().unwrap();
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["page", "per_page"]);
    }

    #[test]
    fn operations_on_one_path_merge_into_one_item() {
        let mut builder = ApiDocBuilder::new("Test API", "v1");
        let mut docs = HandlerDocs::new();
        docs.attach(DocEntry::response(schema(&response_model()), false, "200", ""))
            .unwrap();
        builder.operation(PathItemType::Get, "/v1/brands", "brand", &docs);
        builder.operation(PathItemType::Post, "/v1/brands", "brand", &docs);

        let spec = builder.build();
        assert_eq!(spec.paths.paths.len(), 1);
        let item = spec.paths.paths.get("/v1/brands").unwrap();
        assert_eq!(item.operations.len(), 2);
    }

    #[test]
    fn many_response_documents_an_array_of_refs() {
        let mut docs = HandlerDocs::new();
        docs.attach(DocEntry::response(schema(&brand_model()), true, "200", "all brands"))
            .unwrap();
        let mut builder = ApiDocBuilder::new("Test API", "v1");
        builder.operation(PathItemType::Get, "/v1/brands/all", "brand", &docs);
        let spec = builder.build();

        let json = serde_json::to_value(&spec).unwrap();
        let response = &json["paths"]["/v1/brands/all"]["get"]["responses"]["200"];
        let schema = &response["content"]["application/json"]["schema"];
        assert_eq!(schema["type"], json!("array"));
        assert_eq!(
            schema["items"]["$ref"],
            json!("#/components/schemas/Brand")
        );
    }

    #[test]
    fn spec_serializes_to_json() {
        let mut builder = ApiDocBuilder::new("Brand Service", "v1");
        let mut docs = HandlerDocs::new();
        docs.attach(DocEntry::response(schema(&response_model()), false, "200", ""))
            .unwrap();
        builder.operation(PathItemType::Get, "/v1/brands/{id}", "brand", &docs);
        let spec = builder.build();
        let text = serde_json::to_string(&spec).unwrap();
        assert!(text.contains("Brand Service"));
        assert!(text.contains("#/components/schemas/BrandResponse"));
    }
}
