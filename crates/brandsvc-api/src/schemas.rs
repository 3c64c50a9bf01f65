//! # Brand Wire Models
//!
//! Declarative model definitions for every brand endpoint, plus the
//! request/response contracts derived from them. Contracts are built
//! once at router-assembly time and shared with handlers via
//! `Extension` — schemas are never derived per request.
//!
//! Response envelopes are distinct models even where they share
//! structure: documentation identity keys on the declared name, so
//! `BrandGetResponse` and `BrandPostResponse` each appear in the
//! generated document.

use std::sync::Arc;

use brandsvc_contract::{
    FieldDef, FieldType, ModelDef, RequestContract, ResponseContract, SchemaOptions,
};
use serde_json::json;

/// Maximum accepted length for a brand code, in characters.
pub const CODE_MAX_LENGTH: usize = 250;

/// Largest page size a list query may request.
pub const PER_PAGE_MAX: i64 = 100;

/// All brand model definitions, built once.
#[derive(Debug, Clone)]
pub struct BrandModels {
    /// The brand resource itself, nested inside response envelopes.
    pub brand: Arc<ModelDef>,
    pub list_query: Arc<ModelDef>,
    pub list_response: Arc<ModelDef>,
    pub get_response: Arc<ModelDef>,
    pub post_request: Arc<ModelDef>,
    pub post_response: Arc<ModelDef>,
    pub patch_request: Arc<ModelDef>,
    pub patch_response: Arc<ModelDef>,
    pub delete_response: Arc<ModelDef>,
}

impl BrandModels {
    pub fn new() -> Self {
        let brand = ModelDef::builder("Brand")
            .field(FieldDef::new("id", FieldType::Integer))
            .field(FieldDef::new("code", FieldType::String))
            .field(FieldDef::new("name", FieldType::String))
            .field(FieldDef::new("is_active", FieldType::Boolean))
            .build();

        let list_query = ModelDef::builder("BrandListQuery")
            .field(FieldDef::new("page", FieldType::Integer).default_value(json!(1)))
            .field(
                FieldDef::new("per_page", FieldType::Integer)
                    .default_value(json!(PER_PAGE_MAX))
                    .range(None, Some(PER_PAGE_MAX)),
            )
            .field(
                FieldDef::new("code", FieldType::String)
                    .default_value(json!(""))
                    .max_length(CODE_MAX_LENGTH),
            )
            .field(FieldDef::new("name", FieldType::String).default_value(json!("")))
            .field(
                FieldDef::new("is_active", FieldType::Optional(Box::new(FieldType::Boolean)))
                    .default_value(json!(null)),
            )
            .build();

        let list_response = ModelDef::builder("BrandListResponse")
            .field(FieldDef::new(
                "data",
                FieldType::List(Box::new(FieldType::Nested(Arc::clone(&brand)))),
            ))
            .field(FieldDef::new("page_num", FieldType::Integer))
            .field(FieldDef::new("page_size", FieldType::Integer))
            .field(FieldDef::new("total_pages", FieldType::Integer))
            .build();

        let write_fields = |name: &str| {
            ModelDef::builder(name)
                .field(
                    FieldDef::new("code", FieldType::String)
                        .default_value(json!(""))
                        .max_length(CODE_MAX_LENGTH),
                )
                .field(FieldDef::new("name", FieldType::String).default_value(json!("")))
                .field(FieldDef::new("is_active", FieldType::Boolean).default_value(json!(true)))
                .build()
        };

        let envelope = |name: &str| {
            ModelDef::builder(name)
                .field(FieldDef::new(
                    "data",
                    FieldType::Nested(Arc::clone(&brand)),
                ))
                .build()
        };

        let delete_response = ModelDef::builder("BrandDeleteResponse")
            .field(FieldDef::new("data", FieldType::String))
            .build();

        Self {
            list_query,
            list_response,
            get_response: envelope("BrandGetResponse"),
            post_request: write_fields("BrandPostRequest"),
            post_response: envelope("BrandPostResponse"),
            patch_request: write_fields("BrandPatchRequest"),
            patch_response: envelope("BrandPatchResponse"),
            delete_response,
            brand,
        }
    }
}

impl Default for BrandModels {
    fn default() -> Self {
        Self::new()
    }
}

/// Request/response contracts for every brand handler, built once at
/// router-assembly time.
#[derive(Debug, Clone)]
pub struct BrandContracts {
    pub models: BrandModels,
    pub list: RequestContract,
    pub list_response: ResponseContract,
    pub get_response: ResponseContract,
    pub create: RequestContract,
    pub create_response: ResponseContract,
    pub update: RequestContract,
    pub update_response: ResponseContract,
    pub delete_response: ResponseContract,
}

impl BrandContracts {
    pub fn new() -> Self {
        let models = BrandModels::new();
        Self {
            list: RequestContract::new().query(&models.list_query, SchemaOptions::default()),
            list_response: ResponseContract::new(&models.list_response)
                .description("Paginated brand list"),
            get_response: ResponseContract::new(&models.get_response).description("One brand"),
            create: RequestContract::new().body(&models.post_request, SchemaOptions::default()),
            create_response: ResponseContract::new(&models.post_response)
                .description("Created brand"),
            update: RequestContract::new().body(&models.patch_request, SchemaOptions::default()),
            update_response: ResponseContract::new(&models.patch_response)
                .description("Updated brand"),
            delete_response: ResponseContract::new(&models.delete_response)
                .description("Deletion confirmation"),
            models,
        }
    }
}

impl Default for BrandContracts {
    fn default() -> Self {
        Self::new()
    }
}
