//! # brandsvc-contract — Declarative Request/Response Contracts
//!
//! The contract layer between wire data and typed values:
//!
//! | Module         | Concern                                              |
//! |----------------|------------------------------------------------------|
//! | [`model`]      | Declarative data-shape definitions                   |
//! | [`schema`]     | Derived validator/serializer pairs (load/dump)       |
//! | [`binder`]     | Request body/query binding ahead of the handler      |
//! | [`serializer`] | Handler return value → wire-shaped response body     |
//! | [`registry`]   | Deduplicating schema-name table for documentation    |
//! | [`docs`]       | Documentation entries and OpenAPI assembly           |
//! | [`claims`]     | Signed session-token cookie → typed claims           |
//! | [`error`]      | Aggregated, field-addressed validation failures      |
//!
//! ## Control flow
//!
//! Contracts are built once per handler at route-binding time; binding
//! and serialization run once per request, synchronously, with no
//! suspension points. Documentation entries are a decoration-time side
//! effect and never alter runtime behavior.
//!
//! ## Crate policy
//!
//! - Transport-agnostic: no HTTP framework types cross this boundary.
//!   The routing layer feeds raw body bytes and query pairs in, and maps
//!   typed failures to wire-level error responses on the way out.
//! - Failures are never swallowed and never substituted with defaults;
//!   load/dump is all-or-nothing.

pub mod binder;
pub mod claims;
pub mod docs;
pub mod error;
pub mod model;
pub mod registry;
pub mod schema;
pub mod serializer;

pub use binder::{BindError, BoundRequest, RequestContract};
pub use claims::{claims_from_cookie, ClaimsError, UserClaims, SESSION_COOKIE};
pub use docs::{ApiDocBuilder, DocEntry, DocError, DocLocation, HandlerDocs};
pub use error::{FieldIssue, ValidationFailure};
pub use model::{Constraint, FieldDef, FieldType, ModelDef};
pub use registry::{ResolvedName, SchemaRegistry};
pub use schema::{Schema, SchemaOptions, UnknownFieldPolicy};
pub use serializer::ResponseContract;
