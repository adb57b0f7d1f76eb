//! Versioned query compiler for vds.
//!
//! A query document is a JSON object with an optional free-text `search` and an optional
//! `filters` tree of groups (`and`, `or`, `not`) and terms (`string_equals`, `number_range`,
//! `geo_named_area`, ...). This crate:
//!
//! - **Parses** documents into a typed model ([`QueryDocument`], [`Filter`]).
//! - **Translates** them into a backend-neutral [`QueryNode`] tree ([`Translator`]), which
//!   [`es::to_json`] renders as an Elasticsearch query.
//! - **Hashes** them into an order-insensitive cache key ([`hash_query`]).
//! - **Dispatches** by schema version through a [`SchemaRegistry`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use vds_geo::GeoRegions;
//! use vds_query::{FieldNames, SchemaRegistry};
//!
//! let registry = SchemaRegistry::new(Arc::new(GeoRegions::empty()), FieldNames::default());
//! let schema = registry.get("v1.0.0").unwrap();
//!
//! let query = json!({"filters": {"string_equals": {"fields": ["genus"], "value": "Rosa"}}});
//! let tree = schema.translate(&query).unwrap();
//! assert_eq!(tree.to_string(), "Term(data.genus, \"Rosa\")\n");
//! assert_eq!(schema.hash(&query).unwrap().len(), 40);
//! ```

#![warn(missing_docs)]

mod document;
mod error;
pub mod es;
mod fields;
mod geometry;
mod hash;
mod node;
mod schema;
mod translate;

pub use document::{
    Coordinates, CustomArea, Exists, Filter, GeoPoint, NamedArea, NumberEquals, NumberRange,
    Operator, QueryDocument, StringContains, StringEquals,
};
pub use error::QueryError;
pub use fields::FieldNames;
pub use geometry::{canonical_multipolygon, multipolygon_query};
pub use hash::{canonical_string, hash_query};
pub use node::{QueryNode, RangeBounds, TermValue};
pub use schema::{QuerySchema, SchemaRegistry, V1_0_0, V1_0_0Schema};
pub use translate::Translator;
