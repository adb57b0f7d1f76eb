//! vds: versioned query documents.
//!
//! Compiles JSON query documents (free-text search plus a tree of typed filters) into search
//! engine queries, and derives stable cache keys from them. Named geographic areas used by
//! `geo_named_area` filters are loaded from GeoJSON boundary files at startup.

#![warn(missing_docs)]

pub mod cli;
