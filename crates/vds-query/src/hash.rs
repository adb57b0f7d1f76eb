//! Stable query hashing.
//!
//! Every document is reduced to a canonical string that ignores the order of group members,
//! field lists and polygon holes, then digested with SHA-1. Two documents that differ only in
//! those orderings produce the same key; anything else changes it.
//!
//! The canonical forms are part of the cache-key contract. Changing any of them invalidates
//! every stored key.

use sha1::{Digest, Sha1};

use crate::{
    document::{Filter, NumberRange, QueryDocument},
    geometry::canonical_multipolygon,
};

/// Hashes a document, returning a 40-character lowercase hex digest.
///
/// `search:<text>` and `filters:<canonical>` are fed into one digest, in that order, when
/// present.
pub fn hash_query(document: &QueryDocument) -> String {
    let mut hasher = Sha1::new();
    if let Some(search) = &document.search {
        hasher.update(b"search:");
        hasher.update(search.as_bytes());
    }
    if let Some(filters) = &document.filters {
        hasher.update(b"filters:");
        hasher.update(canonical_string(filters).as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Returns the canonical string for a group or term.
pub fn canonical_string(filter: &Filter) -> String {
    match filter {
        Filter::And(members) | Filter::Or(members) | Filter::Not(members) => {
            let members: Vec<String> = members.iter().map(canonical_string).collect();
            format!("{}:[{}]", filter.operator(), sorted_join(members, "|"))
        }
        Filter::StringEquals(term) => format!(
            "string_equals:{};{}",
            sorted_fields(&term.fields),
            term.value
        ),
        Filter::StringContains(term) => format!(
            "string_contains:{};{}",
            sorted_fields(&term.fields),
            term.value
        ),
        Filter::NumberEquals(term) => format!(
            "number_equals:{};{}",
            sorted_fields(&term.fields),
            term.value
        ),
        Filter::NumberRange(term) => canonical_range(term),
        Filter::Exists(term) if term.geo_field => "geo_exists".to_string(),
        Filter::Exists(term) => format!("exists:{}", sorted_fields(&term.fields)),
        Filter::GeoPoint(term) => format!(
            "geo_point:{}{};{};{}",
            term.radius, term.radius_unit, term.latitude, term.longitude
        ),
        Filter::GeoNamedArea(area) => format!("geo_named_area:{};{}", area.category, area.name),
        Filter::GeoCustomArea(custom) => {
            format!("geo_custom_area:{}", canonical_multipolygon(&custom.coordinates))
        }
    }
}

/// `number_range:<fields>;` followed by `<`/`<=` and `>`/`>=` bounds when present.
fn canonical_range(term: &NumberRange) -> String {
    let mut canonical = format!("number_range:{};", sorted_fields(&term.fields));
    if let Some(less_than) = &term.less_than {
        canonical.push('<');
        if term.less_than_inclusive {
            canonical.push('=');
        }
        canonical.push_str(&less_than.to_string());
    }
    if let Some(greater_than) = &term.greater_than {
        canonical.push('>');
        if term.greater_than_inclusive {
            canonical.push('=');
        }
        canonical.push_str(&greater_than.to_string());
    }
    canonical
}

/// Field names sorted and comma-joined.
fn sorted_fields(fields: &[String]) -> String {
    sorted_join(fields.to_vec(), ",")
}

/// Sorts the parts lexicographically and joins them.
fn sorted_join(mut parts: Vec<String>, separator: &str) -> String {
    parts.sort();
    parts.join(separator)
}
