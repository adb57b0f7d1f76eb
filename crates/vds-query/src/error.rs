//! Error types for query parsing, translation and hashing.

use thiserror::Error;

/// Errors raised while handling a query document.
///
/// None of these are retried: they describe a problem with the caller's input (or, for
/// `UnsupportedVersion`, the caller's choice of schema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query text is not valid JSON.
    #[error("query is not valid JSON: {0}")]
    InvalidJson(String),

    /// A node is structurally wrong: not exactly one operator key, missing or mistyped options,
    /// or an empty group.
    #[error("malformed query at {path}: {message}")]
    MalformedQuery {
        /// Location of the offending node, e.g. `filters.and[1].string_equals`.
        path: String,
        /// What is wrong with it.
        message: String,
    },

    /// A node names an operator that this schema version does not define.
    #[error("unsupported operator '{operator}' at {path}")]
    UnsupportedOperator {
        /// Location of the offending node.
        path: String,
        /// The operator name as given.
        operator: String,
    },

    /// A `geo_named_area` references an area that is not in the region lookup.
    #[error("unknown region '{name}' in category '{category}'")]
    UnknownRegion {
        /// The requested category.
        category: String,
        /// The requested display name.
        name: String,
    },

    /// No schema is registered for the requested version.
    #[error("unsupported query schema version: {0}")]
    UnsupportedVersion(String),
}

impl QueryError {
    /// Creates a malformed-query error for the node at `path`.
    pub fn malformed(path: &str, message: impl Into<String>) -> Self {
        Self::MalformedQuery {
            path: display_path(path),
            message: message.into(),
        }
    }
}

/// Renders the document root as `<root>` rather than an empty string.
fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_includes_path() {
        let err = QueryError::malformed("filters.and[0]", "expected exactly one operator");
        assert_eq!(
            err.to_string(),
            "malformed query at filters.and[0]: expected exactly one operator"
        );
    }

    #[test]
    fn root_path_is_named() {
        let err = QueryError::malformed("", "query must be a JSON object");
        assert!(err.to_string().contains("<root>"));
    }

    #[test]
    fn unknown_region_display() {
        let err = QueryError::UnknownRegion {
            category: "country".to_string(),
            name: "Nowhereland".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown region 'Nowhereland' in category 'country'"
        );
    }
}
