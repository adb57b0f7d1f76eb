//! Versioned query schemas.
//!
//! Callers hand a raw JSON document and a schema version to the [`SchemaRegistry`]; the
//! registry picks the matching [`QuerySchema`] which validates, translates or hashes it.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;
use tracing::debug;
use vds_geo::GeoRegions;

use crate::{
    FieldNames, QueryError, QueryNode, document::QueryDocument, hash::hash_query,
    translate::Translator,
};

/// Version string of the first query schema.
pub const V1_0_0: &str = "v1.0.0";

/// Operations every query schema version provides.
pub trait QuerySchema: Send + Sync {
    /// The version string this schema handles, e.g. `v1.0.0`.
    fn version(&self) -> &str;

    /// Checks that `query` is a well-formed document for this version.
    ///
    /// This is structural validation only: the document must parse into the typed model and
    /// every named area must exist. JSON-schema validation happens upstream.
    fn validate(&self, query: &Value) -> Result<(), QueryError>;

    /// Compiles `query` into a query tree.
    fn translate(&self, query: &Value) -> Result<QueryNode, QueryError>;

    /// Returns the cache key for `query`.
    fn hash(&self, query: &Value) -> Result<String, QueryError>;
}

/// The `v1.0.0` query schema.
#[derive(Debug, Clone)]
pub struct V1_0_0Schema {
    /// Shared named-area lookup.
    regions: Arc<GeoRegions>,
    /// Field naming conventions.
    fields: FieldNames,
}

impl V1_0_0Schema {
    /// Creates the schema over a region lookup and field conventions.
    pub fn new(regions: Arc<GeoRegions>, fields: FieldNames) -> Self {
        Self { regions, fields }
    }

    /// Returns a translator borrowing this schema's lookup.
    fn translator(&self) -> Translator<'_> {
        Translator::new(&self.regions, &self.fields)
    }
}

impl QuerySchema for V1_0_0Schema {
    fn version(&self) -> &str {
        V1_0_0
    }

    fn validate(&self, query: &Value) -> Result<(), QueryError> {
        let document = QueryDocument::from_value(query)?;
        if let Some(filters) = &document.filters {
            for area in filters.named_areas() {
                if self.regions.get(&area.category, &area.name).is_none() {
                    return Err(QueryError::UnknownRegion {
                        category: area.category.clone(),
                        name: area.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn translate(&self, query: &Value) -> Result<QueryNode, QueryError> {
        let document = QueryDocument::from_value(query)?;
        self.translator().translate(&document)
    }

    fn hash(&self, query: &Value) -> Result<String, QueryError> {
        let document = QueryDocument::from_value(query)?;
        Ok(hash_query(&document))
    }
}

/// Maps version strings to schemas.
pub struct SchemaRegistry {
    /// Registered schemas, keyed by version string.
    schemas: BTreeMap<String, Arc<dyn QuerySchema>>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("versions", &self.versions())
            .finish()
    }
}

impl SchemaRegistry {
    /// Creates a registry holding every built-in schema version.
    pub fn new(regions: Arc<GeoRegions>, fields: FieldNames) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(V1_0_0Schema::new(regions, fields)));
        registry
    }

    /// Creates a registry with no schemas.
    pub fn empty() -> Self {
        Self {
            schemas: BTreeMap::new(),
        }
    }

    /// Adds a schema, replacing any already registered for the same version.
    pub fn register(&mut self, schema: Arc<dyn QuerySchema>) {
        self.schemas.insert(schema.version().to_string(), schema);
    }

    /// Returns the schema for `version`.
    pub fn get(&self, version: &str) -> Result<Arc<dyn QuerySchema>, QueryError> {
        debug!(version, "dispatching to query schema");
        self.schemas
            .get(version)
            .cloned()
            .ok_or_else(|| QueryError::UnsupportedVersion(version.to_string()))
    }

    /// Returns the newest registered version.
    pub fn latest_version(&self) -> Option<&str> {
        self.schemas
            .keys()
            .max_by_key(|version| version_key(version))
            .map(String::as_str)
    }

    /// Returns the newest registered schema.
    pub fn latest(&self) -> Result<Arc<dyn QuerySchema>, QueryError> {
        match self.latest_version() {
            Some(version) => self.get(version),
            None => Err(QueryError::UnsupportedVersion("latest".to_string())),
        }
    }

    /// Returns the schema for `version`, or the newest one when no version is given.
    pub fn get_or_latest(&self, version: Option<&str>) -> Result<Arc<dyn QuerySchema>, QueryError> {
        match version {
            Some(version) => self.get(version),
            None => self.latest(),
        }
    }

    /// Registered versions, oldest first.
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        versions.sort_by_key(|version| version_key(version));
        versions
    }
}

/// Numeric sort key for a `vMAJOR.MINOR.PATCH` version string.
///
/// Components that are not numbers sort first.
fn version_key(version: &str) -> Vec<u64> {
    version
        .trim_start_matches('v')
        .split('.')
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vds_geo::{RegionCategory, RegionSet};

    use super::*;

    /// A schema that only reports its version.
    struct Fake(&'static str);

    impl QuerySchema for Fake {
        fn version(&self) -> &str {
            self.0
        }

        fn validate(&self, _query: &Value) -> Result<(), QueryError> {
            Ok(())
        }

        fn translate(&self, _query: &Value) -> Result<QueryNode, QueryError> {
            Ok(QueryNode::MatchAll)
        }

        fn hash(&self, _query: &Value) -> Result<String, QueryError> {
            Ok(self.0.to_string())
        }
    }

    fn regions() -> Arc<GeoRegions> {
        let source = r#"{"type": "FeatureCollection", "features": [{
            "type": "Feature",
            "properties": {"NAME": "atlantis"},
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}
        }]}"#;
        let set = RegionSet::parse(source, "inline", &["NAME".to_string()]).unwrap();
        Arc::new(
            GeoRegions::builder()
                .insert(RegionCategory::Country, set)
                .build(),
        )
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new(regions(), FieldNames::default())
    }

    #[test]
    fn builtin_version_is_registered() {
        let registry = registry();
        assert_eq!(registry.versions(), vec![V1_0_0]);
        assert_eq!(registry.latest_version(), Some(V1_0_0));
        assert_eq!(registry.get(V1_0_0).unwrap().version(), V1_0_0);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = registry().get("v9.9.9").err().unwrap();
        assert_eq!(err, QueryError::UnsupportedVersion("v9.9.9".to_string()));
    }

    #[test]
    fn latest_uses_numeric_ordering() {
        let mut registry = SchemaRegistry::empty();
        registry.register(Arc::new(Fake("v1.2.0")));
        registry.register(Arc::new(Fake("v1.10.0")));
        registry.register(Arc::new(Fake("v1.9.3")));
        assert_eq!(registry.latest_version(), Some("v1.10.0"));
        assert_eq!(registry.versions(), vec!["v1.2.0", "v1.9.3", "v1.10.0"]);
        assert_eq!(
            registry.get_or_latest(None).unwrap().version(),
            "v1.10.0"
        );
        assert_eq!(
            registry.get_or_latest(Some("v1.2.0")).unwrap().version(),
            "v1.2.0"
        );
    }

    #[test]
    fn empty_registry_has_no_latest() {
        let registry = SchemaRegistry::empty();
        assert!(registry.latest_version().is_none());
        assert!(registry.latest().is_err());
    }

    #[test]
    fn validate_resolves_named_areas() {
        let schema = registry().latest().unwrap();
        assert!(
            schema
                .validate(&json!({"filters": {"geo_named_area": {"country": "Atlantis"}}}))
                .is_ok()
        );
        assert_eq!(
            schema
                .validate(&json!({"filters": {"geo_named_area": {"country": "Nowhereland"}}}))
                .unwrap_err(),
            QueryError::UnknownRegion {
                category: "country".to_string(),
                name: "Nowhereland".to_string(),
            }
        );
    }

    #[test]
    fn validate_rejects_unknown_operators() {
        let schema = registry().latest().unwrap();
        let err = schema
            .validate(&json!({"filters": {"regex": {"fields": ["a"]}}}))
            .unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedOperator { .. }));
    }

    #[test]
    fn translate_and_hash_go_through_the_document_model() {
        let schema = registry().latest().unwrap();
        let query = json!({"search": "rosa"});
        assert!(matches!(
            schema.translate(&query).unwrap(),
            QueryNode::MatchText { .. }
        ));
        assert_eq!(schema.hash(&query).unwrap().len(), 40);
    }
}
