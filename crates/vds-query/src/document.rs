//! Query documents.
//!
//! A query document is a JSON object with an optional free-text `search` and an optional
//! `filters` tree. Every node of the filter tree is an object with exactly one key, the operator
//! name, whose value holds that operator's options:
//!
//! ```json
//! {
//!   "search": "rosa",
//!   "filters": {"and": [
//!     {"string_equals": {"fields": ["genus"], "value": "Rosa"}},
//!     {"number_range": {"fields": ["year"], "greater_than": 2000}}
//!   ]}
//! }
//! ```
//!
//! Parsing checks structure only (one operator per node, required options present and typed);
//! schema validation of the raw document happens upstream.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Deserialize;
use serde_json::{Number, Value};
use vds_geo::MultiPolygon;

use crate::QueryError;

/// A parsed query document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDocument {
    /// Free-text search across all fields.
    pub search: Option<String>,
    /// Structured filter tree.
    pub filters: Option<Filter>,
}

impl QueryDocument {
    /// Parses a document from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self, QueryError> {
        let Value::Object(map) = value else {
            return Err(QueryError::malformed("", "query must be a JSON object"));
        };

        let mut document = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "search" => {
                    let text = value
                        .as_str()
                        .ok_or_else(|| QueryError::malformed("search", "expected a string"))?;
                    document.search = Some(text.to_string());
                }
                "filters" => document.filters = Some(Filter::from_value(value, "filters")?),
                other => {
                    return Err(QueryError::malformed(
                        "",
                        format!("unexpected key '{other}'"),
                    ));
                }
            }
        }
        Ok(document)
    }
}

impl FromStr for QueryDocument {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| QueryError::InvalidJson(e.to_string()))?;
        Self::from_value(&value)
    }
}

/// The operators defined by the v1.0.0 query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Every member must match.
    And,
    /// At least one member must match.
    Or,
    /// No member may match.
    Not,
    /// Exact string match on one or more fields.
    StringEquals,
    /// Full-text match on one or more fields (or all fields).
    StringContains,
    /// Exact numeric match.
    NumberEquals,
    /// Numeric range match.
    NumberRange,
    /// Field presence.
    Exists,
    /// Distance from a point.
    GeoPoint,
    /// Inside a named area.
    GeoNamedArea,
    /// Inside a caller-supplied multipolygon.
    GeoCustomArea,
}

impl Operator {
    /// Every operator, groups first.
    pub const ALL: [Self; 11] = [
        Self::And,
        Self::Or,
        Self::Not,
        Self::StringEquals,
        Self::StringContains,
        Self::NumberEquals,
        Self::NumberRange,
        Self::Exists,
        Self::GeoPoint,
        Self::GeoNamedArea,
        Self::GeoCustomArea,
    ];

    /// The operator's key in query documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::StringEquals => "string_equals",
            Self::StringContains => "string_contains",
            Self::NumberEquals => "number_equals",
            Self::NumberRange => "number_range",
            Self::Exists => "exists",
            Self::GeoPoint => "geo_point",
            Self::GeoNamedArea => "geo_named_area",
            Self::GeoCustomArea => "geo_custom_area",
        }
    }

    /// Looks an operator up by its document key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One node of the filter tree: a group or a term.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Conjunction of the members.
    And(Vec<Self>),
    /// Disjunction of the members.
    Or(Vec<Self>),
    /// Exclusion of every member.
    Not(Vec<Self>),
    /// `string_equals` term.
    StringEquals(StringEquals),
    /// `string_contains` term.
    StringContains(StringContains),
    /// `number_equals` term.
    NumberEquals(NumberEquals),
    /// `number_range` term.
    NumberRange(NumberRange),
    /// `exists` term.
    Exists(Exists),
    /// `geo_point` term.
    GeoPoint(GeoPoint),
    /// `geo_named_area` term.
    GeoNamedArea(NamedArea),
    /// `geo_custom_area` term.
    GeoCustomArea(CustomArea),
}

impl Filter {
    /// Parses a group or term from a JSON value.
    ///
    /// `path` locates the value within the document and is used in error messages.
    pub fn from_value(value: &Value, path: &str) -> Result<Self, QueryError> {
        let Value::Object(map) = value else {
            return Err(QueryError::malformed(
                path,
                "expected an object with a single operator key",
            ));
        };

        let mut entries = map.iter();
        let (Some((name, options)), None) = (entries.next(), entries.next()) else {
            return Err(QueryError::malformed(
                path,
                format!("expected exactly one operator key, found {}", map.len()),
            ));
        };

        let operator =
            Operator::from_name(name).ok_or_else(|| QueryError::UnsupportedOperator {
                path: path.to_string(),
                operator: name.clone(),
            })?;
        Self::parse_options(operator, options, &format!("{path}.{name}"))
    }

    /// The operator this node applies.
    pub fn operator(&self) -> Operator {
        match self {
            Self::And(_) => Operator::And,
            Self::Or(_) => Operator::Or,
            Self::Not(_) => Operator::Not,
            Self::StringEquals(_) => Operator::StringEquals,
            Self::StringContains(_) => Operator::StringContains,
            Self::NumberEquals(_) => Operator::NumberEquals,
            Self::NumberRange(_) => Operator::NumberRange,
            Self::Exists(_) => Operator::Exists,
            Self::GeoPoint(_) => Operator::GeoPoint,
            Self::GeoNamedArea(_) => Operator::GeoNamedArea,
            Self::GeoCustomArea(_) => Operator::GeoCustomArea,
        }
    }

    /// Collects every named area referenced anywhere in this subtree.
    pub fn named_areas(&self) -> Vec<&NamedArea> {
        let mut areas = Vec::new();
        self.collect_named_areas(&mut areas);
        areas
    }

    /// Recursive helper for [`Filter::named_areas`].
    fn collect_named_areas<'a>(&'a self, areas: &mut Vec<&'a NamedArea>) {
        match self {
            Self::And(members) | Self::Or(members) | Self::Not(members) => {
                for member in members {
                    member.collect_named_areas(areas);
                }
            }
            Self::GeoNamedArea(area) => areas.push(area),
            _ => {}
        }
    }

    /// Parses the options for a known operator.
    fn parse_options(operator: Operator, options: &Value, path: &str) -> Result<Self, QueryError> {
        let filter = match operator {
            Operator::And => Self::And(parse_group(options, path)?),
            Operator::Or => Self::Or(parse_group(options, path)?),
            Operator::Not => Self::Not(parse_group(options, path)?),
            Operator::StringEquals => {
                let term: StringEquals = parse_term(options, path)?;
                require_fields(&term.fields, path)?;
                Self::StringEquals(term)
            }
            // An empty field list searches the all-text field.
            Operator::StringContains => Self::StringContains(parse_term(options, path)?),
            Operator::NumberEquals => {
                let term: NumberEquals = parse_term(options, path)?;
                require_fields(&term.fields, path)?;
                Self::NumberEquals(term)
            }
            Operator::NumberRange => {
                let term: NumberRange = parse_term(options, path)?;
                require_fields(&term.fields, path)?;
                Self::NumberRange(term)
            }
            Operator::Exists => {
                let term: Exists = parse_term(options, path)?;
                if !term.geo_field {
                    require_fields(&term.fields, path)?;
                }
                Self::Exists(term)
            }
            Operator::GeoPoint => Self::GeoPoint(parse_term(options, path)?),
            Operator::GeoNamedArea => Self::GeoNamedArea(NamedArea::from_value(options, path)?),
            Operator::GeoCustomArea => Self::GeoCustomArea(CustomArea::from_value(options, path)?),
        };
        Ok(filter)
    }
}

/// Options for `string_equals`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringEquals {
    /// Logical field names; any may match.
    pub fields: Vec<String>,
    /// Exact value to match.
    pub value: String,
}

/// Options for `string_contains`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringContains {
    /// Logical field names; empty means all fields.
    pub fields: Vec<String>,
    /// Text that must appear (all words).
    pub value: String,
}

/// Options for `number_equals`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberEquals {
    /// Logical field names; any may match.
    pub fields: Vec<String>,
    /// Number to match.
    pub value: Number,
}

/// Options for `number_range`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberRange {
    /// Logical field names; any may match.
    pub fields: Vec<String>,
    /// Upper bound.
    #[serde(default)]
    pub less_than: Option<Number>,
    /// Whether the upper bound itself matches.
    #[serde(default = "default_inclusive")]
    pub less_than_inclusive: bool,
    /// Lower bound.
    #[serde(default)]
    pub greater_than: Option<Number>,
    /// Whether the lower bound itself matches.
    #[serde(default = "default_inclusive")]
    pub greater_than_inclusive: bool,
}

/// Options for `exists`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exists {
    /// Logical field names; any may be present.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Check the geo field instead of `fields`.
    #[serde(default)]
    pub geo_field: bool,
}

/// Options for `geo_point`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoPoint {
    /// Centre latitude.
    pub latitude: Number,
    /// Centre longitude.
    pub longitude: Number,
    /// Search radius.
    #[serde(default = "default_radius")]
    pub radius: Number,
    /// Unit of `radius`; passed through to the backend untouched.
    #[serde(default = "default_radius_unit")]
    pub radius_unit: String,
}

/// GeoJSON `MultiPolygon` coordinates: polygons of rings of `[lon, lat, ...]` positions.
pub type Coordinates = Vec<Vec<Vec<Vec<Number>>>>;

/// Options for `geo_custom_area`: GeoJSON `MultiPolygon` coordinates.
///
/// The coordinates are kept exactly as written so the cache key reflects the caller's numbers;
/// `area` is the same shape in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomArea {
    /// Coordinates as given in the document.
    pub coordinates: Coordinates,
    /// The parsed shape.
    pub area: MultiPolygon,
}

impl CustomArea {
    /// Parses and checks the coordinate array.
    fn from_value(options: &Value, path: &str) -> Result<Self, QueryError> {
        let coordinates: Coordinates = parse_term(options, path)?;
        let degrees = coordinates
            .iter()
            .map(|polygon| polygon.iter().map(|ring| ring_degrees(ring)).collect())
            .collect::<Option<Vec<Vec<_>>>>()
            .ok_or_else(|| QueryError::malformed(path, "coordinates must be finite numbers"))?;
        let area = MultiPolygon::from_coordinates(&degrees)
            .map_err(|e| QueryError::malformed(path, e.to_string()))?;
        if area.is_empty() {
            return Err(QueryError::malformed(
                path,
                "area must contain at least one polygon",
            ));
        }
        Ok(Self { coordinates, area })
    }
}

/// Converts a ring's positions to degrees, or `None` if any number has no `f64` form.
fn ring_degrees(ring: &[Vec<Number>]) -> Option<Vec<Vec<f64>>> {
    ring.iter()
        .map(|position| position.iter().map(Number::as_f64).collect::<Option<Vec<f64>>>())
        .collect()
}

/// Options for `geo_named_area`: `{"<category>": "<name>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedArea {
    /// Region category, e.g. `country`.
    pub category: String,
    /// Display name within the category.
    pub name: String,
}

impl NamedArea {
    /// Parses the single-entry category map.
    fn from_value(options: &Value, path: &str) -> Result<Self, QueryError> {
        let areas: BTreeMap<String, String> = parse_term(options, path)?;
        let mut entries = areas.into_iter();
        match (entries.next(), entries.next()) {
            (Some((category, name)), None) => Ok(Self { category, name }),
            _ => Err(QueryError::malformed(
                path,
                "expected exactly one category key",
            )),
        }
    }
}

/// Default for the `*_inclusive` range flags.
fn default_inclusive() -> bool {
    true
}

/// Default `geo_point` radius.
fn default_radius() -> Number {
    Number::from(0)
}

/// Default `geo_point` radius unit.
fn default_radius_unit() -> String {
    "m".to_string()
}

/// Deserializes operator options, reporting failures against `path`.
fn parse_term<'a, T: Deserialize<'a>>(options: &'a Value, path: &str) -> Result<T, QueryError> {
    T::deserialize(options).map_err(|e| QueryError::malformed(path, e.to_string()))
}

/// Parses a non-empty group of members.
fn parse_group(options: &Value, path: &str) -> Result<Vec<Filter>, QueryError> {
    let Value::Array(members) = options else {
        return Err(QueryError::malformed(
            path,
            "expected an array of groups or terms",
        ));
    };
    if members.is_empty() {
        return Err(QueryError::malformed(
            path,
            "group must have at least one member",
        ));
    }
    members
        .iter()
        .enumerate()
        .map(|(i, member)| Filter::from_value(member, &format!("{path}[{i}]")))
        .collect()
}

/// Rejects an empty field list.
fn require_fields(fields: &[String], path: &str) -> Result<(), QueryError> {
    if fields.is_empty() {
        return Err(QueryError::malformed(path, "fields must not be empty"));
    }
    Ok(())
}
