//! Query translation.
//!
//! Compiles a [`QueryDocument`] into a backend-neutral [`QueryNode`] tree.

use vds_geo::GeoRegions;

use crate::{
    FieldNames, QueryError,
    document::{
        Exists, Filter, GeoPoint, NamedArea, NumberEquals, NumberRange, QueryDocument,
        StringContains, StringEquals,
    },
    geometry::multipolygon_query,
    node::{QueryNode, RangeBounds, TermValue},
};

/// Translates query documents using a region lookup and field conventions.
///
/// Holds only shared references, so a single translator can serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    /// Named areas for `geo_named_area`.
    regions: &'a GeoRegions,
    /// Field naming conventions.
    fields: &'a FieldNames,
}

impl<'a> Translator<'a> {
    /// Creates a translator.
    pub fn new(regions: &'a GeoRegions, fields: &'a FieldNames) -> Self {
        Self { regions, fields }
    }

    /// Translates a whole document.
    ///
    /// The free-text search and the filters must both match; a document with neither matches
    /// everything.
    pub fn translate(&self, document: &QueryDocument) -> Result<QueryNode, QueryError> {
        let mut clauses = Vec::new();
        if let Some(search) = &document.search {
            clauses.push(self.match_all_text(search));
        }
        if let Some(filters) = &document.filters {
            clauses.push(self.translate_filter(filters)?);
        }
        if clauses.is_empty() {
            return Ok(QueryNode::MatchAll);
        }
        Ok(QueryNode::all(clauses))
    }

    /// Translates one group or term.
    pub fn translate_filter(&self, filter: &Filter) -> Result<QueryNode, QueryError> {
        let node = match filter {
            Filter::And(members) => QueryNode::all(self.translate_members(members)?),
            Filter::Or(members) => QueryNode::any(self.translate_members(members)?),
            Filter::Not(members) => QueryNode::BoolNot {
                children: self.translate_members(members)?,
            },
            Filter::StringEquals(term) => self.string_equals(term),
            Filter::StringContains(term) => self.string_contains(term),
            Filter::NumberEquals(term) => self.number_equals(term),
            Filter::NumberRange(term) => self.number_range(term),
            Filter::Exists(term) => self.exists(term),
            Filter::GeoPoint(term) => self.geo_point(term),
            Filter::GeoNamedArea(area) => self.geo_named_area(area)?,
            Filter::GeoCustomArea(custom) => multipolygon_query(&self.fields.geo, &custom.area),
        };
        Ok(node)
    }

    /// Translates every member of a group, preserving order.
    fn translate_members(&self, members: &[Filter]) -> Result<Vec<QueryNode>, QueryError> {
        members
            .iter()
            .map(|member| self.translate_filter(member))
            .collect()
    }

    /// Full-text match against the all-text field.
    fn match_all_text(&self, text: &str) -> QueryNode {
        QueryNode::MatchText {
            field: self.fields.all_text.clone(),
            text: text.to_string(),
        }
    }

    /// `string_equals`: a term per field on the keyword value.
    fn string_equals(&self, term: &StringEquals) -> QueryNode {
        per_field(&term.fields, |field| QueryNode::Term {
            field: self.fields.prefixed(field),
            value: TermValue::Text(term.value.clone()),
        })
    }

    /// `string_contains`: an all-words match per field on the `.full` subfield.
    fn string_contains(&self, term: &StringContains) -> QueryNode {
        if term.fields.is_empty() {
            return self.match_all_text(&term.value);
        }
        per_field(&term.fields, |field| QueryNode::MatchText {
            field: self.fields.subfield(field, "full"),
            text: term.value.clone(),
        })
    }

    /// `number_equals`: a term per field on the `.number` subfield.
    fn number_equals(&self, term: &NumberEquals) -> QueryNode {
        per_field(&term.fields, |field| QueryNode::Term {
            field: self.fields.subfield(field, "number"),
            value: TermValue::Number(term.value.clone()),
        })
    }

    /// `number_range`: a range per field on the `.number` subfield.
    fn number_range(&self, term: &NumberRange) -> QueryNode {
        let mut bounds = RangeBounds::default();
        if let Some(less_than) = &term.less_than {
            let slot = if term.less_than_inclusive {
                &mut bounds.lte
            } else {
                &mut bounds.lt
            };
            *slot = Some(less_than.clone());
        }
        if let Some(greater_than) = &term.greater_than {
            let slot = if term.greater_than_inclusive {
                &mut bounds.gte
            } else {
                &mut bounds.gt
            };
            *slot = Some(greater_than.clone());
        }

        per_field(&term.fields, |field| QueryNode::Range {
            field: self.fields.subfield(field, "number"),
            bounds: bounds.clone(),
        })
    }

    /// `exists`: presence of any field, or of the geo field.
    fn exists(&self, term: &Exists) -> QueryNode {
        if term.geo_field {
            return QueryNode::Exists {
                field: self.fields.geo.clone(),
            };
        }
        per_field(&term.fields, |field| QueryNode::Exists {
            field: self.fields.prefixed(field),
        })
    }

    /// `geo_point`: distance from a centre point.
    fn geo_point(&self, term: &GeoPoint) -> QueryNode {
        QueryNode::GeoDistance {
            field: self.fields.geo.clone(),
            lat: term.latitude.clone(),
            lon: term.longitude.clone(),
            radius: term.radius.clone(),
            unit: term.radius_unit.clone(),
        }
    }

    /// `geo_named_area`: resolves the area and builds its multipolygon query.
    fn geo_named_area(&self, area: &NamedArea) -> Result<QueryNode, QueryError> {
        let shape = self
            .regions
            .get(&area.category, &area.name)
            .ok_or_else(|| QueryError::UnknownRegion {
                category: area.category.clone(),
                name: area.name.clone(),
            })?;
        Ok(multipolygon_query(&self.fields.geo, shape))
    }
}

/// Builds one clause per field and OR-combines them.
fn per_field(fields: &[String], build: impl Fn(&str) -> QueryNode) -> QueryNode {
    QueryNode::any(fields.iter().map(|field| build(field)).collect())
}
