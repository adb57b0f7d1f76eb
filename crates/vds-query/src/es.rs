//! Elasticsearch query DSL rendering.

use serde_json::{Map, Value, json};

use crate::{QueryNode, node::TermValue};

/// Renders a query tree as an Elasticsearch query object.
pub fn to_json(node: &QueryNode) -> Value {
    match node {
        QueryNode::MatchAll => json!({ "match_all": {} }),
        QueryNode::MatchText { field, text } => keyed(
            "match",
            field,
            json!({ "query": text, "operator": "and" }),
        ),
        QueryNode::Term { field, value } => {
            let value = match value {
                TermValue::Text(text) => Value::from(text.as_str()),
                TermValue::Number(number) => Value::Number(number.clone()),
            };
            keyed("term", field, value)
        }
        QueryNode::Range { field, bounds } => {
            let bounds: Map<String, Value> = bounds
                .iter()
                .map(|(key, value)| (key.to_string(), Value::Number(value.clone())))
                .collect();
            keyed("range", field, Value::Object(bounds))
        }
        QueryNode::Exists { field } => json!({ "exists": { "field": field } }),
        QueryNode::GeoDistance {
            field,
            lat,
            lon,
            radius,
            unit,
        } => {
            let mut options = Map::new();
            options.insert("distance".to_string(), json!(format!("{radius}{unit}")));
            options.insert(field.clone(), json!({ "lat": lat, "lon": lon }));
            json!({ "geo_distance": options })
        }
        QueryNode::GeoPolygon { field, ring } => {
            let points: Vec<Value> = ring
                .iter()
                .map(|point| json!({ "lat": point.lat, "lon": point.lon }))
                .collect();
            keyed("geo_polygon", field, json!({ "points": points }))
        }
        QueryNode::BoolAll { children, must_not } => {
            let mut clauses = Map::new();
            clauses.insert("filter".to_string(), render_all(children));
            if !must_not.is_empty() {
                clauses.insert("must_not".to_string(), render_all(must_not));
            }
            json!({ "bool": clauses })
        }
        QueryNode::BoolAny {
            children,
            min_match,
        } => json!({
            "bool": {
                "should": render_all(children),
                "minimum_should_match": min_match,
            }
        }),
        QueryNode::BoolNot { children } => json!({
            "bool": { "must_not": render_all(children) }
        }),
    }
}

/// Renders each node into a JSON array.
fn render_all(nodes: &[QueryNode]) -> Value {
    Value::Array(nodes.iter().map(to_json).collect())
}

/// Builds `{ kind: { field: body } }`.
fn keyed(kind: &str, field: &str, body: Value) -> Value {
    let mut inner = Map::new();
    inner.insert(field.to_string(), body);
    let mut outer = Map::new();
    outer.insert(kind.to_string(), Value::Object(inner));
    Value::Object(outer)
}

#[cfg(test)]
mod tests {
    use serde_json::Number;
    use vds_geo::Point;

    use super::*;
    use crate::node::RangeBounds;

    fn number(value: f64) -> Number {
        Number::from_f64(value).unwrap()
    }

    #[test]
    fn match_all() {
        assert_eq!(to_json(&QueryNode::MatchAll), json!({"match_all": {}}));
    }

    #[test]
    fn match_text() {
        let node = QueryNode::MatchText {
            field: "meta.all".to_string(),
            text: "red rose".to_string(),
        };
        assert_eq!(
            to_json(&node),
            json!({"match": {"meta.all": {"query": "red rose", "operator": "and"}}})
        );
    }

    #[test]
    fn terms_keep_value_types() {
        let text = QueryNode::Term {
            field: "data.genus".to_string(),
            value: TermValue::Text("Rosa".to_string()),
        };
        let number = QueryNode::Term {
            field: "data.year.number".to_string(),
            value: TermValue::Number(Number::from(1999)),
        };
        assert_eq!(to_json(&text), json!({"term": {"data.genus": "Rosa"}}));
        assert_eq!(
            to_json(&number),
            json!({"term": {"data.year.number": 1999}})
        );
    }

    #[test]
    fn range_renders_present_bounds() {
        let node = QueryNode::Range {
            field: "data.year.number".to_string(),
            bounds: RangeBounds {
                lt: Some(Number::from(2010)),
                gte: Some(Number::from(2000)),
                ..Default::default()
            },
        };
        assert_eq!(
            to_json(&node),
            json!({"range": {"data.year.number": {"lt": 2010, "gte": 2000}}})
        );
    }

    #[test]
    fn geo_distance_joins_radius_and_unit() {
        let node = QueryNode::GeoDistance {
            field: "meta.geo".to_string(),
            lat: number(51.5),
            lon: number(-0.1),
            radius: Number::from(10),
            unit: "km".to_string(),
        };
        assert_eq!(
            to_json(&node),
            json!({"geo_distance": {"distance": "10km", "meta.geo": {"lat": 51.5, "lon": -0.1}}})
        );
    }

    #[test]
    fn geo_polygon_lists_points() {
        let node = QueryNode::GeoPolygon {
            field: "meta.geo".to_string(),
            ring: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
        };
        assert_eq!(
            to_json(&node),
            json!({"geo_polygon": {"meta.geo": {"points": [
                {"lat": 2.0, "lon": 1.0},
                {"lat": 4.0, "lon": 3.0}
            ]}}})
        );
    }

    #[test]
    fn bool_clauses() {
        let exists = QueryNode::Exists {
            field: "data.a".to_string(),
        };
        let all = QueryNode::BoolAll {
            children: vec![exists.clone()],
            must_not: vec![],
        };
        assert_eq!(
            to_json(&all),
            json!({"bool": {"filter": [{"exists": {"field": "data.a"}}]}})
        );

        let any = QueryNode::any(vec![exists.clone(), exists.clone()]);
        assert_eq!(
            to_json(&any)["bool"]["minimum_should_match"],
            json!(1)
        );

        let not = QueryNode::BoolNot {
            children: vec![exists],
        };
        assert_eq!(
            to_json(&not),
            json!({"bool": {"must_not": [{"exists": {"field": "data.a"}}]}})
        );
    }
}
