//! Backend-neutral query tree.
//!
//! The translator produces a [`QueryNode`]; a backend adapter (see [`crate::es`]) maps it onto a
//! concrete search-engine query.

use std::fmt;

use serde_json::Number;
use vds_geo::Point;

/// Value of an exact-match term.
#[derive(Debug, Clone, PartialEq)]
pub enum TermValue {
    /// A keyword.
    Text(String),
    /// A number.
    Number(Number),
}

impl fmt::Display for TermValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Bounds of a range query. Absent bounds are open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeBounds {
    /// Strictly less than.
    pub lt: Option<Number>,
    /// Less than or equal to.
    pub lte: Option<Number>,
    /// Strictly greater than.
    pub gt: Option<Number>,
    /// Greater than or equal to.
    pub gte: Option<Number>,
}

impl RangeBounds {
    /// Iterates over the present bounds as `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Number)> {
        [
            ("lt", &self.lt),
            ("lte", &self.lte),
            ("gt", &self.gt),
            ("gte", &self.gte),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key, v)))
    }
}

/// A compiled query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// Matches every record.
    MatchAll,

    /// Full-text match; every word of `text` must appear.
    MatchText {
        /// Field to search.
        field: String,
        /// Text to match.
        text: String,
    },

    /// Exact value match.
    Term {
        /// Field to match.
        field: String,
        /// Required value.
        value: TermValue,
    },

    /// Numeric range match.
    Range {
        /// Field to match.
        field: String,
        /// Range bounds.
        bounds: RangeBounds,
    },

    /// Field has a value.
    Exists {
        /// Field to check.
        field: String,
    },

    /// Within a distance of a point.
    GeoDistance {
        /// Geo field.
        field: String,
        /// Centre latitude.
        lat: Number,
        /// Centre longitude.
        lon: Number,
        /// Radius magnitude.
        radius: Number,
        /// Radius unit, as given by the caller.
        unit: String,
    },

    /// Inside a polygon ring.
    GeoPolygon {
        /// Geo field.
        field: String,
        /// Boundary points in order.
        ring: Vec<Point>,
    },

    /// Every child must match and no `must_not` clause may match.
    BoolAll {
        /// Required clauses.
        children: Vec<Self>,
        /// Excluded clauses.
        must_not: Vec<Self>,
    },

    /// At least `min_match` children must match.
    BoolAny {
        /// Candidate clauses.
        children: Vec<Self>,
        /// Minimum number of matching clauses.
        min_match: usize,
    },

    /// None of the children may match.
    BoolNot {
        /// Excluded clauses.
        children: Vec<Self>,
    },
}

impl QueryNode {
    /// Combines clauses with OR, returning a lone clause unwrapped.
    pub fn any(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            return children.remove(0);
        }
        Self::BoolAny {
            children,
            min_match: 1,
        }
    }

    /// Combines clauses with AND, returning a lone clause unwrapped.
    pub fn all(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            return children.remove(0);
        }
        Self::BoolAll {
            children,
            must_not: Vec::new(),
        }
    }

    /// Formats the node as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::MatchAll => writeln!(f, "{prefix}MatchAll"),
            Self::MatchText { field, text } => writeln!(f, "{prefix}MatchText({field}, {text:?})"),
            Self::Term { field, value } => writeln!(f, "{prefix}Term({field}, {value})"),
            Self::Range { field, bounds } => {
                let parts: Vec<String> = bounds.iter().map(|(k, v)| format!("{k}={v}")).collect();
                writeln!(f, "{prefix}Range({field}, {})", parts.join(", "))
            }
            Self::Exists { field } => writeln!(f, "{prefix}Exists({field})"),
            Self::GeoDistance {
                field,
                lat,
                lon,
                radius,
                unit,
            } => writeln!(
                f,
                "{prefix}GeoDistance({field}, lat={lat}, lon={lon}, {radius}{unit})"
            ),
            Self::GeoPolygon { field, ring } => {
                writeln!(f, "{prefix}GeoPolygon({field}, {} points)", ring.len())
            }
            Self::BoolAll { children, must_not } => {
                writeln!(f, "{prefix}BoolAll")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                if !must_not.is_empty() {
                    writeln!(f, "{prefix}  MustNot")?;
                    for child in must_not {
                        child.fmt_tree(f, indent + 2)?;
                    }
                }
                Ok(())
            }
            Self::BoolAny {
                children,
                min_match,
            } => {
                writeln!(f, "{prefix}BoolAny(min_match={min_match})")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::BoolNot { children } => {
                writeln!(f, "{prefix}BoolNot")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exists(field: &str) -> QueryNode {
        QueryNode::Exists {
            field: field.to_string(),
        }
    }

    #[test]
    fn any_single_element_unwraps() {
        assert_eq!(QueryNode::any(vec![exists("a")]), exists("a"));
    }

    #[test]
    fn any_wraps_several() {
        assert_eq!(
            QueryNode::any(vec![exists("a"), exists("b")]),
            QueryNode::BoolAny {
                children: vec![exists("a"), exists("b")],
                min_match: 1,
            }
        );
    }

    #[test]
    fn all_single_element_unwraps() {
        assert_eq!(QueryNode::all(vec![exists("a")]), exists("a"));
    }

    #[test]
    fn all_wraps_several_without_exclusions() {
        let QueryNode::BoolAll { children, must_not } =
            QueryNode::all(vec![exists("a"), exists("b")])
        else {
            panic!("expected BoolAll");
        };
        assert_eq!(children.len(), 2);
        assert!(must_not.is_empty());
    }

    #[test]
    fn range_bounds_iterate_present_only() {
        let bounds = RangeBounds {
            lte: Some(Number::from(10)),
            gt: Some(Number::from(2)),
            ..Default::default()
        };
        let keys: Vec<&str> = bounds.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["lte", "gt"]);
    }

    #[test]
    fn display_renders_tree() {
        let node = QueryNode::BoolAny {
            children: vec![
                QueryNode::Term {
                    field: "data.genus".to_string(),
                    value: TermValue::Text("Rosa".to_string()),
                },
                QueryNode::Range {
                    field: "data.year.number".to_string(),
                    bounds: RangeBounds {
                        gt: Some(Number::from(2000)),
                        ..Default::default()
                    },
                },
            ],
            min_match: 1,
        };
        assert_eq!(
            node.to_string(),
            "BoolAny(min_match=1)\n  Term(data.genus, \"Rosa\")\n  Range(data.year.number, gt=2000)\n"
        );
    }
}
