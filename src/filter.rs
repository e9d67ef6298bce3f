//! Filter module: the search engine filter DSL.
//!
//! Filter values serialize to the engine's query grammar:
//! - `{"term": {<field>: <value>}}`
//! - `{"range": {<field>: {"gte"?, "lte"?, "gt"?, "lt"?}}}`
//! - `{"and": [<clause>, ...]}`
//! - `{"nested": {"filter": <clause>, "path": <path>}}`
//! - `{"wildcard": {<field>: <pattern>}}`

use crate::types::Scalar;
use crate::Result;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    Term(Term),
    Range(RangeFilter),
    And(Vec<Filter>),
    Nested(NestedFilter),
    Wildcard(Wildcard),
}

/// Exact match.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub field: String,
    pub value: Scalar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub field: String,
    pub bounds: RangeQry,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RangeQry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<Scalar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<Scalar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<Scalar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<Scalar>,
}

/// Applies `filter` inside the sub-documents at `path`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NestedFilter {
    pub filter: Box<Filter>,
    pub path: String,
}

/// Glob match using `*` and `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct Wildcard {
    pub field: String,
    pub pattern: String,
}

impl Filter {
    pub fn term(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Filter::Term(Term { field: field.into(), value: value.into() })
    }

    pub fn range(field: impl Into<String>, bounds: RangeQry) -> Self {
        Filter::Range(RangeFilter { field: field.into(), bounds })
    }

    pub fn and(clauses: Vec<Filter>) -> Self {
        Filter::And(clauses)
    }

    pub fn nested(path: impl Into<String>, filter: Filter) -> Self {
        Filter::Nested(NestedFilter { filter: Box::new(filter), path: path.into() })
    }

    pub fn wildcard(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Wildcard(Wildcard { field: field.into(), pattern: pattern.into() })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl RangeQry {
    pub fn gte(v: impl Into<Scalar>) -> Self {
        Self { gte: Some(v.into()), ..Self::default() }
    }
    pub fn lte(v: impl Into<Scalar>) -> Self {
        Self { lte: Some(v.into()), ..Self::default() }
    }
    pub fn gt(v: impl Into<Scalar>) -> Self {
        Self { gt: Some(v.into()), ..Self::default() }
    }
    pub fn lt(v: impl Into<Scalar>) -> Self {
        Self { lt: Some(v.into()), ..Self::default() }
    }
}

fn single_entry<S, V>(serializer: S, key: &str, value: &V) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        single_entry(serializer, &self.field, &self.value)
    }
}

impl Serialize for RangeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        single_entry(serializer, &self.field, &self.bounds)
    }
}

impl Serialize for Wildcard {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        single_entry(serializer, &self.field, &self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_term_shape() {
        let f = Filter::term("map_events.k", "open");
        assert_eq!(f.to_json().unwrap(), json!({"term": {"map_events.k": "open"}}));
    }

    #[test]
    fn test_range_omits_unset_bounds() {
        let f = Filter::range("age", RangeQry::gte(21i64));
        assert_eq!(f.to_json().unwrap(), json!({"range": {"age": {"gte": 21}}}));
        let f = Filter::range("age", RangeQry::lt(1.5));
        assert_eq!(f.to_json_string().unwrap(), r#"{"range":{"age":{"lt":1.5}}}"#);
    }

    #[test]
    fn test_range_bound_order() {
        let bounds = RangeQry { gte: Some(Scalar::Int(1)), lt: Some(Scalar::Int(2)), ..RangeQry::default() };
        let f = Filter::range("x", bounds);
        assert_eq!(f.to_json_string().unwrap(), r#"{"range":{"x":{"gte":1,"lt":2}}}"#);
    }

    #[test]
    fn test_and_preserves_order() {
        let f = Filter::and(vec![Filter::term("a", 1i64), Filter::term("b", 2i64)]);
        assert_eq!(
            f.to_json_string().unwrap(),
            r#"{"and":[{"term":{"a":1}},{"term":{"b":2}}]}"#
        );
    }

    #[test]
    fn test_nested_shape() {
        let f = Filter::nested("map_events", Filter::wildcard("map_events.v", "hel*"));
        assert_eq!(
            f.to_json_string().unwrap(),
            r#"{"nested":{"filter":{"wildcard":{"map_events.v":"hel*"}},"path":"map_events"}}"#
        );
    }

    #[test]
    fn test_wildcard_shape() {
        let f = Filter::wildcard("name", "jo?n*");
        assert_eq!(f.to_json().unwrap(), json!({"wildcard": {"name": "jo?n*"}}));
    }
}
