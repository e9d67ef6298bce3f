//! Compiler module: compiles predicate nodes into search engine filters.
//!
//! Each builder handles one predicate kind and branches once on whether the field
//! lives in a nested sub-document. FilterCompiler dispatches a predicate node to the
//! matching builder.

use crate::expr::{Node, Operator};
use crate::filter::{Filter, RangeQry};
use crate::resolve::resolve_field;
use crate::scalar::scalar;
use crate::schema::{FieldMapper, FieldType};
use crate::types::{parse_finite, Scalar, Value};
use crate::{DocfilterError, Result};

/// Name of the time-bucket predicate function.
pub const TIMEWINDOW_FUNC: &str = "timewindow";

fn unsupported_type(node: &Node) -> DocfilterError {
    DocfilterError::UnsupportedType(format!("{} ({})", node.kind(), node))
}

// NaN and infinities have no JSON encoding and would serialize as null
fn operand(node: &Node) -> Result<Scalar> {
    match scalar(node) {
        Some(Scalar::Float(f)) if !f.is_finite() => Err(unsupported_type(node)),
        Some(value) => Ok(value),
        None => Err(unsupported_type(node)),
    }
}

/// Range filter for a single `>=`, `<=`, `>` or `<` comparison.
pub fn make_range(lhs: &FieldType, op: Operator, rhs: &Node) -> Result<Filter> {
    let mut value = operand(rhs)?;

    // Numeric fields compare numerically even when the literal arrived as a string
    if lhs.numeric() {
        if let Scalar::Str(s) = &value {
            if let Some(f) = parse_finite(s) {
                value = Scalar::Float(f);
            }
        }
    }

    let (field, value) = if lhs.nested() {
        lhs.prefix_and_value(value)
    } else {
        (lhs.field.clone(), value)
    };
    let bounds = match op {
        Operator::Ge => RangeQry::gte(value),
        Operator::Le => RangeQry::lte(value),
        Operator::Gt => RangeQry::gt(value),
        Operator::Lt => RangeQry::lt(value),
        other => return Err(DocfilterError::UnsupportedOperator(format!("range operator {}", other))),
    };
    let range = Filter::range(field, bounds);
    if lhs.nested() {
        return Ok(Filter::nested(lhs.path.clone(), range));
    }
    Ok(range)
}

/// Exclusive two-sided bound. Bound values are used as given, with no slot rewriting.
pub fn make_between(lhs: &FieldType, lower: Scalar, upper: Scalar) -> Filter {
    let mut clauses = vec![
        Filter::range(lhs.field.clone(), RangeQry::gt(lower)),
        Filter::range(lhs.field.clone(), RangeQry::lt(upper)),
    ];
    if lhs.nested() {
        clauses.push(Filter::term("k", lhs.field.clone()));
        return Filter::nested(lhs.path.clone(), Filter::and(clauses));
    }
    Filter::and(clauses)
}

/// Wildcard match. For nested fields only the field name is qualified.
pub fn make_wildcard(lhs: &FieldType, pattern: &str) -> Filter {
    if lhs.nested() {
        let clauses = vec![
            Filter::wildcard(lhs.path_and_prefix(pattern), pattern),
            Filter::term(format!("{}.k", lhs.path), lhs.field.clone()),
        ];
        return Filter::nested(lhs.path.clone(), Filter::and(clauses));
    }
    Filter::wildcard(lhs.field.clone(), pattern)
}

/// Matches a timestamp against pre-aggregated time buckets stored as nested documents
/// at `lhs.field`, each with `threshold`, `window`, `enter` and `exit` attributes.
pub fn make_time_window(lhs: &FieldType, threshold: i64, window: i64, ts: i64) -> Filter {
    let field = &lhs.field;
    let clauses = vec![
        Filter::term(format!("{}.threshold", field), threshold.to_string()),
        Filter::term(format!("{}.window", field), window.to_string()),
        Filter::range(format!("{}.enter", field), RangeQry::lte(ts)),
        Filter::range(format!("{}.exit", field), RangeQry::gte(ts)),
    ];
    Filter::nested(field.clone(), Filter::and(clauses))
}

/// Compiles predicate nodes against a field mapper.
pub struct FilterCompiler<'m, M: FieldMapper + ?Sized> {
    mapper: &'m M,
}

impl<'m, M: FieldMapper + ?Sized> FilterCompiler<'m, M> {
    pub fn new(mapper: &'m M) -> Self {
        Self { mapper }
    }

    /// Compile a single predicate node into a filter.
    pub fn compile(&self, node: &Node) -> Result<Filter> {
        match node {
            Node::Binary { op: op @ (Operator::Ge | Operator::Le | Operator::Gt | Operator::Lt), lhs, rhs } => {
                let ft = resolve_field(self.mapper, lhs)?;
                log::trace!("range {} on {:?}", op, ft.field);
                make_range(ft, *op, rhs)
            }
            Node::Binary { op: Operator::Like, lhs, rhs } => {
                let ft = resolve_field(self.mapper, lhs)?;
                let pattern = match scalar(rhs) {
                    Some(Scalar::Str(s)) => s,
                    _ => return Err(unsupported_type(rhs)),
                };
                log::trace!("wildcard on {:?}", ft.field);
                Ok(make_wildcard(ft, &pattern))
            }
            Node::Tri { op: Operator::Between, arg, lower, upper } => {
                let ft = resolve_field(self.mapper, arg)?;
                let lo = operand(lower)?;
                let hi = operand(upper)?;
                log::trace!("between on {:?}", ft.field);
                Ok(make_between(ft, lo, hi))
            }
            Node::Func { name, args } if name.eq_ignore_ascii_case(TIMEWINDOW_FUNC) => {
                self.compile_time_window(node, args)
            }
            Node::Binary { op, .. } | Node::Tri { op, .. } => {
                Err(DocfilterError::UnsupportedOperator(op.to_string()))
            }
            Node::Func { name, .. } => Err(DocfilterError::UnsupportedOperator(name.clone())),
            other => Err(DocfilterError::InvalidNode(format!("{} ({}) is not a predicate", other.kind(), other))),
        }
    }

    fn compile_time_window(&self, node: &Node, args: &[Node]) -> Result<Filter> {
        let [ident, threshold, window, ts] = args else {
            return Err(DocfilterError::InvalidNode(format!(
                "{} expects 4 arguments, got {}: {}",
                TIMEWINDOW_FUNC,
                args.len(),
                node
            )));
        };
        let ft = resolve_field(self.mapper, ident)?;
        log::trace!("time window on {:?}", ft.field);
        Ok(make_time_window(ft, int_arg(threshold)?, int_arg(window)?, int_arg(ts)?))
    }
}

fn int_arg(node: &Node) -> Result<i64> {
    match node {
        Node::Number(n) if n.is_int => Ok(n.int64),
        Node::Value(v) => match v.value {
            Value::Int(i) => Ok(i),
            _ => Err(unsupported_type(node)),
        },
        _ => Err(unsupported_type(node)),
    }
}
