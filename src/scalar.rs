//! Scalar extraction: reduces a leaf node to a filter operand.

use crate::expr::Node;
use crate::types::{parse_bool, Scalar, ValueType};

/// Returns the filter operand for a scalar leaf, or `None` when the node is not a
/// supported scalar. Null is never a scalar.
pub fn scalar(node: &Node) -> Option<Scalar> {
    match node {
        Node::String(text) => Some(Scalar::Str(text.clone())),
        Node::Number(n) if n.is_int => Some(Scalar::Int(n.int64)),
        Node::Number(n) => Some(Scalar::Float(n.float64)),
        Node::Value(v) => match v.value.value_type() {
            ValueType::Bool | ValueType::Int | ValueType::String | ValueType::Time => {
                Some(Scalar::Str(v.value.to_string()))
            }
            ValueType::Number => v.value.float().map(Scalar::Float),
            _ => None,
        },
        // Bare true/false arrive from the lexer as identifiers
        Node::Identity(ident) => parse_bool(&ident.text).map(|_| Scalar::Str(ident.text.clone())),
        _ => None,
    }
}
