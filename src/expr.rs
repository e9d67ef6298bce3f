//! Expression (AST) module: the parsed, backend-neutral representation of filter expressions.
//!
//! Nodes are produced by an upstream parser and only consumed here.

use std::fmt;
use crate::types::Value;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Node {
    String(String),
    Number(NumberNode),
    Value(ValueNode),
    Identity(IdentityNode),
    Null,
    Binary {
        op: Operator,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Tri {
        op: Operator,
        arg: Box<Node>,
        lower: Box<Node>,
        upper: Box<Node>,
    },
    Func {
        name: String,
        args: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    Between,
    In,
    Contains,
}

/// A numeric literal. `is_int` records whether the lexer saw an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberNode {
    pub is_int: bool,
    pub int64: i64,
    pub float64: f64,
}

/// A literal carrying a runtime-typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueNode {
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityNode {
    /// Normalized identifier text.
    pub text: String,
    original: String,
    left: Option<String>,
}

impl NumberNode {
    pub fn int(i: i64) -> Self {
        Self { is_int: true, int64: i, float64: i as f64 }
    }

    pub fn float(f: f64) -> Self {
        Self { is_int: false, int64: f as i64, float64: f }
    }
}

impl IdentityNode {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self { original: text.clone(), text, left: None }
    }

    /// An identifier whose source text differs from its normalized form, e.g. a quoted name.
    pub fn with_original(text: impl Into<String>, original: impl Into<String>) -> Self {
        Self { text: text.into(), original: original.into(), left: None }
    }

    /// A `left.right` qualified identifier. The normalized text is the right side only.
    pub fn namespaced(left: impl Into<String>, right: impl Into<String>) -> Self {
        let left = left.into();
        let right = right.into();
        Self {
            original: format!("{}.{}", left, right),
            text: right,
            left: Some(left),
        }
    }

    pub fn has_left_right(&self) -> bool {
        self.left.is_some()
    }

    pub fn original_text(&self) -> &str {
        &self.original
    }
}

impl Node {
    pub fn ident(text: impl Into<String>) -> Self {
        Node::Identity(IdentityNode::new(text))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Node::String(text.into())
    }

    pub fn int(i: i64) -> Self {
        Node::Number(NumberNode::int(i))
    }

    pub fn float(f: f64) -> Self {
        Node::Number(NumberNode::float(f))
    }

    pub fn value(value: Value) -> Self {
        Node::Value(ValueNode { value })
    }

    pub fn binary(lhs: Node, op: Operator, rhs: Node) -> Self {
        Node::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    pub fn between(arg: Node, lower: Node, upper: Node) -> Self {
        Node::Tri {
            op: Operator::Between,
            arg: Box::new(arg),
            lower: Box::new(lower),
            upper: Box::new(upper),
        }
    }

    pub fn func(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Func { name: name.into(), args }
    }

    /// Short name of the node variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::String(_) => "StringNode",
            Node::Number(_) => "NumberNode",
            Node::Value(_) => "ValueNode",
            Node::Identity(_) => "IdentityNode",
            Node::Null => "NullNode",
            Node::Binary { .. } => "BinaryNode",
            Node::Tri { .. } => "TriNode",
            Node::Func { .. } => "FuncNode",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Like => "LIKE",
            Operator::Between => "BETWEEN",
            Operator::In => "IN",
            Operator::Contains => "CONTAINS",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::String(s) => write!(f, "{:?}", s),
            Node::Number(n) if n.is_int => write!(f, "{}", n.int64),
            Node::Number(n) => write!(f, "{}", n.float64),
            Node::Value(v) => write!(f, "{}", v.value),
            Node::Identity(i) => f.write_str(i.original_text()),
            Node::Null => f.write_str("NULL"),
            Node::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Node::Tri { op, arg, lower, upper } => write!(f, "{} {} {} AND {}", arg, op, lower, upper),
            Node::Func { name, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", name, args.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_plain() {
        let id = IdentityNode::new("age");
        assert_eq!(id.text, "age");
        assert_eq!(id.original_text(), "age");
        assert!(!id.has_left_right());
    }

    #[test]
    fn test_identity_namespaced() {
        let id = IdentityNode::namespaced("users", "email");
        assert_eq!(id.text, "email");
        assert_eq!(id.original_text(), "users.email");
        assert!(id.has_left_right());
    }

    #[test]
    fn test_number_constructors() {
        let n = NumberNode::int(21);
        assert!(n.is_int);
        assert_eq!(n.int64, 21);
        let n = NumberNode::float(2.5);
        assert!(!n.is_int);
        assert_eq!(n.float64, 2.5);
    }

    #[test]
    fn test_display() {
        let node = Node::binary(Node::ident("age"), Operator::Ge, Node::int(21));
        assert_eq!(node.to_string(), "age >= 21");
        let node = Node::between(Node::ident("f"), Node::int(7), Node::int(15));
        assert_eq!(node.to_string(), "f BETWEEN 7 AND 15");
        let node = Node::func("timewindow", vec![Node::ident("visits"), Node::int(1)]);
        assert_eq!(node.to_string(), "timewindow(visits, 1)");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Node::Null.kind(), "NullNode");
        assert_eq!(Node::string("x").kind(), "StringNode");
    }
}
