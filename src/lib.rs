//! Docfilter: compiles backend-neutral filter expressions into search engine filter documents.
//!
//! The crate sits between a parsed expression tree and the JSON filter grammar of a
//! document search engine. Identifiers are resolved through a field mapping layer which
//! may place a logical field inside a nested sub-document; the builders then emit the
//! flat or nested-envelope shape the engine expects.
//!
//! # Architecture
//! - Field catalog (descriptors, nesting, numeric-ness)
//! - Expression nodes (scalar leaves, identifiers, predicates)
//! - Scalar extraction and field resolution
//! - Filter DSL values and their serialization
//! - Builders for range, between, wildcard and time-window predicates

mod types;
mod expr;
mod schema;
mod scalar;
mod resolve;
mod filter;
mod compiler;

pub use types::*;
pub use expr::*;
pub use schema::*;
pub use scalar::*;
pub use resolve::*;
pub use filter::*;
pub use compiler::*;

use thiserror::Error;

/// Unified error type for Docfilter operations
#[derive(Debug, Error)]
pub enum DocfilterError {
    #[error("Invalid node: {0}")]
    InvalidNode(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Unsupported type for comparison: {0}")]
    UnsupportedType(String),
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DocfilterError>;
