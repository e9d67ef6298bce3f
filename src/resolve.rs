//! Field resolution: maps an identifier node to its field descriptor.
//!
//! Resolution tries a fixed, ordered list of strategies. The last one exists for
//! historical data addressed as `key_name.field value` and is deprecated, but queries
//! written that way must keep resolving.

use crate::expr::{IdentityNode, Node};
use crate::schema::{FieldMapper, FieldType};
use crate::{DocfilterError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Lookup by the normalized identifier text.
    Direct,
    /// Lookup by the unnormalized source text of a `left.right` identifier.
    OriginalText,
    /// Lookup by the text before the first `.`.
    LegacyDotted,
}

impl Resolution {
    pub const ORDER: [Resolution; 3] = [
        Resolution::Direct,
        Resolution::OriginalText,
        Resolution::LegacyDotted,
    ];

    pub fn attempt<'m, M>(self, mapper: &'m M, ident: &IdentityNode) -> Option<&'m FieldType>
    where
        M: FieldMapper + ?Sized,
    {
        match self {
            Resolution::Direct => mapper.map(&ident.text),
            Resolution::OriginalText if ident.has_left_right() => mapper.map(ident.original_text()),
            Resolution::OriginalText => None,
            Resolution::LegacyDotted => {
                let (key, _) = ident.text.split_once('.')?;
                mapper.map(key)
            }
        }
    }
}

/// Resolves `node` to a field descriptor, trying each strategy in `Resolution::ORDER`.
pub fn resolve_field<'m, M>(mapper: &'m M, node: &Node) -> Result<&'m FieldType>
where
    M: FieldMapper + ?Sized,
{
    let ident = match node {
        Node::Identity(ident) => ident,
        other => {
            return Err(DocfilterError::InvalidNode(format!("expected an identity but found {} ({})", other.kind(), other)));
        }
    };
    for strategy in Resolution::ORDER {
        if let Some(ft) = strategy.attempt(mapper, ident) {
            if strategy != Resolution::Direct {
                log::debug!("resolved field {:?} via {:?} lookup", ident.original_text(), strategy);
            }
            return Ok(ft);
        }
    }
    Err(DocfilterError::MissingField(ident.original_text().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldCatalogBuilder;
    use crate::types::ValueType;

    fn catalog() -> crate::schema::FieldCatalog {
        FieldCatalogBuilder::new()
            .field("age", FieldType::new("age", ValueType::Int))
            .field("users.email", FieldType::new("email_addr", ValueType::String))
            .field("key_name", FieldType::nested_in("map_keys", "key_name", ValueType::String))
            .build()
    }

    #[test]
    fn test_direct_lookup() {
        let cat = catalog();
        let ft = resolve_field(&cat, &Node::ident("age")).unwrap();
        assert_eq!(ft.field, "age");
    }

    #[test]
    fn test_original_text_lookup() {
        let cat = catalog();
        let ident = IdentityNode::namespaced("users", "email");
        assert!(Resolution::Direct.attempt(&cat, &ident).is_none());
        let ft = resolve_field(&cat, &Node::Identity(ident)).unwrap();
        assert_eq!(ft.field, "email_addr");
    }

    #[test]
    fn test_original_text_requires_left_right() {
        let cat = catalog();
        let ident = IdentityNode::with_original("email", "users.email");
        assert!(Resolution::OriginalText.attempt(&cat, &ident).is_none());
    }

    #[test]
    fn test_direct_wins_over_original_text() {
        let cat = FieldCatalogBuilder::new()
            .field("email", FieldType::new("email_direct", ValueType::String))
            .field("users.email", FieldType::new("email_original", ValueType::String))
            .build();
        let node = Node::Identity(IdentityNode::namespaced("users", "email"));
        assert_eq!(resolve_field(&cat, &node).unwrap().field, "email_direct");
    }

    #[test]
    fn test_original_text_wins_over_legacy_dotted() {
        let cat = FieldCatalogBuilder::new()
            .field("users.email", FieldType::new("email_original", ValueType::String))
            .field("users", FieldType::nested_in("map_users", "users", ValueType::String))
            .build();
        let ident = IdentityNode::namespaced("users", "email");
        assert_eq!(resolve_field(&cat, &Node::Identity(ident)).unwrap().field, "email_original");

        // both fallbacks match: `users.email.work` by original text, `email` by dotted prefix
        let cat = FieldCatalogBuilder::new()
            .field("users.email.work", FieldType::new("work_email", ValueType::String))
            .field("email", FieldType::nested_in("map_email", "email", ValueType::String))
            .build();
        let ident = IdentityNode::namespaced("users", "email.work");
        assert!(Resolution::Direct.attempt(&cat, &ident).is_none());
        assert!(Resolution::LegacyDotted.attempt(&cat, &ident).is_some());
        assert_eq!(resolve_field(&cat, &Node::Identity(ident)).unwrap().field, "work_email");
    }

    #[test]
    fn test_direct_wins_over_legacy_dotted() {
        let cat = FieldCatalogBuilder::new()
            .field("key_name.field value", FieldType::new("full_key", ValueType::String))
            .field("key_name", FieldType::nested_in("map_keys", "key_name", ValueType::String))
            .build();
        let ft = resolve_field(&cat, &Node::ident("key_name.field value")).unwrap();
        assert_eq!(ft.field, "full_key");
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            Resolution::ORDER,
            [Resolution::Direct, Resolution::OriginalText, Resolution::LegacyDotted]
        );
    }

    #[test]
    fn test_legacy_dotted_lookup() {
        let cat = catalog();
        let ft = resolve_field(&cat, &Node::ident("key_name.field value")).unwrap();
        assert_eq!(ft.field, "key_name");
        assert_eq!(ft.path, "map_keys");
    }

    #[test]
    fn test_legacy_requires_dot() {
        let cat = catalog();
        assert!(Resolution::LegacyDotted.attempt(&cat, &IdentityNode::new("key_name")).is_none());
    }

    #[test]
    fn test_missing_field_carries_original_text() {
        let cat = catalog();
        let node = Node::Identity(IdentityNode::with_original("nope", "`nope`"));
        match resolve_field(&cat, &node) {
            Err(DocfilterError::MissingField(name)) => assert_eq!(name, "`nope`"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_node() {
        let cat = catalog();
        assert!(matches!(resolve_field(&cat, &Node::int(1)), Err(DocfilterError::InvalidNode(_))));
    }
}
