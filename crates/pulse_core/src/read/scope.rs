//! Reader scope for read evaluation.

use crate::model::node::{Node, UserId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Evaluation context: one specific reader, or any reader at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "user_id")]
pub enum ReadScope {
    /// Read iff this reader is in `read_by`.
    User(UserId),
    /// Read iff `read_by` is non-empty.
    Any,
}

impl ReadScope {
    pub fn user(user_id: impl Into<UserId>) -> Self {
        Self::User(user_id.into())
    }

    /// Returns whether the node carries an explicit mark under this scope.
    ///
    /// Unknown reader ids simply match nothing.
    pub fn is_marked(&self, node: &Node) -> bool {
        match self {
            Self::User(user_id) => node.is_read_by(user_id),
            Self::Any => node.is_read_by_anyone(),
        }
    }
}

impl Display for ReadScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(_) => write!(f, "user"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl From<&str> for ReadScope {
    fn from(value: &str) -> Self {
        Self::User(value.to_string())
    }
}

impl From<String> for ReadScope {
    fn from(value: String) -> Self {
        Self::User(value)
    }
}

#[cfg(test)]
mod tests {
    use super::ReadScope;
    use crate::model::node::Node;

    #[test]
    fn user_scope_matches_membership_only() {
        let node = Node::article("a", "A").read_by(["alice"]);
        assert!(ReadScope::user("alice").is_marked(&node));
        assert!(!ReadScope::user("bob").is_marked(&node));
        assert!(ReadScope::Any.is_marked(&node));
    }

    #[test]
    fn any_scope_rejects_empty_read_set() {
        let node = Node::article("a", "A");
        assert!(!ReadScope::Any.is_marked(&node));
    }

    #[test]
    fn display_never_leaks_reader_id() {
        assert_eq!(ReadScope::user("alice@example.com").to_string(), "user");
    }
}
