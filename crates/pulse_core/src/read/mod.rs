//! Read/unread evaluation.
//!
//! # Responsibility
//! - Decide read status for leaves and groups under a reader scope.
//! - Provide a per-snapshot status map so callers never recompute a
//!   subtree's status within one pass.
//!
//! # Invariants
//! - An explicit mark on a group cascades to every descendant.
//! - A group completed through its summary or through all of its children
//!   does not cascade.
//! - A degenerate group (no children at all) is unread under every scope.

pub mod predicate;
pub mod scope;
