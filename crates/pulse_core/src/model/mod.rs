//! Canonical feed tree model.
//!
//! # Responsibility
//! - Define the node shape every analysis in core works against.
//! - Own the immutable tree snapshot and its id index.
//!
//! # Invariants
//! - `Article` and `Summary` nodes never carry children.
//! - A group carries at most one `Summary` child.
//! - Node ids are unique within one snapshot.

pub mod node;
pub mod tree;
