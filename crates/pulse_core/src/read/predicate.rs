//! Read predicate rules and the per-snapshot status map.
//!
//! Group rules, in precedence order, for scope `s`:
//! 1. the group itself is marked under `s`;
//! 2. an ancestor is marked under `s` (cascade);
//! 3. the group's summary is read under `s`;
//! 4. every non-summary child is read under `s`, and there is at least one.
//!
//! Leaves are read when marked themselves or when rule 2 applies.

use crate::model::node::{Node, NodeId, NodeKind};
use crate::model::tree::FeedTree;
use crate::read::scope::ReadScope;
use log::debug;
use std::collections::HashMap;

/// Status of one leaf given the cascade state from its ancestors.
pub(crate) fn leaf_status(node: &Node, scope: &ReadScope, inherited: bool) -> bool {
    inherited || scope.is_marked(node)
}

/// Incremental evaluation of one group from its children's statuses.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GroupFold {
    cascade: bool,
    summary_read: bool,
    content_seen: bool,
    content_all_read: bool,
}

impl GroupFold {
    pub(crate) fn new(node: &Node, scope: &ReadScope, inherited: bool) -> Self {
        Self {
            cascade: inherited || scope.is_marked(node),
            summary_read: false,
            content_seen: false,
            content_all_read: true,
        }
    }

    /// Cascade flag handed down to this group's children.
    pub(crate) fn cascade(&self) -> bool {
        self.cascade
    }

    pub(crate) fn absorb(&mut self, child: &Node, child_read: bool) {
        if child.kind == NodeKind::Summary {
            self.summary_read = child_read;
        } else {
            self.content_seen = true;
            self.content_all_read &= child_read;
        }
    }

    pub(crate) fn finish(self, node: &Node) -> bool {
        if node.is_degenerate_group() {
            return false;
        }
        self.cascade || self.summary_read || (self.content_seen && self.content_all_read)
    }
}

/// Post-order walk reporting every node's status exactly once.
fn walk<'a>(
    node: &'a Node,
    scope: &ReadScope,
    inherited: bool,
    record: &mut impl FnMut(&'a Node, bool),
) -> bool {
    if node.is_leaf() {
        let read = leaf_status(node, scope, inherited);
        record(node, read);
        return read;
    }

    let mut fold = GroupFold::new(node, scope, inherited);
    for child in &node.children {
        let child_read = walk(child, scope, fold.cascade(), record);
        fold.absorb(child, child_read);
    }
    let read = fold.finish(node);
    record(node, read);
    read
}

/// Evaluates `node` as the root of its own subtree, with no ancestors.
pub fn is_read(node: &Node, scope: &ReadScope) -> bool {
    walk(node, scope, false, &mut |_, _| {})
}

/// Evaluates one node of a snapshot, honoring marks on its ancestors.
///
/// Returns `None` when the id is not part of the snapshot.
pub fn is_read_in_tree(tree: &FeedTree, id: &str, scope: &ReadScope) -> Option<bool> {
    let node = tree.get(id)?;
    let inherited = tree
        .ancestors(id)
        .into_iter()
        .any(|ancestor| scope.is_marked(ancestor));
    Some(walk(node, scope, inherited, &mut |_, _| {}))
}

/// Read status of every node in one snapshot under one scope.
///
/// Built in a single pass; rebuild it for every new snapshot.
#[derive(Debug, Clone)]
pub struct ReadStatusMap {
    scope: ReadScope,
    statuses: HashMap<NodeId, bool>,
}

impl ReadStatusMap {
    pub fn compute(tree: &FeedTree, scope: ReadScope) -> Self {
        let mut statuses = HashMap::with_capacity(tree.len());
        walk(tree.root(), &scope, false, &mut |node, read| {
            statuses.insert(node.id.clone(), read);
        });
        debug!(
            "event=read_status_computed module=read scope={} nodes={}",
            scope,
            statuses.len()
        );
        Self { scope, statuses }
    }

    pub fn scope(&self) -> &ReadScope {
        &self.scope
    }

    /// Returns the status of one node, `None` for ids outside the snapshot.
    pub fn is_read(&self, id: &str) -> Option<bool> {
        self.statuses.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Number of nodes evaluated as read.
    pub fn read_count(&self) -> usize {
        self.statuses.values().filter(|read| **read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::{is_read, is_read_in_tree, ReadStatusMap};
    use crate::model::node::Node;
    use crate::model::tree::FeedTree;
    use crate::read::scope::ReadScope;

    fn group_with(summary_readers: &[&str], a1: &[&str], a2: &[&str]) -> Node {
        Node::group("g", "G")
            .with_child(
                Node::summary("g/@summary", "Summary: G").read_by(summary_readers.to_vec()),
            )
            .with_child(Node::article("g/a1", "A1").read_by(a1.to_vec()))
            .with_child(Node::article("g/a2", "A2").read_by(a2.to_vec()))
    }

    #[test]
    fn group_unread_when_summary_unread_and_children_incomplete() {
        let group = group_with(&[], &["alice"], &[]);
        assert!(!is_read(&group, &ReadScope::user("alice")));
    }

    #[test]
    fn group_read_through_summary() {
        let group = group_with(&["alice"], &[], &[]);
        assert!(is_read(&group, &ReadScope::user("alice")));
        assert!(!is_read(&group, &ReadScope::user("bob")));
    }

    #[test]
    fn group_read_when_every_content_child_read() {
        let group = group_with(&[], &["alice"], &["alice"]);
        assert!(is_read(&group, &ReadScope::user("alice")));
    }

    #[test]
    fn nested_groups_recurse() {
        let root = Node::group("r", "R")
            .with_child(
                Node::group("r/s", "S").with_child(Node::article("r/s/a", "A").read_by(["u"])),
            )
            .with_child(Node::article("r/b", "B").read_by(["u"]));
        assert!(is_read(&root, &ReadScope::user("u")));
        assert!(!is_read(&root, &ReadScope::user("v")));
    }

    #[test]
    fn degenerate_group_is_never_read() {
        let empty = Node::group("e", "E").read_by(["alice"]);
        assert!(!is_read(&empty, &ReadScope::user("alice")));
        assert!(!is_read(&empty, &ReadScope::Any));
    }

    #[test]
    fn summary_only_group_needs_read_summary() {
        let group = Node::group("g", "G").with_child(Node::summary("g/@summary", "Summary: G"));
        assert!(!is_read(&group, &ReadScope::Any));
    }

    #[test]
    fn explicit_group_mark_cascades_to_descendants() {
        let root = Node::group("root", "Root")
            .with_child(group_with(&[], &[], &[]).read_by(["alice"]));
        let tree = FeedTree::new(root).unwrap();
        let scope = ReadScope::user("alice");
        assert_eq!(is_read_in_tree(&tree, "g/a1", &scope), Some(true));
        assert_eq!(is_read_in_tree(&tree, "g", &scope), Some(true));
        assert_eq!(is_read_in_tree(&tree, "g/a1", &ReadScope::user("bob")), Some(false));
        assert_eq!(is_read_in_tree(&tree, "missing", &scope), None);

        let map = ReadStatusMap::compute(&tree, scope);
        assert_eq!(map.is_read("g/a2"), Some(true));
        assert_eq!(map.is_read("g/@summary"), Some(true));
        assert_eq!(map.len(), tree.len());
    }

    #[test]
    fn summary_completion_does_not_cascade() {
        let root = Node::group("root", "Root").with_child(group_with(&["alice"], &[], &[]));
        let tree = FeedTree::new(root).unwrap();
        let map = ReadStatusMap::compute(&tree, ReadScope::user("alice"));
        assert_eq!(map.is_read("g"), Some(true));
        assert_eq!(map.is_read("g/a1"), Some(false));
        // root completes through its only content child, `g`
        assert_eq!(map.is_read("root"), Some(true));
        assert_eq!(map.read_count(), 3);
    }
}
