//! Immutable feed tree snapshot with id lookup.
//!
//! # Responsibility
//! - Validate structural invariants once, when a snapshot is built.
//! - Answer focus/selection lookups by node id without tree walks.
//!
//! # Invariants
//! - A snapshot is never mutated after construction; new feed data means a
//!   new snapshot.
//! - Index entries store child positions, so lookups stay valid for the
//!   snapshot lifetime.

use crate::model::node::{Node, NodeId, NodeKind};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by snapshot construction.
pub type TreeResult<T> = Result<T, TreeError>;

/// Structural invariant violations detected while indexing a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Two nodes share one id.
    DuplicateId(NodeId),
    /// An `Article` or `Summary` node carries children.
    LeafWithChildren(NodeId),
    /// A group carries more than one `Summary` child.
    MultipleSummaries(NodeId),
    /// A non-root group has no children.
    EmptyGroup(NodeId),
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate node id in snapshot: {id}"),
            Self::LeafWithChildren(id) => write!(f, "leaf node must not have children: {id}"),
            Self::MultipleSummaries(id) => {
                write!(f, "group must have at most one summary: {id}")
            }
            Self::EmptyGroup(id) => write!(f, "group must have at least one child: {id}"),
        }
    }
}

impl Error for TreeError {}

#[derive(Debug, Clone)]
struct IndexEntry {
    path: Vec<usize>,
    parent: Option<NodeId>,
}

/// Validated, indexed feed tree snapshot.
#[derive(Debug, Clone)]
pub struct FeedTree {
    root: Node,
    index: HashMap<NodeId, IndexEntry>,
}

impl FeedTree {
    /// Builds a snapshot after checking structural invariants.
    ///
    /// Every group except the root needs at least one child; an empty feed
    /// is an empty root.
    pub fn new(root: Node) -> TreeResult<Self> {
        let mut index = HashMap::with_capacity(root.subtree_len());
        let mut path = Vec::new();
        index_node(&root, None, &mut path, &mut index)?;
        Ok(Self { root, index })
    }

    /// Builds a snapshot holding only an empty root group.
    pub fn empty(root_id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        let root = Node::group(root_id, name);
        let mut index = HashMap::with_capacity(1);
        index.insert(
            root.id.clone(),
            IndexEntry {
                path: Vec::new(),
                parent: None,
            },
        );
        Self { root, index }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Releases the root node.
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Number of nodes in the snapshot, root included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Looks up one node by id.
    pub fn get(&self, id: &str) -> Option<&Node> {
        let entry = self.index.get(id)?;
        let mut cursor = &self.root;
        for position in &entry.path {
            cursor = cursor.children.get(*position)?;
        }
        Some(cursor)
    }

    /// Returns the parent of one node. `None` for the root or unknown ids.
    pub fn parent(&self, id: &str) -> Option<&Node> {
        let parent_id = self.index.get(id)?.parent.as_deref()?;
        self.get(parent_id)
    }

    /// Returns ancestors from the direct parent up to the root.
    pub fn ancestors(&self, id: &str) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(node) = cursor {
            out.push(node);
            cursor = self.parent(node.id.as_str());
        }
        out
    }

    /// Depth of one node; the root is depth 0.
    pub fn depth(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|entry| entry.path.len())
    }

    /// Leaf nodes in depth-first visitation order.
    pub fn leaves(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_preorder(&self.root, &mut |node| {
            if node.is_leaf() {
                out.push(node);
            }
        });
        out
    }

    /// Group nodes in depth-first visitation order, root included.
    pub fn groups(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_preorder(&self.root, &mut |node| {
            if node.is_group() {
                out.push(node);
            }
        });
        out
    }
}

fn index_node(
    node: &Node,
    parent: Option<&NodeId>,
    path: &mut Vec<usize>,
    index: &mut HashMap<NodeId, IndexEntry>,
) -> TreeResult<()> {
    if node.is_leaf() && !node.children.is_empty() {
        return Err(TreeError::LeafWithChildren(node.id.clone()));
    }
    if parent.is_some() && node.is_degenerate_group() {
        return Err(TreeError::EmptyGroup(node.id.clone()));
    }
    let summaries = node
        .children
        .iter()
        .filter(|child| child.kind == NodeKind::Summary)
        .count();
    if summaries > 1 {
        return Err(TreeError::MultipleSummaries(node.id.clone()));
    }

    let entry = IndexEntry {
        path: path.clone(),
        parent: parent.cloned(),
    };
    if index.insert(node.id.clone(), entry).is_some() {
        return Err(TreeError::DuplicateId(node.id.clone()));
    }

    for (position, child) in node.children.iter().enumerate() {
        path.push(position);
        index_node(child, Some(&node.id), path, index)?;
        path.pop();
    }
    Ok(())
}

fn collect_preorder<'a>(node: &'a Node, visit: &mut impl FnMut(&'a Node)) {
    visit(node);
    for child in &node.children {
        collect_preorder(child, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::{FeedTree, TreeError};
    use crate::model::node::Node;

    fn sample() -> Node {
        Node::group("root", "Root")
            .with_child(
                Node::group("root/markets", "Markets")
                    .with_child(Node::summary("root/markets/@summary", "Summary: Markets"))
                    .with_child(Node::article("root/markets/fed", "Fed")),
            )
            .with_child(Node::article("root/misc", "Misc"))
    }

    #[test]
    fn get_and_ancestors_follow_index() {
        let tree = FeedTree::new(sample()).unwrap();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.get("root/markets/fed").unwrap().name, "Fed");
        let ancestors: Vec<&str> = tree
            .ancestors("root/markets/fed")
            .into_iter()
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(ancestors, vec!["root/markets", "root"]);
        assert_eq!(tree.depth("root/markets/fed"), Some(2));
        assert!(tree.parent("root").is_none());
        assert!(tree.get("missing").is_none());
    }

    #[test]
    fn leaves_and_groups_keep_visitation_order() {
        let tree = FeedTree::new(sample()).unwrap();
        let leaves: Vec<&str> = tree.leaves().into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            leaves,
            vec!["root/markets/@summary", "root/markets/fed", "root/misc"]
        );
        let groups: Vec<&str> = tree.groups().into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(groups, vec!["root", "root/markets"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let root = Node::group("root", "Root")
            .with_child(Node::article("dup", "A"))
            .with_child(Node::article("dup", "B"));
        let err = FeedTree::new(root).unwrap_err();
        assert_eq!(err, TreeError::DuplicateId("dup".to_string()));
    }

    #[test]
    fn rejects_leaf_with_children() {
        let root = Node::group("root", "Root")
            .with_child(Node::article("a", "A").with_child(Node::article("b", "B")));
        let err = FeedTree::new(root).unwrap_err();
        assert_eq!(err, TreeError::LeafWithChildren("a".to_string()));
    }

    #[test]
    fn rejects_second_summary() {
        let root = Node::group("root", "Root")
            .with_child(Node::summary("s1", "S1"))
            .with_child(Node::summary("s2", "S2"));
        let err = FeedTree::new(root).unwrap_err();
        assert!(matches!(err, TreeError::MultipleSummaries(id) if id == "root"));
    }

    #[test]
    fn rejects_childless_group_below_root() {
        let root = Node::group("root", "Root")
            .with_child(Node::group("root/empty", "Empty").read_by(["alice"]));
        let err = FeedTree::new(root).unwrap_err();
        assert_eq!(err, TreeError::EmptyGroup("root/empty".to_string()));
    }

    #[test]
    fn childless_root_is_a_valid_empty_snapshot() {
        let tree = FeedTree::new(Node::group("root", "Root")).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
    }
}
