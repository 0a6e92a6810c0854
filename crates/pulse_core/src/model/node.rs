//! Feed node domain model.
//!
//! # Responsibility
//! - Define the canonical record for topics, summaries and articles.
//! - Provide read-only helpers shared by read evaluation and ranking.
//!
//! # Invariants
//! - `kind` is the only source of truth for node shape; callers never infer
//!   kind from the presence of children.
//! - `read_by` is a set of opaque reader ids; order carries no meaning.
//! - `relevancy` is the rounded average of `relevancy_scores` when any exist.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Stable path-derived node identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NodeId = String;

/// Opaque reader identifier supplied by the session layer.
pub type UserId = String;

/// Closed shape tag for every node in a feed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Category node aggregating sub-groups, articles and an optional summary.
    Group,
    /// Synthesized editorial digest of its parent group.
    Summary,
    /// One ingested news item.
    Article,
}

impl NodeKind {
    /// Stable lowercase label used by presentation envelopes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Summary => "summary",
            Self::Article => "article",
        }
    }

    /// Returns whether nodes of this kind count as readable leaf units.
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Summary | Self::Article)
    }
}

/// Canonical tree unit produced by the feed normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Path-derived identifier, unique within one snapshot.
    pub id: NodeId,
    /// Display title.
    pub name: String,
    /// Free text body; summaries carry the editorial digest here.
    pub description: Option<String>,
    /// Layout weight. Passed through untouched by analysis code.
    pub value: f64,
    pub kind: NodeKind,
    /// Readers who explicitly marked this node read.
    #[serde(default)]
    pub read_by: BTreeSet<UserId>,
    /// Ordered children. Empty for `Summary` and `Article`.
    #[serde(default)]
    pub children: Vec<Node>,
    pub urgency: Option<f64>,
    /// Named portfolio scores (`port1`, `port2`, ...).
    #[serde(default)]
    pub relevancy_scores: BTreeMap<String, f64>,
    /// Rounded average of `relevancy_scores`.
    pub relevancy: Option<f64>,
    /// Origin URL or outlet name. Informational only.
    pub source: Option<String>,
    /// Publication date as supplied by the feed.
    pub published: Option<String>,
    pub category: Option<String>,
}

impl Node {
    /// Creates a node with empty read state and no scores.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            value: 0.0,
            kind,
            read_by: BTreeSet::new(),
            children: Vec::new(),
            urgency: None,
            relevancy_scores: BTreeMap::new(),
            relevancy: None,
            source: None,
            published: None,
            category: None,
        }
    }

    /// Creates an empty group node.
    pub fn group(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Group)
    }

    /// Creates an article leaf.
    pub fn article(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Article)
    }

    /// Creates a summary leaf.
    pub fn summary(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Summary)
    }

    /// Appends one child and returns the updated node.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Adds readers and returns the updated node.
    pub fn read_by<I, S>(mut self, readers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<UserId>,
    {
        self.read_by.extend(readers.into_iter().map(Into::into));
        self
    }

    /// Sets urgency plus one relevancy score and returns the updated node.
    pub fn with_scores(mut self, urgency: f64, relevancy: f64) -> Self {
        self.urgency = Some(urgency);
        self.relevancy_scores.insert("overall".to_string(), relevancy);
        self.relevancy = average_relevancy(&self.relevancy_scores);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }

    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    /// Returns whether any reader marked this node.
    pub fn is_read_by_anyone(&self) -> bool {
        !self.read_by.is_empty()
    }

    /// Returns whether `user_id` explicitly marked this node.
    pub fn is_read_by(&self, user_id: &str) -> bool {
        self.read_by.contains(user_id)
    }

    /// Returns the designated summary child, if any.
    pub fn summary_child(&self) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| child.kind == NodeKind::Summary)
    }

    /// Returns children excluding the summary, in order.
    pub fn content_children(&self) -> impl Iterator<Item = &Node> {
        self.children
            .iter()
            .filter(|child| child.kind != NodeKind::Summary)
    }

    /// Returns whether this group has nothing that could make it complete.
    ///
    /// Degenerate groups are never considered read.
    pub fn is_degenerate_group(&self) -> bool {
        self.is_group() && self.children.is_empty()
    }

    /// Counts this node and every descendant.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// Averages portfolio scores, rounding half away from zero.
///
/// Returns `None` when no score is present.
pub fn average_relevancy(scores: &BTreeMap<String, f64>) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.values().sum();
    Some((sum / scores.len() as f64).round())
}
