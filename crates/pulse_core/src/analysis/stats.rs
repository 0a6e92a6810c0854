//! Read coverage statistics.
//!
//! # Invariants
//! - `read_articles + unread_articles == total_articles`.
//! - Percentages lie in `0..=100` and are `0` when the total is `0`.
//! - One traversal visits each node once; group statuses reuse their
//!   children's statuses instead of re-walking subtrees.

use crate::model::node::Node;
use crate::model::tree::FeedTree;
use crate::read::predicate::{leaf_status, GroupFold};
use crate::read::scope::ReadScope;
use serde::{Deserialize, Serialize};

/// Aggregate read coverage for one subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageStats {
    /// Articles and summaries in the subtree.
    pub total_articles: usize,
    pub read_articles: usize,
    pub unread_articles: usize,
    pub read_percentage: f64,
    /// Groups in the subtree, the subtree root included when it is a group.
    pub total_groups: usize,
    pub read_groups: usize,
    pub group_read_percentage: f64,
}

/// Returns `100 * read / total`, or `0` for an empty total.
pub fn percentage(read: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (read as f64 / total as f64) * 100.0
}

/// Raw counters accumulated during a traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CoverageCounts {
    total_articles: usize,
    read_articles: usize,
    total_groups: usize,
    read_groups: usize,
}

impl CoverageCounts {
    fn merge(&mut self, other: CoverageCounts) {
        self.total_articles += other.total_articles;
        self.read_articles += other.read_articles;
        self.total_groups += other.total_groups;
        self.read_groups += other.read_groups;
    }

    pub(crate) fn to_stats(self) -> CoverageStats {
        CoverageStats {
            total_articles: self.total_articles,
            read_articles: self.read_articles,
            unread_articles: self.total_articles - self.read_articles,
            read_percentage: percentage(self.read_articles, self.total_articles),
            total_groups: self.total_groups,
            read_groups: self.read_groups,
            group_read_percentage: percentage(self.read_groups, self.total_groups),
        }
    }
}

/// Post-order tally. `on_group` receives each group's pre-order position
/// and its subtree counts.
fn tally<'a>(
    node: &'a Node,
    scope: &ReadScope,
    inherited: bool,
    next_position: &mut usize,
    on_group: &mut impl FnMut(usize, &'a Node, CoverageCounts),
) -> (bool, CoverageCounts) {
    if node.is_leaf() {
        let read = leaf_status(node, scope, inherited);
        let counts = CoverageCounts {
            total_articles: 1,
            read_articles: usize::from(read),
            ..CoverageCounts::default()
        };
        return (read, counts);
    }

    let position = *next_position;
    *next_position += 1;

    let mut fold = GroupFold::new(node, scope, inherited);
    let mut counts = CoverageCounts::default();
    for child in &node.children {
        let (child_read, child_counts) =
            tally(child, scope, fold.cascade(), next_position, on_group);
        fold.absorb(child, child_read);
        counts.merge(child_counts);
    }
    let read = fold.finish(node);
    counts.total_groups += 1;
    counts.read_groups += usize::from(read);
    on_group(position, node, counts);
    (read, counts)
}

fn subtree_counts(node: &Node, scope: &ReadScope, inherited: bool) -> CoverageCounts {
    let mut next_position = 0;
    tally(node, scope, inherited, &mut next_position, &mut |_, _, _| {}).1
}

/// Computes coverage for `node` as the root of its own subtree.
pub fn compute_stats(node: &Node, scope: &ReadScope) -> CoverageStats {
    subtree_counts(node, scope, false).to_stats()
}

/// Computes coverage for one snapshot node, honoring ancestor marks.
///
/// Returns `None` when the id is not part of the snapshot.
pub fn compute_stats_in_tree(
    tree: &FeedTree,
    id: &str,
    scope: &ReadScope,
) -> Option<CoverageStats> {
    let node = tree.get(id)?;
    let inherited = tree
        .ancestors(id)
        .into_iter()
        .any(|ancestor| scope.is_marked(ancestor));
    Some(subtree_counts(node, scope, inherited).to_stats())
}

/// Coverage of every group in the snapshot, in visitation order.
pub fn coverage_by_group<'a>(
    tree: &'a FeedTree,
    scope: &ReadScope,
) -> Vec<(&'a Node, CoverageStats)> {
    let mut positioned = Vec::new();
    let mut next_position = 0;
    tally(
        tree.root(),
        scope,
        false,
        &mut next_position,
        &mut |position, node, counts| positioned.push((position, node, counts.to_stats())),
    );
    positioned.sort_by_key(|(position, _, _)| *position);
    positioned
        .into_iter()
        .map(|(_, node, stats)| (node, stats))
        .collect()
}
