//! Blind spot queries: unread leaves and low-coverage groups.

use crate::analysis::stats::coverage_by_group;
use crate::model::node::{Node, NodeId};
use crate::model::tree::FeedTree;
use crate::read::predicate::ReadStatusMap;
use crate::read::scope::ReadScope;
use serde::{Deserialize, Serialize};

/// One group whose read coverage fell below the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlindSpot {
    pub group_id: NodeId,
    /// Group display name.
    pub category: String,
    pub read_percentage: f64,
    pub read_articles: usize,
    pub total_articles: usize,
    pub unread_articles: usize,
}

/// Leaves in `tree` that `status` marks unread, in visitation order.
pub fn unread_leaves<'a>(tree: &'a FeedTree, status: &ReadStatusMap) -> Vec<&'a Node> {
    tree.leaves()
        .into_iter()
        .filter(|leaf| status.is_read(&leaf.id) == Some(false))
        .collect()
}

/// Articles and summaries `user_id` has not read, in visitation order.
pub fn unread_for_user<'a>(tree: &'a FeedTree, user_id: &str) -> Vec<&'a Node> {
    let status = ReadStatusMap::compute(tree, ReadScope::user(user_id));
    unread_leaves(tree, &status)
}

/// Articles and summaries nobody marked, in visitation order.
///
/// Only the leaf's own `read_by` counts; group marks do not cascade here.
pub fn completely_unread(tree: &FeedTree) -> Vec<&Node> {
    tree.leaves()
        .into_iter()
        .filter(|leaf| !leaf.is_read_by_anyone())
        .collect()
}

/// Groups whose read percentage for `user_id` is strictly below
/// `threshold_pct`, worst coverage first.
///
/// Groups without any article carry no coverage signal and are skipped.
/// Groups with equal coverage keep visitation order.
pub fn low_coverage_groups(
    tree: &FeedTree,
    user_id: &str,
    threshold_pct: f64,
) -> Vec<BlindSpot> {
    let scope = ReadScope::user(user_id);
    let mut spots: Vec<BlindSpot> = coverage_by_group(tree, &scope)
        .into_iter()
        .filter(|(_, stats)| stats.total_articles > 0)
        .filter(|(_, stats)| stats.read_percentage < threshold_pct)
        .map(|(group, stats)| BlindSpot {
            group_id: group.id.clone(),
            category: group.name.clone(),
            read_percentage: stats.read_percentage,
            read_articles: stats.read_articles,
            total_articles: stats.total_articles,
            unread_articles: stats.unread_articles,
        })
        .collect();
    spots.sort_by(|a, b| a.read_percentage.total_cmp(&b.read_percentage));
    spots
}
