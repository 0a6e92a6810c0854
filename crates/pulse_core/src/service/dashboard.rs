//! Coverage dashboard projection.
//!
//! Truncated previews keep the full count next to the shown items, so a
//! renderer can print "and N more" without holding the whole list.

use crate::analysis::blind_spots::BlindSpot;
use crate::analysis::stats::CoverageStats;
use crate::model::node::{Node, NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// Minimal node reference for dashboard lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePreview {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
}

impl From<&Node> for NodePreview {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
        }
    }
}

/// First `limit` items of a list plus the full count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPreview<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> ListPreview<T> {
    pub fn truncate(mut items: Vec<T>, limit: usize) -> Self {
        let total = items.len();
        items.truncate(limit);
        Self { total, items }
    }

    /// Entries left out of the preview. Zero when `total` undercounts.
    pub fn more(&self) -> usize {
        self.total.saturating_sub(self.items.len())
    }
}

/// One reader's coverage overview for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub stats: CoverageStats,
    pub unread: ListPreview<NodePreview>,
    /// Leaves nobody has read.
    pub completely_unread: ListPreview<NodePreview>,
    pub blind_spots: ListPreview<BlindSpot>,
    /// Threshold the blind spots were computed with.
    pub blind_spot_threshold: f64,
}
