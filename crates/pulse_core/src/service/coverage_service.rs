//! Coverage use-case service.
//!
//! # Responsibility
//! - Turn raw feed values into snapshots using one validated config.
//! - Expose read status, statistics, blind spots, ranking and the dashboard
//!   projection as snapshot-scoped queries.
//! - Gate read-state change requests and report their outcome explicitly.
//!
//! # Invariants
//! - The service holds no snapshot; every query takes the snapshot it runs
//!   against, so concurrent callers never share mutable state.
//! - A read-state change request never reports success: it is either denied
//!   or rejected as unsupported write-back.
//! - Reader ids are never written to logs.

use crate::access::capability::ReadStateCapability;
use crate::access::policy::{CapabilityDecision, ReadStateError, ReadStatePolicy};
use crate::analysis::blind_spots::{
    completely_unread, low_coverage_groups, unread_for_user, BlindSpot,
};
use crate::analysis::ranking::{ranked_articles, RankBy, RankedArticle};
use crate::analysis::stats::{compute_stats, compute_stats_in_tree, CoverageStats};
use crate::config::{AnalysisConfig, ConfigError};
use crate::feed::normalize::FeedNormalizer;
use crate::model::node::{Node, NodeId};
use crate::model::tree::{FeedTree, TreeError};
use crate::read::predicate::is_read_in_tree;
use crate::read::scope::ReadScope;
use crate::service::dashboard::{DashboardSnapshot, ListPreview, NodePreview};
use log::{debug, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from coverage service operations.
#[derive(Debug)]
pub enum CoverageServiceError {
    /// Requested node id is not part of the snapshot.
    NodeNotFound(NodeId),
    /// Supplied configuration failed validation.
    Config(ConfigError),
    /// Caller-built tree violates snapshot invariants.
    Tree(TreeError),
    /// Read-state change was denied or cannot be written back.
    ReadState(ReadStateError),
}

impl Display for CoverageServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "feed node not found: {id}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Tree(err) => write!(f, "{err}"),
            Self::ReadState(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CoverageServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Tree(err) => Some(err),
            Self::ReadState(err) => Some(err),
            Self::NodeNotFound(_) => None,
        }
    }
}

impl From<ConfigError> for CoverageServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TreeError> for CoverageServiceError {
    fn from(value: TreeError) -> Self {
        Self::Tree(value)
    }
}

impl From<ReadStateError> for CoverageServiceError {
    fn from(value: ReadStateError) -> Self {
        Self::ReadState(value)
    }
}

/// Result type used by coverage service operations.
pub type CoverageResult<T> = Result<T, CoverageServiceError>;

/// Coverage analysis facade.
#[derive(Debug, Clone, Default)]
pub struct CoverageService {
    config: AnalysisConfig,
    policy: ReadStatePolicy,
}

impl CoverageService {
    /// Creates a service after validating `config`.
    pub fn new(config: AnalysisConfig) -> CoverageResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            policy: ReadStatePolicy::default(),
        })
    }

    /// Replaces the read-state policy.
    pub fn with_policy(mut self, policy: ReadStatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn policy(&self) -> &ReadStatePolicy {
        &self.policy
    }

    /// Normalizes one raw feed value into a snapshot. Never fails.
    pub fn load_feed(&self, raw: &Value) -> FeedTree {
        FeedNormalizer::validated(&self.config).normalize(raw)
    }

    /// Validates a caller-built root into a snapshot.
    pub fn adopt_tree(&self, root: Node) -> CoverageResult<FeedTree> {
        FeedTree::new(root).map_err(Into::into)
    }

    /// Coverage of the whole snapshot for one reader.
    pub fn stats(&self, tree: &FeedTree, user_id: &str) -> CoverageStats {
        compute_stats(tree.root(), &ReadScope::user(user_id))
    }

    /// Coverage of one subtree for one reader, honoring ancestor marks.
    pub fn node_stats(
        &self,
        tree: &FeedTree,
        id: &str,
        user_id: &str,
    ) -> CoverageResult<CoverageStats> {
        compute_stats_in_tree(tree, id, &ReadScope::user(user_id))
            .ok_or_else(|| CoverageServiceError::NodeNotFound(id.to_string()))
    }

    /// Read status of one node under `scope`.
    pub fn is_read(&self, tree: &FeedTree, id: &str, scope: &ReadScope) -> CoverageResult<bool> {
        is_read_in_tree(tree, id, scope)
            .ok_or_else(|| CoverageServiceError::NodeNotFound(id.to_string()))
    }

    pub fn unread_for_user<'a>(&self, tree: &'a FeedTree, user_id: &str) -> Vec<&'a Node> {
        unread_for_user(tree, user_id)
    }

    pub fn completely_unread<'a>(&self, tree: &'a FeedTree) -> Vec<&'a Node> {
        completely_unread(tree)
    }

    /// Low-coverage groups at the configured threshold.
    pub fn blind_spots(&self, tree: &FeedTree, user_id: &str) -> Vec<BlindSpot> {
        low_coverage_groups(tree, user_id, self.config.blind_spot_threshold)
    }

    pub fn ranked<'a>(&self, tree: &'a FeedTree, by: RankBy) -> Vec<RankedArticle<'a>> {
        ranked_articles(tree, by)
    }

    /// Builds the coverage overview shown on the dashboard.
    pub fn dashboard(&self, tree: &FeedTree, user_id: &str) -> DashboardSnapshot {
        let unread = previews(
            self.unread_for_user(tree, user_id),
            self.config.unread_preview_limit,
        );
        let completely_unread = previews(
            self.completely_unread(tree),
            self.config.completely_unread_preview_limit,
        );
        let blind_spots = ListPreview::truncate(
            self.blind_spots(tree, user_id),
            self.config.blind_spot_preview_limit,
        );
        let stats = self.stats(tree, user_id);

        debug!(
            "event=dashboard_built module=service status=ok articles={} unread={} completely_unread={} blind_spots={}",
            stats.total_articles,
            unread.total,
            completely_unread.total,
            blind_spots.total
        );

        DashboardSnapshot {
            stats,
            unread,
            completely_unread,
            blind_spots,
            blind_spot_threshold: self.config.blind_spot_threshold,
        }
    }

    /// Resolves a focus/selection id to its node.
    pub fn focus<'a>(&self, tree: &'a FeedTree, id: &str) -> CoverageResult<&'a Node> {
        tree.get(id)
            .ok_or_else(|| CoverageServiceError::NodeNotFound(id.to_string()))
    }

    /// Answers whether `user_id` may perform `capability`, with a reason when not.
    pub fn read_capability(
        &self,
        user_id: &str,
        capability: ReadStateCapability,
    ) -> CapabilityDecision {
        self.policy.decide(user_id, capability)
    }

    /// Requests that `id` be marked read for `user_id`.
    pub fn mark_read(&self, tree: &FeedTree, id: &str, user_id: &str) -> CoverageResult<()> {
        self.request_change(tree, id, user_id, ReadStateCapability::MarkRead)
    }

    /// Requests that `user_id`'s read mark be cleared from `id`.
    pub fn mark_unread(&self, tree: &FeedTree, id: &str, user_id: &str) -> CoverageResult<()> {
        self.request_change(tree, id, user_id, ReadStateCapability::MarkUnread)
    }

    fn request_change(
        &self,
        tree: &FeedTree,
        id: &str,
        user_id: &str,
        capability: ReadStateCapability,
    ) -> CoverageResult<()> {
        self.focus(tree, id)?;
        if let Err(err) = self.policy.assert_capability(user_id, capability) {
            warn!(
                "event=read_state_change module=service status=denied capability={}",
                capability.as_str()
            );
            return Err(err.into());
        }
        warn!(
            "event=read_state_change module=service status=unsupported capability={}",
            capability.as_str()
        );
        Err(ReadStateError::WriteBackUnsupported(capability).into())
    }
}

fn previews(nodes: Vec<&Node>, limit: usize) -> ListPreview<NodePreview> {
    let total = nodes.len();
    let items = nodes
        .into_iter()
        .take(limit)
        .map(NodePreview::from)
        .collect();
    ListPreview { total, items }
}
