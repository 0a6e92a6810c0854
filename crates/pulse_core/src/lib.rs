//! Read-coverage and blind spot analysis engine for a hierarchical news feed.
//! This crate is the single source of truth for read semantics.

pub mod access;
pub mod analysis;
pub mod config;
pub mod feed;
pub mod logging;
pub mod model;
pub mod read;
pub mod service;

pub use access::capability::{
    parse_read_state_capability, supported_read_state_capability_strings, ReadStateCapability,
    ReadStateCapabilityError,
};
pub use access::policy::{CapabilityDecision, ReadStateError, ReadStatePolicy};
pub use analysis::blind_spots::{
    completely_unread, low_coverage_groups, unread_for_user, BlindSpot,
};
pub use analysis::ranking::{
    parse_rank_by, ranked_articles, RankBy, RankedArticle, RankingError, ScoreBand,
};
pub use analysis::stats::{compute_stats, coverage_by_group, percentage, CoverageStats};
pub use config::{AnalysisConfig, ConfigError};
pub use feed::normalize::{normalize_feed, FeedNormalizer};
pub use feed::source::source_host;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::node::{Node, NodeId, NodeKind, UserId};
pub use model::tree::{FeedTree, TreeError, TreeResult};
pub use read::predicate::{is_read, is_read_in_tree, ReadStatusMap};
pub use read::scope::ReadScope;
pub use service::coverage_service::{CoverageResult, CoverageService, CoverageServiceError};
pub use service::dashboard::{DashboardSnapshot, ListPreview, NodePreview};

/// Minimal health-check API for bridge integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
