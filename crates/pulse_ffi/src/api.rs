//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose dashboard, ranking, focus and read-state queries to Dart via FRB.
//! - Flatten core types into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - No state is kept between calls; every call normalizes the feed it gets.
//! - Undecodable feed text degrades to an empty feed, like any other
//!   malformed feed shape.

use log::warn;
use pulse_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    parse_rank_by, parse_read_state_capability, ping as ping_inner,
    source_host as source_host_inner, AnalysisConfig, BlindSpot, CoverageService, FeedTree,
    Node, NodePreview, RankedArticle, ReadScope,
};
use serde_json::Value;

const RANKED_DEFAULT_LIMIT: u32 = 10;
const RANKED_LIMIT_MAX: u32 = 50;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes engine logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Extracts the lowercase host of a source URL for feed icon lookup.
#[flutter_rust_bridge::frb(sync)]
pub fn source_host(source: String) -> Option<String> {
    source_host_inner(source.as_str())
}

/// Node reference used in dashboard lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeItem {
    pub id: String,
    pub name: String,
    /// `group|summary|article`.
    pub kind: String,
}

/// One low-coverage group.
#[derive(Debug, Clone, PartialEq)]
pub struct BlindSpotItem {
    pub group_id: String,
    pub category: String,
    pub read_percentage: f64,
    pub read_articles: u32,
    pub total_articles: u32,
    pub unread_articles: u32,
}

/// Dashboard response envelope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardResponse {
    pub ok: bool,
    pub message: String,
    pub total_articles: u32,
    pub read_articles: u32,
    pub unread_articles: u32,
    pub read_percentage: f64,
    pub total_groups: u32,
    pub read_groups: u32,
    pub group_read_percentage: f64,
    pub unread_items: Vec<NodeItem>,
    /// Unread entries beyond the preview.
    pub unread_more: u32,
    pub completely_unread_items: Vec<NodeItem>,
    pub completely_unread_more: u32,
    pub blind_spots: Vec<BlindSpotItem>,
    pub blind_spots_more: u32,
    pub blind_spot_threshold: f64,
}

/// Builds the coverage dashboard for one reader.
///
/// `config_json` is an optional partial `AnalysisConfig` override.
///
/// # FFI contract
/// - Never panics.
/// - `ok=false` only for an invalid config override.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_snapshot(
    feed_json: String,
    user_id: String,
    config_json: Option<String>,
) -> DashboardResponse {
    let service = match build_service(config_json) {
        Ok(service) => service,
        Err(message) => {
            return DashboardResponse {
                ok: false,
                message: format!("dashboard_snapshot failed: {message}"),
                ..DashboardResponse::default()
            }
        }
    };
    let tree = load_tree(&service, feed_json.as_str());
    let snapshot = service.dashboard(&tree, user_id.trim());

    DashboardResponse {
        ok: true,
        message: format!(
            "{} of {} article(s) read.",
            snapshot.stats.read_articles, snapshot.stats.total_articles
        ),
        total_articles: to_u32(snapshot.stats.total_articles),
        read_articles: to_u32(snapshot.stats.read_articles),
        unread_articles: to_u32(snapshot.stats.unread_articles),
        read_percentage: snapshot.stats.read_percentage,
        total_groups: to_u32(snapshot.stats.total_groups),
        read_groups: to_u32(snapshot.stats.read_groups),
        group_read_percentage: snapshot.stats.group_read_percentage,
        unread_more: to_u32(snapshot.unread.more()),
        unread_items: snapshot.unread.items.into_iter().map(to_node_item).collect(),
        completely_unread_more: to_u32(snapshot.completely_unread.more()),
        completely_unread_items: snapshot
            .completely_unread
            .items
            .into_iter()
            .map(to_node_item)
            .collect(),
        blind_spots_more: to_u32(snapshot.blind_spots.more()),
        blind_spots: snapshot
            .blind_spots
            .items
            .into_iter()
            .map(to_blind_spot_item)
            .collect(),
        blind_spot_threshold: snapshot.blind_spot_threshold,
    }
}

/// One ranked story.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStoryItem {
    pub id: String,
    pub name: String,
    pub source: Option<String>,
    /// Lowercase host of `source`, when it is a URL.
    pub source_host: Option<String>,
    pub urgency: f64,
    pub relevancy: f64,
    pub score: f64,
    /// `low|medium|high`.
    pub urgency_band: String,
    pub relevancy_band: String,
}

/// Ranked stories response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStoriesResponse {
    pub ok: bool,
    pub items: Vec<RankedStoryItem>,
    pub message: String,
    /// Effective applied limit.
    pub applied_limit: u32,
}

/// Ranks scored stories by `relevancy|urgency|combined`, highest first.
///
/// # FFI contract
/// - Never panics.
/// - Limit `None` or `0` falls back to the default; larger values are capped.
#[flutter_rust_bridge::frb(sync)]
pub fn ranked_stories(
    feed_json: String,
    rank_by: String,
    limit: Option<u32>,
) -> RankedStoriesResponse {
    let applied_limit = normalize_ranked_limit(limit);
    let by = match parse_rank_by(rank_by.as_str()) {
        Ok(by) => by,
        Err(err) => {
            return RankedStoriesResponse {
                ok: false,
                items: Vec::new(),
                message: format!("ranked_stories failed: {err}"),
                applied_limit,
            }
        }
    };

    let service = CoverageService::default();
    let tree = load_tree(&service, feed_json.as_str());
    let items: Vec<RankedStoryItem> = service
        .ranked(&tree, by)
        .into_iter()
        .take(applied_limit as usize)
        .map(to_ranked_story_item)
        .collect();
    let message = if items.is_empty() {
        "No scored stories.".to_string()
    } else {
        format!("Ranked {} story(ies) by {}.", items.len(), by.as_str())
    };
    RankedStoriesResponse {
        ok: true,
        items,
        message,
        applied_limit,
    }
}

/// Focused node details.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusNode {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub depth: u32,
    /// Read status for the requesting reader, ancestor marks included.
    pub read: bool,
    pub total_articles: u32,
    pub read_articles: u32,
    pub read_percentage: f64,
}

/// Focus lookup response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusResponse {
    pub ok: bool,
    pub node: Option<FocusNode>,
    pub message: String,
}

/// Resolves a selected node id and reports its coverage for one reader.
///
/// # FFI contract
/// - Never panics.
/// - Unknown ids return `ok=false` with `node=None`.
#[flutter_rust_bridge::frb(sync)]
pub fn focus_node(feed_json: String, node_id: String, user_id: String) -> FocusResponse {
    let service = CoverageService::default();
    let tree = load_tree(&service, feed_json.as_str());
    let user_id = user_id.trim();

    let lookup = service.focus(&tree, node_id.as_str()).and_then(|node| {
        let read = service.is_read(&tree, &node.id, &ReadScope::user(user_id))?;
        let stats = service.node_stats(&tree, &node.id, user_id)?;
        Ok(FocusNode {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind.as_str().to_string(),
            description: node.description.clone(),
            parent_id: tree.parent(&node.id).map(|parent| parent.id.clone()),
            depth: tree.depth(&node.id).map(to_u32).unwrap_or_default(),
            read,
            total_articles: to_u32(stats.total_articles),
            read_articles: to_u32(stats.read_articles),
            read_percentage: stats.read_percentage,
        })
    });

    match lookup {
        Ok(node) => FocusResponse {
            ok: true,
            node: Some(node),
            message: "Node found.".to_string(),
        },
        Err(err) => FocusResponse {
            ok: false,
            node: None,
            message: format!("focus_node failed: {err}"),
        },
    }
}

/// Read-state capability check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadStateCapabilityResponse {
    pub allowed: bool,
    /// Tooltip text for a disabled control.
    pub reason: Option<String>,
    pub message: String,
}

/// Answers whether `user_id` may perform `capability` (`mark_read|mark_unread`).
///
/// # FFI contract
/// - Never panics.
/// - Unknown capability strings return `allowed=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn read_state_capability(user_id: String, capability: String) -> ReadStateCapabilityResponse {
    let capability = match parse_read_state_capability(capability.as_str()) {
        Ok(capability) => capability,
        Err(err) => {
            return ReadStateCapabilityResponse {
                allowed: false,
                reason: None,
                message: format!("read_state_capability failed: {err}"),
            }
        }
    };
    let decision = CoverageService::default().read_capability(user_id.trim(), capability);
    ReadStateCapabilityResponse {
        allowed: decision.allowed,
        message: capability.description().to_string(),
        reason: decision.reason,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadStateChangeResponse {
    pub ok: bool,
    pub message: String,
}

/// Requests a read-state change for one node.
///
/// # FFI contract
/// - Never panics.
/// - Read state is owned by an external system of record, so this always
///   returns `ok=false` with the reason the change was not applied.
#[flutter_rust_bridge::frb(sync)]
pub fn request_read_state_change(
    feed_json: String,
    node_id: String,
    user_id: String,
    capability: String,
) -> ReadStateChangeResponse {
    let capability = match parse_read_state_capability(capability.as_str()) {
        Ok(capability) => capability,
        Err(err) => {
            return ReadStateChangeResponse {
                ok: false,
                message: format!("request_read_state_change failed: {err}"),
            }
        }
    };
    let service = CoverageService::default();
    let tree = load_tree(&service, feed_json.as_str());
    let outcome = match capability {
        pulse_core::ReadStateCapability::MarkRead => {
            service.mark_read(&tree, node_id.as_str(), user_id.trim())
        }
        pulse_core::ReadStateCapability::MarkUnread => {
            service.mark_unread(&tree, node_id.as_str(), user_id.trim())
        }
    };
    match outcome {
        Ok(()) => ReadStateChangeResponse {
            ok: true,
            message: "Read state updated.".to_string(),
        },
        Err(err) => ReadStateChangeResponse {
            ok: false,
            message: format!("request_read_state_change failed: {err}"),
        },
    }
}

fn build_service(config_json: Option<String>) -> Result<CoverageService, String> {
    let config = match config_json.as_deref().map(str::trim) {
        None | Some("") => AnalysisConfig::default(),
        Some(raw) => AnalysisConfig::from_json_str(raw).map_err(|err| err.to_string())?,
    };
    CoverageService::new(config).map_err(|err| err.to_string())
}

fn load_tree(service: &CoverageService, feed_json: &str) -> FeedTree {
    let raw = serde_json::from_str::<Value>(feed_json).unwrap_or_else(|err| {
        warn!(
            "event=feed_decode module=ffi status=degraded line={} column={}",
            err.line(),
            err.column()
        );
        Value::Null
    });
    service.load_feed(&raw)
}

fn normalize_ranked_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => RANKED_DEFAULT_LIMIT,
        Some(value) if value > RANKED_LIMIT_MAX => RANKED_LIMIT_MAX,
        Some(value) => value,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn to_node_item(preview: NodePreview) -> NodeItem {
    NodeItem {
        id: preview.id,
        name: preview.name,
        kind: preview.kind.as_str().to_string(),
    }
}

fn to_blind_spot_item(spot: BlindSpot) -> BlindSpotItem {
    BlindSpotItem {
        group_id: spot.group_id,
        category: spot.category,
        read_percentage: spot.read_percentage,
        read_articles: to_u32(spot.read_articles),
        total_articles: to_u32(spot.total_articles),
        unread_articles: to_u32(spot.unread_articles),
    }
}

fn to_ranked_story_item(entry: RankedArticle<'_>) -> RankedStoryItem {
    let node: &Node = entry.node;
    RankedStoryItem {
        id: node.id.clone(),
        name: node.name.clone(),
        source_host: node.source.as_deref().and_then(source_host_inner),
        source: node.source.clone(),
        urgency: entry.urgency,
        relevancy: entry.relevancy,
        score: entry.score,
        urgency_band: entry.urgency_band().as_str().to_string(),
        relevancy_band: entry.relevancy_band().as_str().to_string(),
    }
}
