//! Top-story ranking across urgency and relevancy.
//!
//! # Invariants
//! - Only leaves carrying both urgency and a relevancy score are ranked.
//! - Output is descending by the requested key; ties keep visitation order.

use crate::model::node::Node;
use crate::model::tree::FeedTree;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sort key for ranked articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// Averaged portfolio relevancy.
    Relevancy,
    Urgency,
    /// `urgency + relevancy`.
    Combined,
}

impl RankBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevancy => "relevancy",
            Self::Urgency => "urgency",
            Self::Combined => "combined",
        }
    }

    fn score(self, urgency: f64, relevancy: f64) -> f64 {
        match self {
            Self::Relevancy => relevancy,
            Self::Urgency => urgency,
            Self::Combined => urgency + relevancy,
        }
    }
}

/// Parses a rank key (`relevancy|urgency|combined`, case-insensitive).
pub fn parse_rank_by(value: &str) -> Result<RankBy, RankingError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "relevancy" => Ok(RankBy::Relevancy),
        "urgency" => Ok(RankBy::Urgency),
        "combined" => Ok(RankBy::Combined),
        other => Err(RankingError::UnknownRankKey(other.to_string())),
    }
}

/// Ranking input errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingError {
    UnknownRankKey(String),
}

impl Display for RankingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRankKey(value) => write!(
                f,
                "unsupported rank key `{value}`; expected relevancy|urgency|combined"
            ),
        }
    }
}

impl Error for RankingError {}

/// Display band for urgency and relevancy badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    /// `High` from 8, `Medium` from 6, `Low` below.
    pub fn of(score: f64) -> Self {
        if score >= 8.0 {
            Self::High
        } else if score >= 6.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One ranked leaf with the scores it was ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedArticle<'a> {
    pub node: &'a Node,
    pub urgency: f64,
    pub relevancy: f64,
    /// Value of the requested sort key.
    pub score: f64,
}

impl RankedArticle<'_> {
    pub fn urgency_band(&self) -> ScoreBand {
        ScoreBand::of(self.urgency)
    }

    pub fn relevancy_band(&self) -> ScoreBand {
        ScoreBand::of(self.relevancy)
    }
}

/// Ranks every scored leaf in `tree` by `by`, highest first.
pub fn ranked_articles(tree: &FeedTree, by: RankBy) -> Vec<RankedArticle<'_>> {
    let mut ranked: Vec<RankedArticle<'_>> = tree
        .leaves()
        .into_iter()
        .filter_map(|node| {
            let urgency = node.urgency?;
            let relevancy = node.relevancy?;
            Some(RankedArticle {
                node,
                urgency,
                relevancy,
                score: by.score(urgency, relevancy),
            })
        })
        .collect();
    // `sort_by` is stable, so equal scores keep visitation order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
