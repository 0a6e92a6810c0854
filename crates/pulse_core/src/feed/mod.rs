//! Raw feed ingestion.
//!
//! # Responsibility
//! - Read heterogeneous raw feed records (labeled and simple schemes).
//! - Produce one canonical, validated `FeedTree` snapshot per fetch.
//!
//! # Invariants
//! - Normalization never fails; malformed input degrades to defaults.
//! - Ids are derived from the ancestor title chain, never from randomness.

pub mod normalize;
pub mod raw;
pub mod source;
