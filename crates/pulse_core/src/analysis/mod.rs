//! Derived analytics over one feed snapshot.
//!
//! # Responsibility
//! - Aggregate read coverage into statistics.
//! - Surface blind spots and ranked stories for analyst attention.
//!
//! # Invariants
//! - Every query is pure: same snapshot and scope, same output.
//! - List outputs keep tree visitation order unless a sort key is named,
//!   and every sort is stable.

pub mod blind_spots;
pub mod ranking;
pub mod stats;
