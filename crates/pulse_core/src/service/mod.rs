//! Core use-case services.
//!
//! # Responsibility
//! - Compose normalization, read evaluation and analysis into the entry
//!   points the presentation layer calls.
//! - Keep FFI/CLI layers decoupled from traversal details.

pub mod coverage_service;
pub mod dashboard;
