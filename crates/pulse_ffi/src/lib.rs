//! Flutter-facing bridge for the pulse analysis engine.

pub mod api;
