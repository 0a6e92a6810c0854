//! Read-state write access contracts.
//!
//! Read state is sourced from an external system of record. This module
//! lets callers ask whether a read-state change is permitted before they
//! offer the control, and turns every attempted change into an explicit
//! outcome instead of a silent no-op.

pub mod capability;
pub mod policy;
