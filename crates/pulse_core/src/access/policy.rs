//! Read-state capability policy.
//!
//! # Invariants
//! - Deny by default: a reader holds no capability unless granted.
//! - Granting a capability only clears the policy gate; write-back itself
//!   is still reported as unsupported by the service layer.

use crate::access::capability::ReadStateCapability;
use crate::model::node::UserId;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason reported when a reader holds no grant.
pub const DEFAULT_DENIAL_REASON: &str = "No qualification";

/// Errors from read-state change requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStateError {
    /// The reader lacks the capability.
    CapabilityDenied {
        capability: ReadStateCapability,
        reason: String,
    },
    /// The gate allows the change but no system of record accepts writes.
    WriteBackUnsupported(ReadStateCapability),
}

impl Display for ReadStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapabilityDenied { capability, reason } => write!(
                f,
                "read-state capability `{}` denied: {reason}",
                capability.as_str()
            ),
            Self::WriteBackUnsupported(capability) => write!(
                f,
                "read-state write-back is not supported for `{}`",
                capability.as_str()
            ),
        }
    }
}

impl Error for ReadStateError {}

/// Queryable outcome of a capability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityDecision {
    pub capability: ReadStateCapability,
    pub allowed: bool,
    /// Tooltip text for a disabled control; `None` when allowed.
    pub reason: Option<String>,
}

/// Per-reader grants for read-state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadStatePolicy {
    grants: BTreeMap<UserId, BTreeSet<ReadStateCapability>>,
    denial_reason: String,
}

impl Default for ReadStatePolicy {
    fn default() -> Self {
        Self {
            grants: BTreeMap::new(),
            denial_reason: DEFAULT_DENIAL_REASON.to_string(),
        }
    }
}

impl ReadStatePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the reason reported for denied checks.
    pub fn with_denial_reason(mut self, reason: impl Into<String>) -> Self {
        self.denial_reason = reason.into();
        self
    }

    /// Grants one capability to one reader.
    pub fn grant(&mut self, user_id: impl Into<UserId>, capability: ReadStateCapability) {
        self.grants
            .entry(user_id.into())
            .or_default()
            .insert(capability);
    }

    /// Removes one capability from one reader.
    pub fn revoke(&mut self, user_id: &str, capability: ReadStateCapability) {
        if let Some(capabilities) = self.grants.get_mut(user_id) {
            capabilities.remove(&capability);
            if capabilities.is_empty() {
                self.grants.remove(user_id);
            }
        }
    }

    pub fn can(&self, user_id: &str, capability: ReadStateCapability) -> bool {
        self.grants
            .get(user_id)
            .is_some_and(|capabilities| capabilities.contains(&capability))
    }

    /// Returns a decision callers can render without attempting the change.
    pub fn decide(&self, user_id: &str, capability: ReadStateCapability) -> CapabilityDecision {
        let allowed = self.can(user_id, capability);
        CapabilityDecision {
            capability,
            allowed,
            reason: (!allowed).then(|| self.denial_reason.clone()),
        }
    }

    /// Fails with `CapabilityDenied` when the reader lacks the capability.
    pub fn assert_capability(
        &self,
        user_id: &str,
        capability: ReadStateCapability,
    ) -> Result<(), ReadStateError> {
        if self.can(user_id, capability) {
            return Ok(());
        }
        Err(ReadStateError::CapabilityDenied {
            capability,
            reason: self.denial_reason.clone(),
        })
    }
}
