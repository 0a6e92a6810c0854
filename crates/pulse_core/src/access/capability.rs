//! Read-state capability declarations.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Read-state change a caller may ask permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadStateCapability {
    MarkRead,
    MarkUnread,
}

impl ReadStateCapability {
    /// Stable string id used in policy declarations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MarkRead => READ_STATE_CAPABILITY_MARK_READ,
            Self::MarkUnread => READ_STATE_CAPABILITY_MARK_UNREAD,
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::MarkRead => "Allow recording that a reader has read an article or topic.",
            Self::MarkUnread => "Allow clearing a reader's read mark from an article or topic.",
        }
    }
}

/// Declaration string for mark-read capability.
pub const READ_STATE_CAPABILITY_MARK_READ: &str = "mark_read";
/// Declaration string for mark-unread capability.
pub const READ_STATE_CAPABILITY_MARK_UNREAD: &str = "mark_unread";

const SUPPORTED_READ_STATE_CAPABILITY_STRINGS: &[&str] = &[
    READ_STATE_CAPABILITY_MARK_READ,
    READ_STATE_CAPABILITY_MARK_UNREAD,
];

/// Returns supported capability declaration strings.
pub fn supported_read_state_capability_strings() -> &'static [&'static str] {
    SUPPORTED_READ_STATE_CAPABILITY_STRINGS
}

/// Parses one capability from its declaration string.
pub fn parse_read_state_capability(
    value: &str,
) -> Result<ReadStateCapability, ReadStateCapabilityError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(ReadStateCapabilityError::EmptyCapability);
    }

    match normalized {
        READ_STATE_CAPABILITY_MARK_READ => Ok(ReadStateCapability::MarkRead),
        READ_STATE_CAPABILITY_MARK_UNREAD => Ok(ReadStateCapability::MarkUnread),
        other => Err(ReadStateCapabilityError::UnsupportedCapability(
            other.to_string(),
        )),
    }
}

/// Capability parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStateCapabilityError {
    EmptyCapability,
    UnsupportedCapability(String),
}

impl Display for ReadStateCapabilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCapability => write!(f, "read-state capability value must not be empty"),
            Self::UnsupportedCapability(value) => {
                write!(f, "read-state capability is unsupported: {value}")
            }
        }
    }
}

impl Error for ReadStateCapabilityError {}

#[cfg(test)]
mod tests {
    use super::{
        parse_read_state_capability, supported_read_state_capability_strings,
        ReadStateCapability, ReadStateCapabilityError,
    };

    #[test]
    fn parses_supported_capabilities() {
        assert_eq!(
            parse_read_state_capability("mark_read").expect("mark_read parse"),
            ReadStateCapability::MarkRead
        );
        assert_eq!(
            parse_read_state_capability(" mark_unread ").expect("mark_unread parse"),
            ReadStateCapability::MarkUnread
        );
    }

    #[test]
    fn rejects_empty_and_unknown_capabilities() {
        assert_eq!(
            parse_read_state_capability("  ").expect_err("empty must fail"),
            ReadStateCapabilityError::EmptyCapability
        );
        assert_eq!(
            parse_read_state_capability("Mark_Read").expect_err("case must match"),
            ReadStateCapabilityError::UnsupportedCapability("Mark_Read".to_string())
        );
    }

    #[test]
    fn declaration_strings_round_trip_through_as_str() {
        for value in supported_read_state_capability_strings() {
            let capability = parse_read_state_capability(value).expect("supported value");
            assert_eq!(capability.as_str(), *value);
            assert!(!capability.description().is_empty());
        }
    }
}
