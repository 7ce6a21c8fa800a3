use std::fmt;

use serde::{Deserialize, Serialize};

/// The two entity kinds the migration moves, in phase order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Unit,
    Member,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Unit => "unit",
            EntityKind::Member => "member",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-record decision taken by reconciliation, without its payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Create,
    Update,
    SkipIdentical,
    SkipInvalid,
}

/// Why a record was rejected for the current run.
///
/// Rejections are expected on real data and never fail a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The source member carries no unit linkage at all.
    NoSourceUnitReference,
    /// The linked unit does not exist in the target store.
    TargetUnitMissing { unit_id: String },
    /// The source state column is outside the closed set.
    UnrecognizedMemberState { value: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoSourceUnitReference => write!(f, "no source unit reference"),
            SkipReason::TargetUnitMissing { unit_id } => {
                write!(f, "target unit missing: {}", unit_id)
            }
            SkipReason::UnrecognizedMemberState { value } => {
                write!(f, "unrecognized member state: {}", value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_messages() {
        assert_eq!(
            SkipReason::NoSourceUnitReference.to_string(),
            "no source unit reference"
        );
        assert_eq!(
            SkipReason::TargetUnitMissing { unit_id: "SB404".to_string() }.to_string(),
            "target unit missing: SB404"
        );
    }
}
