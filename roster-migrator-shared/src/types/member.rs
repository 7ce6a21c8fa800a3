use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::EntityId;

/// Access state of a member. Closed set: no other value is representable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberState {
    Authorized,
    Denied,
}

impl MemberState {
    /// Returns the storage representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberState::Authorized => "AUTHORIZED",
            MemberState::Denied => "DENIED",
        }
    }
}

impl fmt::Display for MemberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored state string is outside the closed set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown member state: {0}")]
pub struct UnknownMemberState(pub String);

impl FromStr for MemberState {
    type Err = UnknownMemberState;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "AUTHORIZED" => Ok(MemberState::Authorized),
            "DENIED" => Ok(MemberState::Denied),
            other => Err(UnknownMemberState(other.to_string())),
        }
    }
}

/// A member row exactly as it is read from the source store.
///
/// `state` is kept as the raw column value and `unit_id` as the raw linkage,
/// both are validated during reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceMemberRecord {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub external_key: String,
    pub state: String,
    pub unit_id: Option<EntityId>,
}

impl SourceMemberRecord {
    /// The unit linkage, with blank identifiers treated as absent.
    ///
    /// A non-blank identifier is returned verbatim, padding included, so it
    /// only resolves against a unit stored under exactly that id.
    pub fn unit_link(&self) -> Option<&str> {
        self.unit_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Canonical member (e.g. a user) of a unit.
///
/// `unit_ref` holds only the id of the linked unit, so two members compare
/// equal regardless of the linked unit's own mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub external_key: String,
    pub state: MemberState,
    pub unit_ref: Option<EntityId>,
}

impl Member {
    /// Returns a copy of the member linked to the given unit.
    pub fn with_unit(self, unit_id: impl Into<EntityId>) -> Self {
        Member {
            unit_ref: Some(unit_id.into()),
            ..self
        }
    }
}

impl TryFrom<SourceMemberRecord> for Member {
    type Error = UnknownMemberState;

    /// Maps the raw record. The unit linkage is carried over as-is; resolving
    /// it against the target store is the caller's job.
    fn try_from(record: SourceMemberRecord) -> Result<Self, Self::Error> {
        let state = record.state.parse::<MemberState>()?;
        let unit_ref = record.unit_link().map(str::to_string);
        Ok(Member {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            phone: record.phone,
            external_key: record.external_key,
            state,
            unit_ref,
        })
    }
}
