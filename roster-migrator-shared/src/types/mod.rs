mod action;
mod counts;
mod error_chain;
mod member;
mod run;
mod unit;

pub use action::{Action, EntityKind, SkipReason};
pub use counts::{EntityCounts, PhaseCounts};
pub use error_chain::ErrorChain;
pub use member::{Member, MemberState, SourceMemberRecord, UnknownMemberState};
pub use run::{MigrationResult, RunId, RunStatus};
pub use unit::{SourceUnitRecord, Unit};

/// Identifier shared by units and members. Stable across both stores.
pub type EntityId = String;
