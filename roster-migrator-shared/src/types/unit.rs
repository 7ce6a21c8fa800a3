use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// A unit row exactly as it is read from the source store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceUnitRecord {
    pub id: EntityId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Canonical organizational unit (e.g. a branch).
///
/// Equality is structural over every field and is what the reconciliation
/// step uses to decide between an update and a skip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Unit {
    pub id: EntityId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl From<SourceUnitRecord> for Unit {
    fn from(record: SourceUnitRecord) -> Self {
        Unit {
            id: record.id,
            name: record.name,
            address: record.address,
            city: record.city,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_record_maps_every_field() {
        let record = SourceUnitRecord {
            id: "SB001".to_string(),
            name: "Source Branch 1".to_string(),
            address: Some("1 Source St.".to_string()),
            city: None,
        };

        let unit = Unit::from(record);

        assert_eq!(unit.id, "SB001");
        assert_eq!(unit.name, "Source Branch 1");
        assert_eq!(unit.address.as_deref(), Some("1 Source St."));
        assert_eq!(unit.city, None);
    }

    #[test]
    fn test_units_differing_in_one_field_are_not_equal() {
        let a = Unit {
            id: "U1".to_string(),
            name: "A".to_string(),
            address: None,
            city: None,
        };
        let b = Unit {
            name: "B".to_string(),
            ..a.clone()
        };

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
