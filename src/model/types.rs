//! Core type definitions for the claims network

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

string_id!(
    /// Canonical entity name (e.g., "Dr. Michael Rodriguez", "Summit Construction LLC")
    EntityId
);

string_id!(
    /// Claim number (e.g., "WC-2024-0001"); many documents share one claim
    ClaimId
);

string_id!(
    /// Claim note identifier
    DocumentId
);

/// Entity category as recorded in the entity catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum EntityCategory {
    #[serde(rename = "Doctor")]
    Doctor,
    #[serde(rename = "Lawyer")]
    Lawyer,
    #[serde(rename = "Business")]
    Business,
    #[serde(rename = "Regular Person")]
    RegularPerson,
    #[serde(rename = "Driver")]
    Driver,
}

/// Broad role an entity category plays in a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFamily {
    MedicalProvider,
    LegalRepresentative,
    Business,
    Claimant,
}

impl EntityFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityFamily::MedicalProvider => "medical_provider",
            EntityFamily::LegalRepresentative => "legal_representative",
            EntityFamily::Business => "business",
            EntityFamily::Claimant => "claimant",
        }
    }
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 5] = [
        EntityCategory::Doctor,
        EntityCategory::Lawyer,
        EntityCategory::Business,
        EntityCategory::RegularPerson,
        EntityCategory::Driver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Doctor => "Doctor",
            EntityCategory::Lawyer => "Lawyer",
            EntityCategory::Business => "Business",
            EntityCategory::RegularPerson => "Regular Person",
            EntityCategory::Driver => "Driver",
        }
    }

    pub fn family(&self) -> EntityFamily {
        match self {
            EntityCategory::Doctor => EntityFamily::MedicalProvider,
            EntityCategory::Lawyer => EntityFamily::LegalRepresentative,
            EntityCategory::Business => EntityFamily::Business,
            EntityCategory::RegularPerson | EntityCategory::Driver => EntityFamily::Claimant,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityCategory::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown entity category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id() {
        let id = EntityId::new("Dr. Lisa Patel");
        assert_eq!(id.as_str(), "Dr. Lisa Patel");
        assert_eq!(format!("{}", id), "Dr. Lisa Patel");

        let id2: EntityId = "Tony Ricci".into();
        assert!(id < id2);
    }

    #[test]
    fn test_claim_id_serializes_as_string() {
        let id = ClaimId::new("WC-2024-001");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"WC-2024-001\"");
    }

    #[test]
    fn test_category_names() {
        assert_eq!(
            serde_json::to_string(&EntityCategory::RegularPerson).unwrap(),
            "\"Regular Person\""
        );
        assert_eq!("driver".parse::<EntityCategory>(), Ok(EntityCategory::Driver));
        assert!("Nurse".parse::<EntityCategory>().is_err());
    }

    #[test]
    fn test_category_family() {
        assert_eq!(EntityCategory::Doctor.family(), EntityFamily::MedicalProvider);
        assert_eq!(EntityCategory::Driver.family(), EntityFamily::Claimant);
        assert_eq!(EntityCategory::RegularPerson.family(), EntityFamily::Claimant);

        for category in EntityCategory::ALL {
            let family = category.family();
            assert_eq!(
                serde_json::to_string(&family).unwrap(),
                format!("\"{}\"", family.as_str())
            );
        }
    }
}
