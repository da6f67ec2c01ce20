//! Catalog entities, claim notes, and the mentions linking them

use super::types::{ClaimId, DocumentId, EntityCategory, EntityId};
use serde::{Deserialize, Serialize};

/// A named participant in the claims corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub category: EntityCategory,
    /// Ground-truth fraud flag; used for reporting only, never for scoring
    #[serde(default)]
    pub is_fraud: bool,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, category: EntityCategory, is_fraud: bool) -> Self {
        Self {
            id: id.into(),
            category,
            is_fraud,
        }
    }
}

/// A free-text claim note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub claim: ClaimId,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, claim: impl Into<ClaimId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            claim: claim.into(),
            text: text.into(),
        }
    }
}

/// One detected occurrence of an entity in a document.
///
/// At most one mention exists per (document, entity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntityMention {
    pub document: DocumentId,
    pub claim: ClaimId,
    pub entity: EntityId,
}
