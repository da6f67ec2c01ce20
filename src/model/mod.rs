//! Domain model for claims network analysis
//!
//! Typed identifiers, catalog entities, documents and mentions, and the
//! output records published to the serving layer.

pub mod entity;
pub mod records;
pub mod types;

pub use entity::{Document, Entity, EntityMention};
pub use records::{
    CommunityMemberRow, CommunitySummary, EntityClaimRow, EntityCommunityRow, EntityConnectionRow,
    EntityDetail, EntityRuleRow, EntityScoreRecord, RiskLevel,
};
pub use types::{ClaimId, DocumentId, EntityCategory, EntityFamily, EntityId};
