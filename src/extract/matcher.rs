//! Literal alias matcher
//!
//! Every catalog entity gets a short list of textual patterns: its canonical
//! name, the name with the "Dr. " honorific removed, and the name with the
//! " LLC" suffix removed. A document mentions an entity when any pattern is a
//! case-sensitive substring of its text. The first pattern that hits
//! registers the mention; the entity is not checked again in that document.
//!
//! Longer patterns are not preferred over shorter ones, so a name that is a
//! substring of another entity's name produces a mention for both. This is a
//! known accuracy limitation of substring matching.

use crate::model::{Document, Entity, EntityId, EntityMention};
use tracing::debug;

const HONORIFIC: &str = "Dr. ";
const CORPORATE_SUFFIX: &str = " LLC";

/// Substring matcher over a fixed entity catalog
#[derive(Debug, Clone)]
pub struct EntityMatcher {
    /// (entity, patterns) in catalog order
    patterns: Vec<(EntityId, Vec<String>)>,
}

impl EntityMatcher {
    pub fn new(entities: &[Entity]) -> Self {
        let patterns = entities
            .iter()
            .map(|e| (e.id.clone(), Self::patterns_for(e.id.as_str())))
            .collect();
        Self { patterns }
    }

    /// Textual patterns for one canonical name, in match order
    pub fn patterns_for(name: &str) -> Vec<String> {
        let mut patterns = vec![name.to_string()];

        for alias in [HONORIFIC, CORPORATE_SUFFIX] {
            if name.contains(alias) {
                let stripped = name.replace(alias, "");
                if !stripped.is_empty() {
                    patterns.push(stripped);
                }
            }
        }

        patterns
    }

    /// Entities mentioned in `text`, in catalog order, each at most once
    pub fn match_text(&self, text: &str) -> Vec<&EntityId> {
        self.patterns
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|p| text.contains(p.as_str())))
            .map(|(id, _)| id)
            .collect()
    }

    /// Mentions for one document
    pub fn match_document(&self, doc: &Document) -> Vec<EntityMention> {
        self.match_text(&doc.text)
            .into_iter()
            .map(|entity| EntityMention {
                document: doc.id.clone(),
                claim: doc.claim.clone(),
                entity: entity.clone(),
            })
            .collect()
    }

    /// Mentions for every document, in (document, catalog) order
    pub fn extract(&self, documents: &[Document]) -> Vec<EntityMention> {
        let mentions: Vec<EntityMention> = documents.iter().flat_map(|d| self.match_document(d)).collect();
        debug!(
            documents = documents.len(),
            mentions = mentions.len(),
            "Matched entity mentions"
        );
        mentions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityCategory;

    fn catalog() -> Vec<Entity> {
        vec![
            Entity::new("Dr. Jennifer Walsh", EntityCategory::Doctor, false),
            Entity::new("Sarah Thompson", EntityCategory::RegularPerson, false),
            Entity::new("Summit Construction LLC", EntityCategory::Business, false),
            Entity::new("Thompson & Associates Law", EntityCategory::Business, true),
        ]
    }

    #[test]
    fn test_patterns_for_aliases() {
        assert_eq!(
            EntityMatcher::patterns_for("Dr. Jennifer Walsh"),
            vec!["Dr. Jennifer Walsh", "Jennifer Walsh"]
        );
        assert_eq!(
            EntityMatcher::patterns_for("Summit Construction LLC"),
            vec!["Summit Construction LLC", "Summit Construction"]
        );
        assert_eq!(EntityMatcher::patterns_for("Lisa Chen"), vec!["Lisa Chen"]);
        assert_eq!(EntityMatcher::patterns_for("Dr. "), vec!["Dr. "]);
    }

    #[test]
    fn test_alias_resolves_to_canonical_entity_once() {
        let matcher = EntityMatcher::new(&catalog());
        let text = "Dr. Jennifer Walsh saw the claimant; Jennifer Walsh signed off.";

        let ids: Vec<&str> = matcher.match_text(text).iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["Dr. Jennifer Walsh"]);
    }

    #[test]
    fn test_stripped_suffix_matches() {
        let matcher = EntityMatcher::new(&catalog());
        let ids: Vec<&str> = matcher
            .match_text("Employer Summit Construction reviewing safety.")
            .iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(ids, vec!["Summit Construction LLC"]);
    }

    #[test]
    fn test_overlapping_names_both_match() {
        // No longest-match resolution: a short alias also fires inside a longer name
        let entities = vec![
            Entity::new("Dr. Lee", EntityCategory::Doctor, false),
            Entity::new("Lee Industries LLC", EntityCategory::Business, true),
        ];
        let matcher = EntityMatcher::new(&entities);

        let ids: Vec<&str> = matcher
            .match_text("Lee Industries LLC filed the first report of injury.")
            .iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(ids, vec!["Dr. Lee", "Lee Industries LLC"]);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let matcher = EntityMatcher::new(&catalog());
        assert!(matcher.match_text("sarah thompson called").is_empty());
    }

    #[test]
    fn test_no_match_is_empty() {
        let matcher = EntityMatcher::new(&catalog());
        let doc = Document::new("N1", "WC-1", "Routine closure, nothing to report.");
        assert!(matcher.match_document(&doc).is_empty());
    }

    #[test]
    fn test_extract_keeps_document_then_catalog_order() {
        let matcher = EntityMatcher::new(&catalog());
        let docs = vec![
            Document::new("N1", "WC-1", "Sarah Thompson treated by Jennifer Walsh."),
            Document::new("N2", "WC-2", "Thompson & Associates Law filed for Sarah Thompson."),
        ];
        let mentions = matcher.extract(&docs);

        let pairs: Vec<(&str, &str)> = mentions
            .iter()
            .map(|m| (m.document.as_str(), m.entity.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("N1", "Dr. Jennifer Walsh"),
                ("N1", "Sarah Thompson"),
                ("N2", "Sarah Thompson"),
                ("N2", "Thompson & Associates Law"),
            ]
        );
        assert_eq!(mentions[2].claim.as_str(), "WC-2");
    }
}
