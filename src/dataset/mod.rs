//! Dataset sources
//!
//! A dataset is the entity catalog plus the claim-note collection. It can be
//! the static fixture, a seeded synthetic network, or a JSON file.

pub mod fixture;
pub mod synthetic;

pub use fixture::workers_comp_fixture;
pub use synthetic::{NetworkSizes, Preset, SyntheticGenerator};

use crate::model::{ClaimId, Document, DocumentId, Entity, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Dataset errors
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    #[error("Duplicate document id: {0}")]
    DuplicateDocument(DocumentId),

    #[error("Unknown dataset preset: {0}")]
    UnknownPreset(String),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// Entity catalog and claim notes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Dataset {
    pub fn new(entities: Vec<Entity>, documents: Vec<Document>) -> Self {
        Self { entities, documents }
    }

    /// Reject duplicate entity or document identifiers
    pub fn validate(&self) -> DatasetResult<()> {
        let mut seen = HashSet::with_capacity(self.entities.len());
        for entity in &self.entities {
            if !seen.insert(&entity.id) {
                return Err(DatasetError::DuplicateEntity(entity.id.clone()));
            }
        }

        let mut seen = HashSet::with_capacity(self.documents.len());
        for doc in &self.documents {
            if !seen.insert(&doc.id) {
                return Err(DatasetError::DuplicateDocument(doc.id.clone()));
            }
        }

        Ok(())
    }

    /// Distinct claim ids in document order
    pub fn claims(&self) -> Vec<ClaimId> {
        let mut seen = HashSet::new();
        self.documents
            .iter()
            .filter(|d| seen.insert(&d.claim))
            .map(|d| d.claim.clone())
            .collect()
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    /// Load and validate a dataset from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let dataset: Dataset = serde_json::from_reader(reader)?;
        dataset.validate()?;

        info!(
            path = %path.display(),
            entities = dataset.entities.len(),
            documents = dataset.documents.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }
}

/// Read a dataset from JSON
pub fn load_dataset_json(path: impl AsRef<Path>) -> DatasetResult<Dataset> {
    Dataset::from_json_file(path)
}

/// Where a pipeline run takes its dataset from
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    Fixture,
    Synthetic { preset: Preset, seed: u64 },
    File(PathBuf),
}

impl DatasetSource {
    pub fn load(&self) -> DatasetResult<Dataset> {
        match self {
            DatasetSource::Fixture => {
                let dataset = workers_comp_fixture();
                dataset.validate()?;
                Ok(dataset)
            }
            DatasetSource::Synthetic { preset, seed } => SyntheticGenerator::new(*preset, *seed).generate(),
            DatasetSource::File(path) => Dataset::from_json_file(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityCategory;
    use std::io::Write;

    #[test]
    fn test_validate_rejects_duplicates() {
        let dup_entity = Dataset::new(
            vec![
                Entity::new("A", EntityCategory::Doctor, false),
                Entity::new("A", EntityCategory::Lawyer, false),
            ],
            vec![],
        );
        assert!(matches!(dup_entity.validate(), Err(DatasetError::DuplicateEntity(_))));

        let dup_doc = Dataset::new(
            vec![Entity::new("A", EntityCategory::Doctor, false)],
            vec![Document::new("N1", "C1", "x"), Document::new("N1", "C2", "y")],
        );
        assert!(matches!(dup_doc.validate(), Err(DatasetError::DuplicateDocument(_))));
    }

    #[test]
    fn test_claims_are_distinct_in_order() {
        let dataset = Dataset::new(
            vec![],
            vec![
                Document::new("N1", "C2", ""),
                Document::new("N2", "C1", ""),
                Document::new("N3", "C2", ""),
            ],
        );
        assert_eq!(dataset.claims(), vec![ClaimId::from("C2"), ClaimId::from("C1")]);
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "entities": [{{"id": "Dr. Amy Lin", "category": "Doctor", "is_fraud": true}},
                             {{"id": "Bo Park", "category": "Regular Person"}}],
                "documents": [{{"id": "N1", "claim": "WC-1", "text": "Bo Park saw Amy Lin."}}]
            }}"#
        )
        .unwrap();

        let dataset = DatasetSource::File(file.path().to_path_buf()).load().unwrap();
        assert_eq!(dataset.entities.len(), 2);
        assert!(!dataset.entities[1].is_fraud);
        assert_eq!(dataset.documents[0].claim.as_str(), "WC-1");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_dataset_json("/nonexistent/claimnet/dataset.json");
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }
}
