use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::{Application, Opportunity, Student};

/// Student, opportunity and application records used to hydrate the record stores.
///
/// Loaded from JSON shaped as `{ "students": [...], "opportunities": [...],
/// "applications": [...] }`. Applications may reference records that are not part of the
/// dataset; those links resolve to nothing at scoring time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDataset {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl MatchDataset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let dataset: MatchDataset = serde_json::from_reader(reader)?;
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<(), DatasetError> {
        let mut seen = HashSet::new();
        for student in &self.students {
            if !seen.insert(&student.id.0) {
                return Err(DatasetError::DuplicateId {
                    kind: "student",
                    id: student.id.0.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for opportunity in &self.opportunities {
            if !seen.insert(&opportunity.id.0) {
                return Err(DatasetError::DuplicateId {
                    kind: "opportunity",
                    id: opportunity.id.0.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for application in &self.applications {
            if !seen.insert(&application.id.0) {
                return Err(DatasetError::DuplicateId {
                    kind: "application",
                    id: application.id.0.clone(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unable to read dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} id '{id}' in dataset")]
    DuplicateId { kind: &'static str, id: String },
}
