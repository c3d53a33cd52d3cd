use crate::model::{SystemAnnotation, SystemModel, TransitionModel, TransitionParseError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document {path}")]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed transition table {path}")]
    Transitions {
        path: PathBuf,
        #[source]
        source: TransitionParseError,
    },
}

/// Reads and writes one version directory (`v{n}`) holding the three
/// documents that make up a snapshot: system model, annotation graph and
/// transition table.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    versions_dir: PathBuf,
    system_model_file: String,
    annotation_file: String,
    transitions_file: String,
}

impl SnapshotStore {
    pub fn new(
        versions_dir: impl Into<PathBuf>,
        system_model_file: impl Into<String>,
        annotation_file: impl Into<String>,
        transitions_file: impl Into<String>,
    ) -> Self {
        Self {
            versions_dir: versions_dir.into(),
            system_model_file: system_model_file.into(),
            annotation_file: annotation_file.into(),
            transitions_file: transitions_file.into(),
        }
    }

    pub fn version_dir(&self, version: u32) -> PathBuf {
        self.versions_dir.join(format!("v{}", version))
    }

    pub fn load_version(
        &self,
        version: u32,
    ) -> Result<(SystemModel, SystemAnnotation, TransitionModel), SnapshotError> {
        let dir = self.version_dir(version);

        let system = Self::read_document(&dir.join(&self.system_model_file))?;
        let annotation = Self::read_document(&dir.join(&self.annotation_file))?;

        let transitions_path = dir.join(&self.transitions_file);
        let text = fs::read_to_string(&transitions_path).map_err(|source| SnapshotError::Read {
            path: transitions_path.clone(),
            source,
        })?;
        let transitions =
            TransitionModel::parse(&text).map_err(|source| SnapshotError::Transitions {
                path: transitions_path,
                source,
            })?;

        Ok((system, annotation, transitions))
    }

    pub fn save_version(
        &self,
        version: u32,
        system: &SystemModel,
        annotation: &SystemAnnotation,
        transitions: &TransitionModel,
    ) -> Result<(), SnapshotError> {
        let dir = self.version_dir(version);
        fs::create_dir_all(&dir).map_err(|source| SnapshotError::Write {
            path: dir.clone(),
            source,
        })?;

        Self::write_document(&dir.join(&self.system_model_file), system)?;
        Self::write_document(&dir.join(&self.annotation_file), annotation)?;

        let transitions_path = dir.join(&self.transitions_file);
        fs::write(&transitions_path, transitions.serialize()).map_err(|source| {
            SnapshotError::Write {
                path: transitions_path,
                source,
            }
        })?;

        Ok(())
    }

    fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
        let text = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SnapshotError::Document {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_document<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
        let mut text =
            serde_json::to_string_pretty(value).map_err(|source| SnapshotError::Document {
                path: path.to_path_buf(),
                source,
            })?;
        text.push('\n');
        fs::write(path, text).map_err(|source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpInterface, HttpParameter, HttpParameterKind};

    fn snapshot_store(dir: &Path) -> SnapshotStore {
        SnapshotStore::new(
            dir,
            "system-model.json",
            "annotation.json",
            "allowed-transitions.csv",
        )
    }

    fn small_system() -> SystemModel {
        SystemModel {
            id: "system".to_string(),
            interfaces: vec![HttpInterface {
                id: "aGET".to_string(),
                domain: "localhost".to_string(),
                protocol: "http".to_string(),
                method: "GET".to_string(),
                port: "8080".to_string(),
                encoding: "UTF-8".to_string(),
                headers: Vec::new(),
                path: "/a".to_string(),
                parameters: vec![HttpParameter {
                    id: "a_id_REQ_PARAM".to_string(),
                    name: "id".to_string(),
                    kind: HttpParameterKind::ReqParam,
                }],
            }],
        }
    }

    #[test]
    fn save_then_load_restores_all_three_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = snapshot_store(dir.path());

        let system = small_system();
        let annotation = SystemAnnotation {
            id: "ANN".to_string(),
            inputs: Vec::new(),
            interface_annotations: Vec::new(),
        };
        let transitions = TransitionModel::parse("aGET,aGET\n").expect("table should parse");

        store
            .save_version(2, &system, &annotation, &transitions)
            .expect("save should succeed");

        let (loaded_system, loaded_annotation, loaded_transitions) =
            store.load_version(2).expect("load should succeed");
        assert_eq!(loaded_system, system);
        assert_eq!(loaded_annotation, annotation);
        assert_eq!(loaded_transitions, transitions);
    }

    #[test]
    fn load_of_missing_version_reports_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = snapshot_store(dir.path());

        match store.load_version(7) {
            Err(SnapshotError::Read { path, .. }) => {
                assert!(path.ends_with("v7/system-model.json"));
            }
            other => panic!("expected a read error, got {:?}", other),
        }
    }
}
