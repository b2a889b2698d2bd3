//! JSON artifact persistence.

use std::path::Path;

use meshtrace_core::errors::{PipelineError, ScanError};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::chains::ChainForest;
use crate::interactions::InteractionResults;

/// Write `value` as pretty JSON. The document is written to a sibling
/// temporary file first and renamed into place, so a failed write never
/// leaves a truncated artifact behind.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let write_err = |message: String| PipelineError::ArtifactWrite {
        path: path.to_path_buf(),
        message,
    };

    let json = serde_json::to_string_pretty(value).map_err(|e| write_err(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, json).map_err(|e| write_err(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| write_err(e.to_string()))?;

    tracing::info!(path = %path.display(), "artifact written");
    Ok(())
}

/// Read a JSON artifact. A missing file is a missing required input.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    if !path.is_file() {
        return Err(ScanError::MissingInput {
            path: path.to_path_buf(),
        }
        .into());
    }
    let text = std::fs::read_to_string(path).map_err(|e| PipelineError::ArtifactRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| PipelineError::ArtifactRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn read_interactions(path: &Path) -> Result<InteractionResults, PipelineError> {
    read_json(path)
}

pub fn read_chains(path: &Path) -> Result<ChainForest, PipelineError> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::OutboundCallSite;
    use meshtrace_core::HttpVerb;

    #[test]
    fn interactions_survive_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("interactions_results.json");
        let results = InteractionResults::from_call_sites(vec![OutboundCallSite::new(
            "a", "A.m", "b", "/x", HttpVerb::Delete,
        )]);

        write_json(&path, &results).unwrap();
        assert_eq!(read_interactions(&path).unwrap(), results);
        assert!(!dir.path().join("out").join("interactions_results.json.tmp").exists());
    }

    #[test]
    fn missing_artifact_is_missing_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_chains(&dir.path().join("interaction_chain.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Scan(ScanError::MissingInput { .. })));
    }

    #[test]
    fn malformed_artifact_is_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("interaction_chain.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_chains(&path), Err(PipelineError::ArtifactRead { .. })));
    }
}
