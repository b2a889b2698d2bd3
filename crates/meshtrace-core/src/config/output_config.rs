//! Input/output artifact locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;

/// Artifact file locations. Relative paths resolve against the analysis root.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Analyzed-services list. Default: "analyzed_services.txt".
    pub analyzed_services_file: Option<String>,
    /// Interaction results artifact. Default: "interactions_results.json".
    pub interactions_file: Option<String>,
    /// Interaction chains artifact. Default: "interaction_chain.json".
    pub chains_file: Option<String>,
}

impl OutputConfig {
    pub fn analyzed_services_path(&self, root: &Path) -> PathBuf {
        resolve(
            root,
            self.analyzed_services_file
                .as_deref()
                .unwrap_or(constants::DEFAULT_ANALYZED_SERVICES_FILE),
        )
    }

    pub fn interactions_path(&self, root: &Path) -> PathBuf {
        resolve(
            root,
            self.interactions_file
                .as_deref()
                .unwrap_or(constants::DEFAULT_INTERACTIONS_FILE),
        )
    }

    pub fn chains_path(&self, root: &Path) -> PathBuf {
        resolve(
            root,
            self.chains_file
                .as_deref()
                .unwrap_or(constants::DEFAULT_CHAINS_FILE),
        )
    }
}

fn resolve(root: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
