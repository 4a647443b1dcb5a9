//! Locates the normalized flows file on disk.

use crate::domain::error::FlowError;
use std::path::{Path, PathBuf};

pub const DEFAULT_FLOWS_FILE: &str = "plastic_waste_flows2.json";

/// An explicit path, or candidates probed in order.
#[derive(Debug, Clone, PartialEq)]
pub enum DataLocation {
    Explicit(PathBuf),
    Candidates(Vec<PathBuf>),
}

impl DataLocation {
    /// The working directory, `data/`, and the parent directory.
    pub fn default_candidates() -> Self {
        DataLocation::Candidates(
            [
                DEFAULT_FLOWS_FILE.to_string(),
                format!("data/{DEFAULT_FLOWS_FILE}"),
                format!("./{DEFAULT_FLOWS_FILE}"),
                format!("../{DEFAULT_FLOWS_FILE}"),
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        )
    }

    /// An explicit path is returned as is; its absence surfaces when it is read.
    pub fn resolve(&self) -> Result<PathBuf, FlowError> {
        match self {
            DataLocation::Explicit(path) => Ok(path.clone()),
            DataLocation::Candidates(candidates) => {
                for candidate in candidates {
                    if Path::new(candidate).is_file() {
                        tracing::info!(path = %candidate.display(), "found data file");
                        return Ok(candidate.clone());
                    }
                    tracing::debug!(path = %candidate.display(), "candidate not present");
                }
                Err(FlowError::DataNotFound {
                    candidates: candidates.clone(),
                })
            }
        }
    }
}
