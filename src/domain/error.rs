//! Domain error types.

use std::path::PathBuf;

/// Top-level error type for plastic-flows.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("invalid JSON in {}: {reason}", path.display())]
    JsonParse { path: PathBuf, reason: String },

    #[error("could not find data file, searched: {}", format_candidates(candidates))]
    DataNotFound { candidates: Vec<PathBuf> },

    #[error("no flows recorded for year {year}")]
    UnknownYear { year: i32 },

    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("write error for {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&FlowError> for std::process::ExitCode {
    fn from(err: &FlowError) -> Self {
        let code: u8 = match err {
            FlowError::Io(_) | FlowError::Write { .. } => 1,
            FlowError::ConfigParse { .. }
            | FlowError::ConfigMissing { .. }
            | FlowError::ConfigInvalid { .. } => 2,
            FlowError::FileNotFound { .. } | FlowError::JsonParse { .. } => 3,
            FlowError::DataNotFound { .. } | FlowError::UnknownYear { .. } => 4,
            FlowError::InvalidArgument { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_not_found_lists_every_candidate() {
        let err = FlowError::DataNotFound {
            candidates: vec![PathBuf::from("a.json"), PathBuf::from("data/a.json")],
        };
        assert_eq!(
            err.to_string(),
            "could not find data file, searched: a.json, data/a.json"
        );
    }

    #[test]
    fn file_errors_display_path() {
        let err = FlowError::JsonParse {
            path: PathBuf::from("flows.json"),
            reason: "expected value at line 1 column 1".into(),
        };
        assert!(err.to_string().starts_with("invalid JSON in flows.json"));
    }
}
