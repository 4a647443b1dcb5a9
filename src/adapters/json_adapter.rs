//! JSON file data adapter.

use crate::domain::error::FlowError;
use crate::domain::flow::FlowsByYear;
use crate::domain::raw_record::RawTradeRecord;
use crate::ports::data_port::DataPort;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileAdapter;

impl JsonFileAdapter {
    pub fn new() -> Self {
        Self
    }

    fn read<T: DeserializeOwned>(path: &Path) -> Result<T, FlowError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FlowError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => FlowError::Io(e),
        })?;
        serde_json::from_str(&content).map_err(|e| FlowError::JsonParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl DataPort for JsonFileAdapter {
    fn load_raw_records(&self, path: &Path) -> Result<Vec<RawTradeRecord>, FlowError> {
        let elements: Vec<Value> = Self::read(path)?;
        let malformed = elements.iter().filter(|v| !v.is_object()).count();
        if malformed > 0 {
            tracing::debug!(path = %path.display(), malformed, "non-object elements in export");
        }
        let records: Vec<RawTradeRecord> =
            elements.into_iter().map(RawTradeRecord::from_value).collect();
        tracing::info!(path = %path.display(), records = records.len(), "loaded raw records");
        Ok(records)
    }

    fn load_flows(&self, path: &Path) -> Result<FlowsByYear, FlowError> {
        let flows: FlowsByYear = Self::read(path)?;
        tracing::info!(path = %path.display(), years = flows.len(), "loaded flows");
        Ok(flows)
    }

    fn save_flows(&self, flows: &FlowsByYear, path: &Path) -> Result<(), FlowError> {
        let json = serde_json::to_string(flows).map_err(|e| FlowError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| FlowError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn load_document(&self, path: &Path) -> Result<Value, FlowError> {
        Self::read(path)
    }
}
