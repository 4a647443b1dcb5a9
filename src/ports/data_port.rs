//! Trade data storage port trait.

use crate::domain::error::FlowError;
use crate::domain::flow::FlowsByYear;
use crate::domain::raw_record::RawTradeRecord;
use serde_json::Value;
use std::path::Path;

pub trait DataPort {
    /// Reads one raw export file (a JSON array of trade records).
    fn load_raw_records(&self, path: &Path) -> Result<Vec<RawTradeRecord>, FlowError>;

    fn load_flows(&self, path: &Path) -> Result<FlowsByYear, FlowError>;

    fn save_flows(&self, flows: &FlowsByYear, path: &Path) -> Result<(), FlowError>;

    /// Reads any JSON document without interpreting it.
    fn load_document(&self, path: &Path) -> Result<Value, FlowError>;
}
