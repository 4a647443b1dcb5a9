#![allow(dead_code)]

use plastic_flows::domain::error::FlowError;
pub use plastic_flows::domain::flow::{FlowRecord, FlowsByYear};
use plastic_flows::domain::raw_record::RawTradeRecord;
use plastic_flows::domain::stats::DatasetStats;
use plastic_flows::ports::data_port::DataPort;
use plastic_flows::ports::report_port::ReportPort;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory data port keyed by path.
pub struct MockDataPort {
    pub raw: HashMap<PathBuf, Vec<RawTradeRecord>>,
    pub flows: HashMap<PathBuf, FlowsByYear>,
    pub documents: HashMap<PathBuf, Value>,
    pub saved: RefCell<HashMap<PathBuf, FlowsByYear>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            raw: HashMap::new(),
            flows: HashMap::new(),
            documents: HashMap::new(),
            saved: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_raw(mut self, path: &str, records: Vec<Value>) -> Self {
        let records = records.into_iter().map(RawTradeRecord::from_value).collect();
        self.raw.insert(PathBuf::from(path), records);
        self
    }

    pub fn with_flows(mut self, path: &str, flows: FlowsByYear) -> Self {
        self.flows.insert(PathBuf::from(path), flows);
        self
    }

    pub fn with_document(mut self, path: &str, document: Value) -> Self {
        self.documents.insert(PathBuf::from(path), document);
        self
    }

    pub fn saved_flows(&self, path: &str) -> Option<FlowsByYear> {
        self.saved.borrow().get(Path::new(path)).cloned()
    }
}

fn not_found(path: &Path) -> FlowError {
    FlowError::FileNotFound {
        path: path.to_path_buf(),
    }
}

impl DataPort for MockDataPort {
    fn load_raw_records(&self, path: &Path) -> Result<Vec<RawTradeRecord>, FlowError> {
        self.raw.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn load_flows(&self, path: &Path) -> Result<FlowsByYear, FlowError> {
        self.flows.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn save_flows(&self, flows: &FlowsByYear, path: &Path) -> Result<(), FlowError> {
        self.saved
            .borrow_mut()
            .insert(path.to_path_buf(), flows.clone());
        Ok(())
    }

    fn load_document(&self, path: &Path) -> Result<Value, FlowError> {
        self.documents.get(path).cloned().ok_or_else(|| not_found(path))
    }
}

/// Report port that always fails to write.
pub struct FailingReport;

impl ReportPort for FailingReport {
    fn write(&self, _stats: &DatasetStats, output_path: &Path) -> Result<(), FlowError> {
        Err(FlowError::Write {
            path: output_path.to_path_buf(),
            reason: "disk full".into(),
        })
    }
}

/// Report port that records how many times it was asked to write.
pub struct CountingReport {
    pub writes: RefCell<usize>,
}

impl CountingReport {
    pub fn new() -> Self {
        Self {
            writes: RefCell::new(0),
        }
    }
}

impl ReportPort for CountingReport {
    fn write(&self, _stats: &DatasetStats, _output_path: &Path) -> Result<(), FlowError> {
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

/// A raw export record that passes every acceptance condition.
pub fn raw_export(year: i64, reporter: &str, partner: &str, value: f64, qty: f64) -> Value {
    json!({
        "refYear": year,
        "reporterISO": reporter,
        "reporterDesc": format!("{reporter} name"),
        "partnerISO": partner,
        "partnerDesc": format!("{partner} name"),
        "primaryValue": value,
        "qty": qty,
        "cmdCode": "3915",
        "flowDesc": "Export"
    })
}

pub fn make_flow(year: i32, source: &str, target: &str, weight_kg: f64, trade_value: f64) -> FlowRecord {
    FlowRecord {
        year,
        source_country: source.to_string(),
        source_name: source.to_string(),
        source_lat: 0.0,
        source_lon: 0.0,
        target_country: target.to_string(),
        target_name: target.to_string(),
        target_lat: 0.0,
        target_lon: 0.0,
        trade_value,
        weight_kg,
    }
}

pub fn group(flows: Vec<FlowRecord>) -> FlowsByYear {
    let mut map = FlowsByYear::new();
    for flow in flows {
        map.entry(flow.year).or_default().push(flow);
    }
    map
}

/// The two-year USA/CAN/MEX example used across the tests.
pub fn two_year_flows() -> FlowsByYear {
    group(vec![
        make_flow(2020, "USA", "CAN", 2000.0, 500.0),
        make_flow(2021, "USA", "MEX", 4000.0, 1000.0),
    ])
}

pub fn write_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
