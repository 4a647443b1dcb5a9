//! CSV yearly breakdown writer.

use crate::domain::error::FlowError;
use crate::domain::stats::DatasetStats;
use crate::ports::report_port::ReportPort;
use std::path::Path;

const HEADER: [&str; 9] = [
    "year",
    "weight_kg",
    "weight_tonnes",
    "weight_million_tonnes",
    "value_usd",
    "value_million_usd",
    "value_billion_usd",
    "countries",
    "flows",
];

/// One row per year, ascending.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write(&self, stats: &DatasetStats, output_path: &Path) -> Result<(), FlowError> {
        let to_write_error = |e: csv::Error| FlowError::Write {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut wtr = csv::Writer::from_path(output_path).map_err(to_write_error)?;
        wtr.write_record(HEADER).map_err(to_write_error)?;

        for (year, s) in &stats.yearly_totals {
            wtr.write_record([
                year.to_string(),
                s.weight_kg.to_string(),
                s.weight_tonnes.to_string(),
                s.weight_megatonnes.to_string(),
                s.value_usd.to_string(),
                s.value_million_usd.to_string(),
                s.value_billion_usd.to_string(),
                s.countries.to_string(),
                s.flows.to_string(),
            ])
            .map_err(to_write_error)?;
        }

        wtr.flush().map_err(|e| FlowError::Write {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
