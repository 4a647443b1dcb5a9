//! JSON analysis snapshot writer.

use crate::domain::error::FlowError;
use crate::domain::stats::{DatasetStats, YearlyStats};
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The persisted result layout. Years appear as strings, both as
/// `yearly_totals` keys and in the peak-year fields.
#[derive(Serialize)]
struct AnalysisSnapshot<'a> {
    dataset_span: Option<String>,
    total_years: usize,
    avg_annual_tonnes_million: Option<f64>,
    avg_annual_value_billion: Option<f64>,
    total_countries: usize,
    total_weight_million_tonnes: f64,
    total_value_billion: f64,
    total_flows: usize,
    yearly_totals: &'a BTreeMap<i32, YearlyStats>,
    peak_weight_year: Option<String>,
    peak_value_year: Option<String>,
    growth_rate_percent: Option<f64>,
}

impl<'a> From<&'a DatasetStats> for AnalysisSnapshot<'a> {
    fn from(stats: &'a DatasetStats) -> Self {
        Self {
            dataset_span: stats.dataset_span(),
            total_years: stats.total_years,
            avg_annual_tonnes_million: stats.avg_annual_megatonnes,
            avg_annual_value_billion: stats.avg_annual_value_billion,
            total_countries: stats.total_countries,
            total_weight_million_tonnes: stats.total_weight_megatonnes(),
            total_value_billion: stats.total_value_billion(),
            total_flows: stats.total_flows,
            yearly_totals: &stats.yearly_totals,
            peak_weight_year: stats.peak_weight_year.map(|y| y.to_string()),
            peak_value_year: stats.peak_value_year.map(|y| y.to_string()),
            growth_rate_percent: stats.growth_rate_percent,
        }
    }
}

/// Renders the snapshot as pretty-printed JSON.
pub fn render(stats: &DatasetStats) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&AnalysisSnapshot::from(stats))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(&self, stats: &DatasetStats, output_path: &Path) -> Result<(), FlowError> {
        let to_write_error = |reason: String| FlowError::Write {
            path: output_path.to_path_buf(),
            reason,
        };
        let json = render(stats).map_err(|e| to_write_error(e.to_string()))?;
        fs::write(output_path, json).map_err(|e| to_write_error(e.to_string()))
    }
}
