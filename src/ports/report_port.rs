//! Report generation port trait.

use crate::domain::error::FlowError;
use crate::domain::stats::DatasetStats;
use std::path::Path;

/// Port for persisting an analysis result.
pub trait ReportPort {
    fn write(&self, stats: &DatasetStats, output_path: &Path) -> Result<(), FlowError>;
}
