//! Raw trade record filtering and enrichment.
//!
//! Records are checked against the acceptance conditions in a fixed order;
//! the first failing condition rejects the record and is counted. Rejection
//! never raises an error.

use super::coordinates::CountryCoordinates;
use super::flow::{FlowRecord, FlowsByYear, insert_flow};
use super::raw_record::RawTradeRecord;
use std::collections::BTreeMap;
use std::fmt;

/// Commodity and direction filter applied to every raw record.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Compared against the record's commodity code as an exact string.
    pub commodity_code: String,
    /// Matched case-insensitively as a substring of the flow description.
    pub flow_keyword: String,
    /// Partner codes that denote an all-partners aggregate.
    pub world_codes: Vec<String>,
    pub world_name: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            commodity_code: "3915".to_string(),
            flow_keyword: "export".to_string(),
            world_codes: vec!["W00".to_string(), "0".to_string()],
            world_name: "World".to_string(),
        }
    }
}

/// The acceptance condition a rejected record failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RejectReason {
    MissingKey,
    CommodityMismatch,
    NotExport,
    InvalidTradeValue,
    InvalidQuantity,
    SelfTrade,
    WorldAggregate,
    UnknownCoordinates,
}

impl RejectReason {
    pub const ALL: [RejectReason; 8] = [
        RejectReason::MissingKey,
        RejectReason::CommodityMismatch,
        RejectReason::NotExport,
        RejectReason::InvalidTradeValue,
        RejectReason::InvalidQuantity,
        RejectReason::SelfTrade,
        RejectReason::WorldAggregate,
        RejectReason::UnknownCoordinates,
    ];
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RejectReason::MissingKey => "missing year or country code",
            RejectReason::CommodityMismatch => "commodity code mismatch",
            RejectReason::NotExport => "not an export",
            RejectReason::InvalidTradeValue => "non-positive trade value",
            RejectReason::InvalidQuantity => "non-positive quantity",
            RejectReason::SelfTrade => "reporter equals partner",
            RejectReason::WorldAggregate => "world aggregate partner",
            RejectReason::UnknownCoordinates => "no coordinates for country",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOutcome {
    pub flows: FlowsByYear,
    pub accepted: usize,
    pub rejected: usize,
    pub rejections: BTreeMap<RejectReason, usize>,
}

impl NormalizeOutcome {
    pub fn input_count(&self) -> usize {
        self.accepted + self.rejected
    }

    pub fn rejections_for(&self, reason: RejectReason) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }
}

pub struct Normalizer<'a> {
    filter: &'a FilterConfig,
    coordinates: &'a CountryCoordinates,
}

impl<'a> Normalizer<'a> {
    pub fn new(filter: &'a FilterConfig, coordinates: &'a CountryCoordinates) -> Self {
        Self {
            filter,
            coordinates,
        }
    }

    /// Validates a single record and builds its flow.
    pub fn normalize_record(&self, record: &RawTradeRecord) -> Result<FlowRecord, RejectReason> {
        let (year, source_code, target_code) =
            match (record.year(), record.reporter_code(), record.partner_code()) {
                (Some(year), Some(source), Some(target)) => (year, source, target),
                _ => return Err(RejectReason::MissingKey),
            };

        if record.commodity_code() != self.filter.commodity_code {
            return Err(RejectReason::CommodityMismatch);
        }

        let keyword = self.filter.flow_keyword.to_lowercase();
        match record.flow_description() {
            Some(desc) if desc.to_lowercase().contains(&keyword) => {}
            _ => return Err(RejectReason::NotExport),
        }

        let trade_value = record
            .trade_value()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or(RejectReason::InvalidTradeValue)?;
        let weight_kg = record
            .quantity()
            .filter(|q| q.is_finite() && *q > 0.0)
            .ok_or(RejectReason::InvalidQuantity)?;

        if source_code == target_code {
            return Err(RejectReason::SelfTrade);
        }

        let target_name = record.partner_name();
        if self.filter.world_codes.iter().any(|c| *c == target_code)
            || target_name == self.filter.world_name
        {
            return Err(RejectReason::WorldAggregate);
        }

        let (source, target) = match (
            self.coordinates.lookup(&source_code),
            self.coordinates.lookup(&target_code),
        ) {
            (Some(source), Some(target)) => (source, target),
            _ => return Err(RejectReason::UnknownCoordinates),
        };

        Ok(FlowRecord {
            year,
            source_country: source_code,
            source_name: record.reporter_name(),
            source_lat: source.lat,
            source_lon: source.lon,
            target_country: target_code,
            target_name,
            target_lat: target.lat,
            target_lon: target.lon,
            trade_value,
            weight_kg,
        })
    }

    /// Filters `records` and groups the survivors by year, preserving input
    /// order within each year.
    pub fn normalize(&self, records: &[RawTradeRecord]) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome::default();

        for (index, record) in records.iter().enumerate() {
            match self.normalize_record(record) {
                Ok(flow) => {
                    insert_flow(&mut outcome.flows, flow);
                    outcome.accepted += 1;
                }
                Err(reason) => {
                    tracing::trace!(index, %reason, "record rejected");
                    *outcome.rejections.entry(reason).or_insert(0) += 1;
                    outcome.rejected += 1;
                }
            }

            if (index + 1) % 10_000 == 0 {
                tracing::debug!("processed {}/{} records", index + 1, records.len());
            }
        }

        outcome
    }
}
