//! Normalized trade flows and their year-keyed grouping.

use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;

/// One directional export of the target commodity between two countries.
///
/// Every field tolerates absence or `null` when loaded from disk so that
/// hand-edited or partial flow files still aggregate; the normalizer always
/// populates all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    /// Accepts whole-number floats such as `2020.0`.
    #[serde(default, deserialize_with = "whole_year")]
    pub year: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_lat: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_lon: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_lat: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_lon: f64,
    /// USD.
    #[serde(default, deserialize_with = "null_as_default")]
    pub trade_value: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight_kg: f64,
}

/// Flows grouped by year. Serializes as a JSON object keyed by the
/// stringified year; iteration is in ascending year order.
pub type FlowsByYear = BTreeMap<i32, Vec<FlowRecord>>;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn whole_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(year) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(0);
    };
    if year.fract() != 0.0 || year < f64::from(i32::MIN) || year > f64::from(i32::MAX) {
        return Err(de::Error::custom(format!("year {year} is not a whole number")));
    }
    Ok(year as i32)
}

/// Appends `flow` under its own year, preserving insertion order within the year.
pub fn insert_flow(flows: &mut FlowsByYear, flow: FlowRecord) {
    flows.entry(flow.year).or_default().push(flow);
}

pub fn total_flow_count(flows: &FlowsByYear) -> usize {
    flows.values().map(Vec::len).sum()
}

/// Inclusive (earliest, latest) year, or `None` when there are no years.
pub fn year_span(flows: &FlowsByYear) -> Option<(i32, i32)> {
    let first = *flows.keys().next()?;
    let last = *flows.keys().next_back()?;
    Some((first, last))
}
