//! Per-country export/import balances.

use super::flow::{FlowRecord, FlowsByYear};
use std::collections::BTreeMap;

pub const DEFAULT_TOP_COUNTRIES: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct CountrySummary {
    pub code: String,
    pub name: String,
    pub exports_kg: f64,
    pub imports_kg: f64,
    /// Counterparty with the largest combined weight in both directions.
    pub top_partner: Option<String>,
}

impl CountrySummary {
    pub fn net_balance_kg(&self) -> f64 {
        self.exports_kg - self.imports_kg
    }

    pub fn is_net_exporter(&self) -> bool {
        self.net_balance_kg() > 0.0
    }

    pub fn total_kg(&self) -> f64 {
        self.exports_kg + self.imports_kg
    }
}

#[derive(Default)]
struct Accumulator {
    name: String,
    exports_kg: f64,
    imports_kg: f64,
    partners: BTreeMap<String, f64>,
}

impl Accumulator {
    fn name_if_unset(&mut self, name: &str) {
        if self.name.is_empty() {
            self.name = name.to_string();
        }
    }
}

/// Summaries for every country appearing in `flows`, sorted by code.
pub fn summarize_countries<'a, I>(flows: I) -> Vec<CountrySummary>
where
    I: IntoIterator<Item = &'a FlowRecord>,
{
    let mut by_code: BTreeMap<String, Accumulator> = BTreeMap::new();

    for flow in flows {
        if flow.source_country.is_empty() || flow.target_country.is_empty() {
            continue;
        }

        let source = by_code.entry(flow.source_country.clone()).or_default();
        source.name_if_unset(&flow.source_name);
        source.exports_kg += flow.weight_kg;
        *source
            .partners
            .entry(flow.target_country.clone())
            .or_insert(0.0) += flow.weight_kg;

        let target = by_code.entry(flow.target_country.clone()).or_default();
        target.name_if_unset(&flow.target_name);
        target.imports_kg += flow.weight_kg;
        *target
            .partners
            .entry(flow.source_country.clone())
            .or_insert(0.0) += flow.weight_kg;
    }

    by_code
        .into_iter()
        .map(|(code, acc)| {
            let name = if acc.name.is_empty() {
                code.clone()
            } else {
                acc.name
            };
            CountrySummary {
                top_partner: top_partner(&acc.partners),
                code,
                name,
                exports_kg: acc.exports_kg,
                imports_kg: acc.imports_kg,
            }
        })
        .collect()
}

/// Partners are visited in code order, so ties keep the smallest code.
fn top_partner(partners: &BTreeMap<String, f64>) -> Option<String> {
    let mut best: Option<(&String, f64)> = None;
    for (code, &weight) in partners {
        if best.is_none_or(|(_, w)| weight > w) {
            best = Some((code, weight));
        }
    }
    best.map(|(code, _)| code.clone())
}

/// Country codes ranked by exports plus imports over every year, largest
/// first, ties by code.
pub fn top_countries(flows: &FlowsByYear, n: usize) -> Vec<String> {
    let mut ranked: Vec<(String, f64)> = summarize_countries(flows.values().flatten())
        .into_iter()
        .map(|s| {
            let total = s.total_kg();
            (s.code, total)
        })
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(n).map(|(code, _)| code).collect()
}
