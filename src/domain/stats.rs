//! Yearly and whole-dataset trade statistics.

use super::flow::{FlowRecord, FlowsByYear, year_span};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const KG_PER_TONNE: f64 = 1_000.0;
/// Divisor for the "million tonnes" reporting unit. Published figures have
/// always used kg / 1e9; keep it that way so reports stay comparable.
pub const KG_PER_MEGATONNE: f64 = 1_000_000_000.0;
pub const USD_PER_MILLION: f64 = 1_000_000.0;
pub const USD_PER_BILLION: f64 = 1_000_000_000.0;

/// Totals for a single year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyStats {
    pub weight_kg: f64,
    pub weight_tonnes: f64,
    #[serde(rename = "weight_million_tonnes")]
    pub weight_megatonnes: f64,
    pub value_usd: f64,
    pub value_million_usd: f64,
    pub value_billion_usd: f64,
    pub countries: usize,
    pub flows: usize,
}

impl YearlyStats {
    pub fn compute(flows: &[FlowRecord]) -> Self {
        Self::from_totals(
            sum_in_order(flows.iter().map(|f| f.weight_kg)),
            sum_in_order(flows.iter().map(|f| f.trade_value)),
            countries_in(flows).len(),
            flows.len(),
        )
    }

    fn from_totals(weight_kg: f64, value_usd: f64, countries: usize, flows: usize) -> Self {
        Self {
            weight_kg,
            weight_tonnes: weight_kg / KG_PER_TONNE,
            weight_megatonnes: weight_kg / KG_PER_MEGATONNE,
            value_usd,
            value_million_usd: value_usd / USD_PER_MILLION,
            value_billion_usd: value_usd / USD_PER_BILLION,
            countries,
            flows,
        }
    }
}

/// Statistics across every year of a flow dataset.
///
/// Fields that need at least one year or a non-zero denominator are `None`
/// when the input cannot define them.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub yearly_totals: BTreeMap<i32, YearlyStats>,
    pub span: Option<(i32, i32)>,
    pub total_years: usize,
    pub total_weight_kg: f64,
    pub total_value_usd: f64,
    pub total_countries: usize,
    pub total_flows: usize,
    pub avg_annual_megatonnes: Option<f64>,
    pub avg_annual_value_billion: Option<f64>,
    pub peak_weight_year: Option<i32>,
    pub low_weight_year: Option<i32>,
    pub peak_value_year: Option<i32>,
    pub peak_countries_year: Option<i32>,
    /// Weight growth from the earliest to the latest year, in percent.
    pub growth_rate_percent: Option<f64>,
    pub avg_flow_tonnes: Option<f64>,
    pub avg_value_per_tonne: Option<f64>,
}

impl DatasetStats {
    pub fn compute(flows: &FlowsByYear) -> Self {
        let mut yearly_totals = BTreeMap::new();
        let mut all_countries: BTreeSet<&str> = BTreeSet::new();
        let mut total_weight_kg = 0.0_f64;
        let mut total_value_usd = 0.0_f64;
        let mut total_flows = 0usize;

        for (&year, year_flows) in flows {
            let stats = YearlyStats::compute(year_flows);
            all_countries.extend(countries_in(year_flows));

            total_weight_kg += stats.weight_kg;
            total_value_usd += stats.value_usd;
            total_flows += stats.flows;

            tracing::debug!(
                year,
                flows = stats.flows,
                countries = stats.countries,
                weight_tonnes = stats.weight_tonnes,
                "aggregated year"
            );
            yearly_totals.insert(year, stats);
        }

        let total_years = yearly_totals.len();
        let (avg_annual_megatonnes, avg_annual_value_billion) = if total_years > 0 {
            let years = total_years as f64;
            (
                Some((total_weight_kg / KG_PER_MEGATONNE) / years),
                Some((total_value_usd / USD_PER_BILLION) / years),
            )
        } else {
            (None, None)
        };

        let avg_flow_tonnes = if total_flows > 0 {
            Some((total_weight_kg / total_flows as f64) / KG_PER_TONNE)
        } else {
            None
        };

        let avg_value_per_tonne = if total_weight_kg > 0.0 {
            Some((total_value_usd / total_weight_kg) * KG_PER_TONNE)
        } else {
            None
        };

        DatasetStats {
            span: year_span(flows),
            total_years,
            total_weight_kg,
            total_value_usd,
            total_countries: all_countries.len(),
            total_flows,
            avg_annual_megatonnes,
            avg_annual_value_billion,
            peak_weight_year: extreme_year(&yearly_totals, |s| s.weight_kg, Extreme::Max),
            low_weight_year: extreme_year(&yearly_totals, |s| s.weight_kg, Extreme::Min),
            peak_value_year: extreme_year(&yearly_totals, |s| s.value_usd, Extreme::Max),
            peak_countries_year: extreme_year(
                &yearly_totals,
                |s| s.countries as f64,
                Extreme::Max,
            ),
            growth_rate_percent: growth_rate(&yearly_totals),
            avg_flow_tonnes,
            avg_value_per_tonne,
            yearly_totals,
        }
    }

    pub fn total_weight_megatonnes(&self) -> f64 {
        self.total_weight_kg / KG_PER_MEGATONNE
    }

    pub fn total_value_billion(&self) -> f64 {
        self.total_value_usd / USD_PER_BILLION
    }

    /// `"<first>-<last>"`, e.g. `"2002-2014"`.
    pub fn dataset_span(&self) -> Option<String> {
        self.span.map(|(first, last)| format!("{first}-{last}"))
    }
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

/// Ties resolve to the smallest year.
fn extreme_year<F>(totals: &BTreeMap<i32, YearlyStats>, key: F, extreme: Extreme) -> Option<i32>
where
    F: Fn(&YearlyStats) -> f64,
{
    let mut best: Option<(i32, f64)> = None;
    for (&year, stats) in totals {
        let value = key(stats);
        let replace = match best {
            None => true,
            Some((_, current)) => match extreme {
                Extreme::Max => value > current,
                Extreme::Min => value < current,
            },
        };
        if replace {
            best = Some((year, value));
        }
    }
    best.map(|(year, _)| year)
}

fn growth_rate(totals: &BTreeMap<i32, YearlyStats>) -> Option<f64> {
    let (_, earliest) = totals.first_key_value()?;
    let (_, latest) = totals.last_key_value()?;
    if earliest.weight_kg == 0.0 {
        return None;
    }
    let rate = (latest.weight_kg / earliest.weight_kg - 1.0) * 100.0;
    rate.is_finite().then_some(rate)
}

/// Summed in ascending order so the total does not depend on flow order.
fn sum_in_order<I: Iterator<Item = f64>>(values: I) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

fn countries_in(flows: &[FlowRecord]) -> BTreeSet<&str> {
    flows
        .iter()
        .flat_map(|f| [f.source_country.as_str(), f.target_country.as_str()])
        .filter(|code| !code.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flow(year: i32, source: &str, target: &str, weight_kg: f64, trade_value: f64) -> FlowRecord {
        FlowRecord {
            year,
            source_country: source.into(),
            source_name: String::new(),
            source_lat: 0.0,
            source_lon: 0.0,
            target_country: target.into(),
            target_name: String::new(),
            target_lat: 0.0,
            target_lon: 0.0,
            trade_value,
            weight_kg,
        }
    }

    fn dataset(flows: Vec<FlowRecord>) -> FlowsByYear {
        let mut map = FlowsByYear::new();
        for f in flows {
            map.entry(f.year).or_default().push(f);
        }
        map
    }

    #[test]
    fn yearly_stats_unit_conversions() {
        let stats = YearlyStats::compute(&[flow(2020, "USA", "CAN", 1_000_000_000.0, 2_500_000.0)]);
        assert_eq!(stats.weight_tonnes, 1_000_000.0);
        assert_eq!(stats.weight_megatonnes, 1.0);
        assert_eq!(stats.value_million_usd, 2.5);
        assert_relative_eq!(stats.value_billion_usd, 0.0025);
    }

    #[test]
    fn yearly_stats_counts_distinct_countries() {
        let stats = YearlyStats::compute(&[
            flow(2020, "USA", "CAN", 1.0, 1.0),
            flow(2020, "CAN", "USA", 1.0, 1.0),
            flow(2020, "USA", "MEX", 1.0, 1.0),
            flow(2020, "", "MEX", 1.0, 1.0),
        ]);
        assert_eq!(stats.countries, 3);
        assert_eq!(stats.flows, 4);
    }

    #[test]
    fn two_year_scenario() {
        let stats = DatasetStats::compute(&dataset(vec![
            flow(2020, "USA", "CAN", 2000.0, 500.0),
            flow(2021, "USA", "MEX", 4000.0, 1000.0),
        ]));

        assert_eq!(stats.yearly_totals[&2020].weight_tonnes, 2.0);
        assert_eq!(stats.yearly_totals[&2021].weight_tonnes, 4.0);
        assert_eq!(stats.total_countries, 3);
        assert_eq!(stats.total_flows, 2);
        assert_eq!(stats.total_years, 2);
        assert_eq!(stats.growth_rate_percent, Some(100.0));
        assert_eq!(stats.dataset_span().as_deref(), Some("2020-2021"));
        assert_eq!(stats.peak_weight_year, Some(2021));
        assert_eq!(stats.low_weight_year, Some(2020));
        assert_eq!(stats.peak_value_year, Some(2021));
        assert_relative_eq!(stats.avg_flow_tonnes.unwrap(), 3.0);
        assert_relative_eq!(stats.avg_value_per_tonne.unwrap(), 250.0);
        assert_relative_eq!(stats.avg_annual_megatonnes.unwrap(), 3000.0 / 1e9);
        assert_relative_eq!(stats.avg_annual_value_billion.unwrap(), 750.0 / 1e9);
    }

    #[test]
    fn empty_dataset_is_all_undefined() {
        let stats = DatasetStats::compute(&FlowsByYear::new());
        assert_eq!(stats.total_years, 0);
        assert_eq!(stats.total_flows, 0);
        assert_eq!(stats.span, None);
        assert_eq!(stats.dataset_span(), None);
        assert_eq!(stats.avg_annual_megatonnes, None);
        assert_eq!(stats.avg_annual_value_billion, None);
        assert_eq!(stats.peak_weight_year, None);
        assert_eq!(stats.low_weight_year, None);
        assert_eq!(stats.growth_rate_percent, None);
        assert_eq!(stats.avg_flow_tonnes, None);
        assert_eq!(stats.avg_value_per_tonne, None);
    }

    #[test]
    fn empty_earliest_year_has_no_growth_rate() {
        let mut flows = dataset(vec![flow(2021, "USA", "MEX", 4000.0, 1000.0)]);
        flows.insert(2019, Vec::new());
        let stats = DatasetStats::compute(&flows);

        assert_eq!(stats.total_years, 2);
        assert_eq!(stats.growth_rate_percent, None);
        assert_eq!(stats.low_weight_year, Some(2019));
        assert_eq!(stats.yearly_totals[&2019].flows, 0);
    }

    #[test]
    fn single_year_has_zero_growth() {
        let stats = DatasetStats::compute(&dataset(vec![flow(2020, "USA", "CAN", 10.0, 1.0)]));
        assert_eq!(stats.growth_rate_percent, Some(0.0));
        assert_eq!(stats.dataset_span().as_deref(), Some("2020-2020"));
    }

    #[test]
    fn ties_resolve_to_smallest_year() {
        let stats = DatasetStats::compute(&dataset(vec![
            flow(2022, "USA", "CAN", 10.0, 5.0),
            flow(2020, "USA", "CAN", 10.0, 5.0),
            flow(2021, "USA", "CAN", 10.0, 5.0),
        ]));
        assert_eq!(stats.peak_weight_year, Some(2020));
        assert_eq!(stats.low_weight_year, Some(2020));
        assert_eq!(stats.peak_value_year, Some(2020));
        assert_eq!(stats.peak_countries_year, Some(2020));
    }

    #[test]
    fn peak_countries_year_uses_distinct_counts() {
        let stats = DatasetStats::compute(&dataset(vec![
            flow(2020, "USA", "CAN", 100.0, 1.0),
            flow(2021, "USA", "CAN", 1.0, 1.0),
            flow(2021, "DEU", "NLD", 1.0, 1.0),
        ]));
        assert_eq!(stats.peak_countries_year, Some(2021));
        assert_eq!(stats.peak_weight_year, Some(2020));
        assert_eq!(stats.total_countries, 4);
    }

    #[test]
    fn zero_weight_has_no_value_per_tonne() {
        let stats = DatasetStats::compute(&dataset(vec![flow(2020, "USA", "CAN", 0.0, 10.0)]));
        assert_eq!(stats.avg_value_per_tonne, None);
        assert_eq!(stats.avg_flow_tonnes, Some(0.0));
    }

    #[test]
    fn sum_in_order_ignores_input_order() {
        let a = [0.1, 1e16, 0.2, -1e16, 0.3];
        let b = [0.3, -1e16, 0.2, 1e16, 0.1];
        assert_eq!(sum_in_order(a.into_iter()), sum_in_order(b.into_iter()));
    }
}
