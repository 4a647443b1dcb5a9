//! Region and volume filters over a year's flows.

use super::flow::FlowRecord;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    NorthAmerica,
    SouthAmerica,
    Europe,
    Asia,
    Africa,
    Oceania,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::NorthAmerica,
        Region::SouthAmerica,
        Region::Europe,
        Region::Asia,
        Region::Africa,
        Region::Oceania,
    ];

    pub fn countries(&self) -> &'static [&'static str] {
        match self {
            Region::NorthAmerica => &["USA", "CAN", "MEX"],
            Region::SouthAmerica => &[
                "BRA", "ARG", "CHL", "COL", "PER", "ECU", "VEN", "BOL", "PRY", "URY",
            ],
            Region::Europe => &[
                "DEU", "GBR", "FRA", "NLD", "BEL", "ITA", "ESP", "POL", "SWE", "CHE", "AUT",
                "NOR", "DNK", "FIN", "PRT", "GRC", "IRL", "HUN", "CZE", "ROU", "BGR",
            ],
            Region::Asia => &[
                "CHN", "JPN", "KOR", "MYS", "THA", "VNM", "IDN", "IND", "TUR", "HKG", "TWN",
                "PHL", "PAK", "SGP", "SAU", "ARE", "ISR", "JOR", "LBN", "KWT",
            ],
            Region::Africa => &[
                "ZAF", "EGY", "MAR", "NGA", "KEN", "GHA", "TZA", "CIV", "SEN", "TUN", "DZA",
                "MOZ", "ETH", "UGA", "CMR", "ZWE",
            ],
            Region::Oceania => &["AUS", "NZL", "PNG", "FJI"],
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.countries().contains(&code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "north-america",
            Region::SouthAmerica => "south-america",
            Region::Europe => "europe",
            Region::Asia => "asia",
            Region::Africa => "africa",
            Region::Oceania => "oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Region::ALL
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Region::ALL.iter().map(Region::name).collect();
                format!("unknown region '{}', expected one of {}", s, names.join(", "))
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowQuery {
    pub region: Option<Region>,
    pub min_weight_kg: Option<f64>,
}

impl FlowQuery {
    /// A flow is in a region when either endpoint is.
    pub fn matches(&self, flow: &FlowRecord) -> bool {
        let in_region = self.region.is_none_or(|r| {
            r.contains(&flow.source_country) || r.contains(&flow.target_country)
        });
        let heavy_enough = self.min_weight_kg.is_none_or(|min| flow.weight_kg >= min);
        in_region && heavy_enough
    }

    pub fn apply<'a>(&self, flows: &'a [FlowRecord]) -> Vec<&'a FlowRecord> {
        flows.iter().filter(|f| self.matches(f)).collect()
    }
}
