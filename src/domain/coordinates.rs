//! Country centroid lookup table.

use std::collections::HashMap;

/// A point given as (longitude, latitude), matching the table layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

const BUILTIN: &[(&str, f64, f64)] = &[
    ("USA", -95.7129, 37.0902),
    ("CAN", -106.3468, 56.1304),
    ("MEX", -102.5528, 23.6345),
    ("DEU", 10.4515, 51.1657),
    ("GBR", -3.4360, 55.3781),
    ("FRA", 2.2137, 46.2276),
    ("NLD", 5.2913, 52.1326),
    ("BEL", 4.4699, 50.5039),
    ("ITA", 12.5674, 42.5034),
    ("ESP", -3.7492, 40.4637),
    ("POL", 19.1451, 51.9194),
    ("SWE", 18.6435, 60.1282),
    ("CHE", 8.2275, 46.8182),
    ("AUT", 14.5501, 47.5162),
    ("NOR", 8.4689, 60.4720),
    ("DNK", 9.5018, 56.2639),
    ("ROU", 24.9668, 45.9432),
    ("CHN", 104.1954, 35.8617),
    ("JPN", 138.2529, 36.2048),
    ("KOR", 127.7669, 35.9078),
    ("MYS", 101.9758, 4.2105),
    ("THA", 100.9925, 15.8700),
    ("VNM", 108.2772, 14.0583),
    ("IDN", 113.9213, -0.7893),
    ("IND", 78.9629, 20.5937),
    ("TUR", 35.2433, 38.9637),
    ("HKG", 114.1095, 22.3964),
    ("TWN", 120.9605, 23.6978),
    ("PHL", 121.7740, 12.8797),
    ("PAK", 69.3451, 30.3753),
    ("SGP", 103.8198, 1.3521),
    ("AUS", 133.7751, -25.2744),
    ("NZL", 174.8860, -40.9006),
    ("BRA", -51.9253, -14.2350),
    ("ARG", -63.6167, -38.4161),
    ("CHL", -71.5430, -35.6751),
    ("COL", -74.2973, 4.5709),
    ("PER", -75.0152, -9.1900),
    ("ECU", -78.1834, -1.8312),
    ("ZAF", 22.9375, -30.5595),
    ("EGY", 30.8025, 26.8206),
    ("MAR", -7.0926, 31.7917),
    ("NGA", 8.6753, 9.0820),
    ("KEN", 37.9062, -0.0236),
    ("GHA", -1.0232, 7.9465),
    ("TZA", 34.8888, -6.3690),
    ("CIV", -5.5471, 7.5400),
    ("DZA", 2.6326, 28.1635),
];

/// Immutable ISO3 code → centroid table consulted by the normalizer.
#[derive(Debug, Clone, Default)]
pub struct CountryCoordinates {
    entries: HashMap<String, Coordinate>,
}

impl CountryCoordinates {
    /// The 48-country table the flow dataset has always been built with.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|&(code, lon, lat)| (code.to_string(), Coordinate::new(lon, lat)))
            .collect();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a table with `code` added or replaced.
    pub fn with_entry(mut self, code: &str, coordinate: Coordinate) -> Self {
        self.entries.insert(code.to_string(), coordinate);
        self
    }

    pub fn lookup(&self, code: &str) -> Option<Coordinate> {
        self.entries.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
