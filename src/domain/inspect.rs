//! Structural description of an arbitrary JSON document.

use serde_json::Value;
use std::collections::BTreeSet;

/// Fields a raw trade export must carry for `process` to accept records.
pub const KEY_FIELDS: [&str; 7] = [
    "refYear",
    "reporterISO",
    "partnerISO",
    "qty",
    "primaryValue",
    "cmdCode",
    "flowDesc",
];

#[derive(Debug, Clone, PartialEq)]
pub struct YearOverview {
    pub year: String,
    pub flows: usize,
    pub source_countries: usize,
    pub target_countries: usize,
    pub sample: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// An object whose keys are all years: a normalized flows file.
    YearKeyed {
        years: Vec<YearOverview>,
        total_flows: usize,
    },
    /// A top-level array: a raw trade export.
    RawRecords {
        count: usize,
        sample: Option<Value>,
        fields: Vec<String>,
        key_fields: Vec<(&'static str, Option<Value>)>,
    },
    Unrecognized {
        top_level_keys: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub type_name: &'static str,
    /// Element, key or character count; `None` for scalars.
    pub size: Option<usize>,
    pub shape: Shape,
}

pub fn inspect(data: &Value) -> Inspection {
    let type_name = match data {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    let size = match data {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        Value::String(s) => Some(s.chars().count()),
        _ => None,
    };

    let shape = match data {
        Value::Object(map) if map.keys().all(|k| is_year_key(k)) => {
            let years: Vec<YearOverview> = map
                .iter()
                .map(|(year, flows)| year_overview(year, flows))
                .collect();
            let total_flows = years.iter().map(|y| y.flows).sum();
            Shape::YearKeyed { years, total_flows }
        }
        Value::Array(items) => {
            let sample = items.first().cloned();
            let first = items.first().and_then(Value::as_object);
            let fields = first
                .map(|obj| obj.keys().cloned().collect())
                .unwrap_or_default();
            let key_fields = KEY_FIELDS
                .iter()
                .map(|&field| (field, first.and_then(|obj| obj.get(field)).cloned()))
                .collect();
            Shape::RawRecords {
                count: items.len(),
                sample,
                fields,
                key_fields,
            }
        }
        Value::Object(map) => Shape::Unrecognized {
            top_level_keys: map.keys().cloned().collect(),
        },
        _ => Shape::Unrecognized {
            top_level_keys: Vec::new(),
        },
    };

    Inspection {
        type_name,
        size,
        shape,
    }
}

fn is_year_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_digit())
}

fn year_overview(year: &str, flows: &Value) -> YearOverview {
    let flows: &[Value] = flows.as_array().map(Vec::as_slice).unwrap_or(&[]);
    let mut sources = BTreeSet::new();
    let mut targets = BTreeSet::new();
    for flow in flows {
        sources.insert(country_label(flow, "source_country"));
        targets.insert(country_label(flow, "target_country"));
    }
    YearOverview {
        year: year.to_string(),
        flows: flows.len(),
        source_countries: sources.len(),
        target_countries: targets.len(),
        sample: flows.first().cloned(),
    }
}

fn country_label(flow: &Value, field: &str) -> String {
    match flow.get(field) {
        None => "unknown".to_string(),
        Some(Value::String(code)) => code.clone(),
        Some(other) => other.to_string(),
    }
}
