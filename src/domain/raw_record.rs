//! Raw trade records as exported by the trade statistics service.
//!
//! Field presence and types are not guaranteed, so every field is held as a
//! loose JSON value and coerced on demand. Coercion failures surface as
//! `None`; the normalizer decides what that means for the record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTradeRecord {
    #[serde(default)]
    pub ref_year: Value,
    #[serde(default, rename = "reporterISO")]
    pub reporter_iso: Value,
    #[serde(default)]
    pub reporter_desc: Value,
    #[serde(default, rename = "partnerISO")]
    pub partner_iso: Value,
    #[serde(default)]
    pub partner_desc: Value,
    #[serde(default)]
    pub primary_value: Value,
    #[serde(default)]
    pub qty: Value,
    #[serde(default)]
    pub cmd_code: Value,
    #[serde(default)]
    pub flow_desc: Value,
}

impl RawTradeRecord {
    /// Builds a record from one element of an export array. Anything that is
    /// not an object becomes an all-null record, which the normalizer rejects.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Reporting year; zero counts as absent.
    pub fn year(&self) -> Option<i32> {
        let year = match &self.ref_year {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
            Value::String(s) => s.trim().parse::<i64>().ok()?,
            _ => return None,
        };
        if year == 0 {
            return None;
        }
        i32::try_from(year).ok()
    }

    pub fn reporter_code(&self) -> Option<String> {
        non_empty_text(&self.reporter_iso)
    }

    pub fn partner_code(&self) -> Option<String> {
        non_empty_text(&self.partner_iso)
    }

    pub fn reporter_name(&self) -> String {
        text(&self.reporter_desc).unwrap_or_default()
    }

    pub fn partner_name(&self) -> String {
        text(&self.partner_desc).unwrap_or_default()
    }

    /// Commodity code rendered as a string: integers without a fractional
    /// part, floats as written, strings verbatim, absent as empty.
    pub fn commodity_code(&self) -> String {
        match &self.cmd_code {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Flow direction description, if it is a string.
    pub fn flow_description(&self) -> Option<&str> {
        self.flow_desc.as_str()
    }

    pub fn trade_value(&self) -> Option<f64> {
        number(&self.primary_value)
    }

    pub fn quantity(&self) -> Option<f64> {
        number(&self.qty)
    }
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_string())
}

fn non_empty_text(value: &Value) -> Option<String> {
    text(value).filter(|s| !s.is_empty())
}

/// Numbers and numeric strings coerce; everything else does not.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawTradeRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn deserializes_service_field_names() {
        let r = record(json!({
            "refYear": 2014,
            "reporterISO": " USA ",
            "reporterDesc": "USA",
            "partnerISO": "CHN",
            "partnerDesc": "China",
            "primaryValue": 1500.5,
            "qty": "2000",
            "cmdCode": 3915,
            "flowDesc": "Export"
        }));
        assert_eq!(r.year(), Some(2014));
        assert_eq!(r.reporter_code().as_deref(), Some("USA"));
        assert_eq!(r.partner_name(), "China");
        assert_eq!(r.trade_value(), Some(1500.5));
        assert_eq!(r.quantity(), Some(2000.0));
        assert_eq!(r.commodity_code(), "3915");
        assert_eq!(r.flow_description(), Some("Export"));
    }

    #[test]
    fn non_object_elements_become_empty_records() {
        for value in [Value::Null, json!("junk"), json!(42), json!([1, 2])] {
            assert_eq!(RawTradeRecord::from_value(value), RawTradeRecord::default());
        }
        let r = RawTradeRecord::from_value(json!({"refYear": 2002, "extra": true}));
        assert_eq!(r.year(), Some(2002));
    }

    #[test]
    fn missing_fields_deserialize_as_null() {
        let r = record(json!({}));
        assert_eq!(r.year(), None);
        assert_eq!(r.reporter_code(), None);
        assert_eq!(r.reporter_name(), "");
        assert_eq!(r.commodity_code(), "");
        assert_eq!(r.flow_description(), None);
        assert_eq!(r.trade_value(), None);
    }

    #[test]
    fn year_coercion() {
        assert_eq!(record(json!({"refYear": "2002"})).year(), Some(2002));
        assert_eq!(record(json!({"refYear": 2002.0})).year(), Some(2002));
        assert_eq!(record(json!({"refYear": 0})).year(), None);
        assert_eq!(record(json!({"refYear": "twenty"})).year(), None);
        assert_eq!(record(json!({"refYear": true})).year(), None);
    }

    #[test]
    fn commodity_code_keeps_float_formatting() {
        assert_eq!(record(json!({"cmdCode": "3915"})).commodity_code(), "3915");
        assert_eq!(record(json!({"cmdCode": 3915.0})).commodity_code(), "3915.0");
        assert_eq!(record(json!({"cmdCode": " 3915"})).commodity_code(), " 3915");
    }

    #[test]
    fn blank_codes_are_absent() {
        let r = record(json!({"reporterISO": "   ", "partnerISO": 840}));
        assert_eq!(r.reporter_code(), None);
        assert_eq!(r.partner_code(), None);
    }

    #[test]
    fn numeric_strings_and_garbage() {
        assert_eq!(record(json!({"qty": " 12.5 "})).quantity(), Some(12.5));
        assert_eq!(record(json!({"qty": "n/a"})).quantity(), None);
        assert_eq!(record(json!({"qty": false})).quantity(), None);
    }
}
