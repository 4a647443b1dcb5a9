//! Configuration validation.
//!
//! Every key is optional; a key that is present must be usable.

use crate::domain::error::FlowError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), FlowError> {
    validate_filter(config)?;
    validate_data(config)?;
    validate_report(config)?;
    validate_coordinates(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FlowError {
    FlowError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_filter(config: &dyn ConfigPort) -> Result<(), FlowError> {
    for key in ["commodity_code", "flow_keyword", "world_name"] {
        if let Some(value) = config.get_string("filter", key) {
            if value.trim().is_empty() {
                return Err(invalid("filter", key, format!("{key} must not be empty")));
            }
        }
    }
    Ok(())
}

fn validate_data(config: &dyn ConfigPort) -> Result<(), FlowError> {
    if let Some(list) = config.get_string("data", "flows_candidates") {
        if parse_list(&list).is_empty() {
            return Err(invalid(
                "data",
                "flows_candidates",
                "at least one candidate path is required",
            ));
        }
    }
    Ok(())
}

fn validate_report(config: &dyn ConfigPort) -> Result<(), FlowError> {
    if config.get_string("report", "top_countries").is_some()
        && config.get_int("report", "top_countries", 0) <= 0
    {
        return Err(invalid(
            "report",
            "top_countries",
            "top_countries must be a positive integer",
        ));
    }
    Ok(())
}

fn validate_coordinates(config: &dyn ConfigPort) -> Result<(), FlowError> {
    for key in config.keys("coordinates") {
        let value = config.get_string("coordinates", &key).unwrap_or_default();
        parse_coordinate(&value).map_err(|reason| invalid("coordinates", &key, reason))?;
    }
    Ok(())
}

/// Comma-separated list with blank entries dropped.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses `"lon,lat"` and checks both are in range.
pub fn parse_coordinate(value: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [lon, lat] = parts.as_slice() else {
        return Err(format!("expected \"lon,lat\", got \"{value}\""));
    };
    let lon: f64 = lon
        .parse()
        .map_err(|_| format!("invalid longitude \"{lon}\""))?;
    let lat: f64 = lat
        .parse()
        .map_err(|_| format!("invalid latitude \"{lat}\""))?;
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} out of range [-180, 180]"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} out of range [-90, 90]"));
    }
    Ok((lon, lat))
}
