use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::error::{AppError, Result};

pub const INVALID_DATE: &str = "Invalid date format, expected 'YYYY-MM-DD'.";
pub const INVALID_TIME: &str = "Invalid time format, expected 'HH:MM:SS'.";

/// Raw `/temperature-data` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemperatureQueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub bus_no: Option<String>,
}

/// Validated filter. Every present field narrows the result with an `AND`
/// condition; bounds are inclusive and never cross-checked against each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub bus_no: Option<String>,
}

impl ReadingFilter {
    pub fn parse(params: &TemperatureQueryParams) -> Result<Self> {
        Ok(Self {
            start_date: present(&params.start_date).map(parse_date).transpose()?,
            end_date: present(&params.end_date).map(parse_date).transpose()?,
            start_time: present(&params.start_time).map(parse_time).transpose()?,
            end_time: present(&params.end_time).map(parse_time).transpose()?,
            bus_no: present(&params.bus_no).map(str::to_string),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// Empty strings are treated like missing parameters.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Parse `YYYY-MM-DD`, zero padded.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    if !matches_pattern(input, "dddd-dd-dd") {
        tracing::warn!("Invalid date format for {}", input);
        return Err(AppError::Validation(INVALID_DATE.to_string()));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|e| {
        tracing::warn!("Invalid date format for {}: {}", input, e);
        AppError::Validation(INVALID_DATE.to_string())
    })
}

/// Parse `HH:MM:SS`, 24-hour and zero padded.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    if !matches_pattern(input, "dd:dd:dd") {
        tracing::warn!("Invalid time format for {}", input);
        return Err(AppError::Validation(INVALID_TIME.to_string()));
    }
    NaiveTime::parse_from_str(input, "%H:%M:%S").map_err(|e| {
        tracing::warn!("Invalid time format for {}: {}", input, e);
        AppError::Validation(INVALID_TIME.to_string())
    })
}

/// `d` matches one ASCII digit, anything else matches itself.
fn matches_pattern(input: &str, pattern: &str) -> bool {
    input.len() == pattern.len()
        && input.bytes().zip(pattern.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            _ => c == p,
        })
}
