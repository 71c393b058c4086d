use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `bus_data_v1` as stored.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Reading {
    pub datestamp: NaiveDate,
    pub timestamp: NaiveDateTime,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub temperature: Option<f64>,
    pub bus_no: Option<String>,
}

/// Transport shape of a reading. Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub temperature: Option<f64>,
    pub datestamp: NaiveDate,
    pub timestamp: NaiveDateTime,
    pub bus_no: Option<String>,
}

impl From<Reading> for ReadingRecord {
    fn from(reading: Reading) -> Self {
        Self {
            latitude: reading.latitude,
            longitude: reading.longitude,
            temperature: reading.temperature,
            datestamp: reading.datestamp,
            timestamp: reading.timestamp,
            bus_no: reading.bus_no,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingListResponse {
    pub data: Vec<ReadingRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: String,
}
