use chrono::{NaiveDate, NaiveTime};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

use crate::models::ReadingFilter;

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Date(NaiveDate),
    Time(NaiveTime),
    Text(String),
}

/// SQL text plus the values for its `$n` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingQuery {
    pub sql: String,
    pub params: Vec<FilterValue>,
}

type Predicate = fn(&ReadingFilter) -> Option<(&'static str, FilterValue)>;

// Fixed order; each entry contributes one condition when its field is present.
const PREDICATES: [Predicate; 5] = [
    |f| f.start_date.map(|d| ("datestamp >=", FilterValue::Date(d))),
    |f| f.end_date.map(|d| ("datestamp <=", FilterValue::Date(d))),
    |f| f.start_time.map(|t| ("timestamp::time >=", FilterValue::Time(t))),
    |f| f.end_time.map(|t| ("timestamp::time <=", FilterValue::Time(t))),
    |f| f.bus_no.clone().map(|b| ("bus_no =", FilterValue::Text(b))),
];

impl ReadingQuery {
    /// `table` must already be a validated identifier.
    pub fn build(table: &str, filter: &ReadingFilter) -> Self {
        // Measurements are cast so REAL and NUMERIC columns decode as f64 too.
        let mut sql = format!(
            "SELECT datestamp, timestamp, latitude::float8 AS latitude, \
             longitude::float8 AS longitude, temperature::float8 AS temperature, bus_no FROM {}",
            table
        );

        let mut conditions = Vec::new();
        let mut params = Vec::new();

        for (lhs, value) in PREDICATES.iter().filter_map(|predicate| predicate(filter)) {
            params.push(value);
            conditions.push(format!("{} ${}", lhs, params.len()));
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        Self { sql, params }
    }

    pub(crate) fn bind_all(&self) -> Query<'_, Postgres, PgArguments> {
        self.params
            .iter()
            .fold(sqlx::query(&self.sql), |query, value| match value {
                FilterValue::Date(d) => query.bind(*d),
                FilterValue::Time(t) => query.bind(*t),
                FilterValue::Text(s) => query.bind(s.as_str()),
            })
    }
}
