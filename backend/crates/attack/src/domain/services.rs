//! Domain Services
//!
//! Timing and histogram helpers shared by the orchestrator and the DTOs.

use crate::domain::entities::Histogram;
use chrono::{DateTime, TimeZone, TimeDelta};
use std::fmt::Display;

/// Second-precision timestamp layout used on the wire
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn elapsed_seconds(elapsed: TimeDelta) -> f64 {
    elapsed.num_milliseconds() as f64 / 1000.0
}

/// Elapsed time as reported to clients, e.g. `"1.25 segundos"`
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    format!("{:.2} segundos", elapsed_seconds(elapsed))
}

pub fn histogram_total(histogram: &Histogram) -> u64 {
    histogram.values().map(|&count| u64::from(count)).sum()
}
