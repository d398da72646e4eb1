use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use thiserror::Error;
use tracing::warn;

use crate::core::models::bucket::{CreditBucket, CreditKind};

/// Top-up credits expire this many days after purchase unless a date is given.
pub const TOPUP_EXPIRY_DAYS: i64 = 1;

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Invalid date for {field}: '{value}' (expected YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339)")]
    InvalidDate { field: String, value: String },
    #[error("{kind} credit has an amount but no expiry date")]
    MissingExpiry { kind: CreditKind },
    #[error("Day offset out of range: {days}")]
    DayOffsetOutOfRange { days: i64 },
}

/// Raw credit inputs as typed by the user, before any parsing.
#[derive(Debug, Clone, Default)]
pub struct CreditInputs {
    pub free: Option<String>,
    pub package: Option<String>,
    pub package_expiry: Option<String>,
    pub topup: Option<String>,
    pub topup_expiry: Option<String>,
    pub usage: Option<String>,
}

/// Parse a decimal amount. Empty, unparsable, non-finite or negative input
/// becomes 0.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            warn!(value = trimmed, "invalid amount, using 0");
            0.0
        }
    }
}

/// Parse a whole day count. Unparsable input becomes 0.
pub fn parse_days(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.parse::<i64>().unwrap_or_else(|_| {
        warn!(value = trimmed, "invalid day count, using 0");
        0
    })
}

/// Parse an expiry instant. Naive datetimes are taken as UTC and a bare date
/// means the last second of that day.
pub fn parse_expiry(field: &str, raw: &str) -> Result<DateTime<Utc>, InputError> {
    parse_instant(field, raw, (23, 59, 59))
}

/// Parse a reference date. Same formats as [`parse_expiry`], but a bare date
/// means the start of that day.
pub fn parse_reference_date(field: &str, raw: &str) -> Result<DateTime<Utc>, InputError> {
    parse_instant(field, raw, (0, 0, 0))
}

fn parse_instant(field: &str, raw: &str, bare_date_time: (u32, u32, u32)) -> Result<DateTime<Utc>, InputError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let (h, m, sec) = bare_date_time;
        if let Some(time) = NaiveTime::from_hms_opt(h, m, sec) {
            return Ok(date.and_time(time).and_utc());
        }
    }

    Err(InputError::InvalidDate {
        field: field.to_string(),
        value: trimmed.to_string(),
    })
}

/// Reference date `days` after `base` (negative goes back). Fails when the
/// result falls outside the representable date range.
pub fn offset_date(base: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, InputError> {
    TimeDelta::try_days(days)
        .and_then(|delta| base.checked_add_signed(delta))
        .ok_or(InputError::DayOffsetOutOfRange { days })
}

pub fn default_topup_expiry(purchased_at: DateTime<Utc>) -> Result<DateTime<Utc>, InputError> {
    offset_date(purchased_at, TOPUP_EXPIRY_DAYS)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn amount_of(value: &Option<String>) -> f64 {
    non_empty(value).map(parse_amount).unwrap_or(0.0)
}

/// Build the free, package and top-up buckets, in that order.
///
/// A dated bucket with no amount and no date gets `now` as its expiry so the
/// set always has three entries. A package with an amount must carry a date;
/// a top-up without one falls back to the default top-up expiry.
pub fn build_buckets(inputs: &CreditInputs, now: DateTime<Utc>) -> Result<Vec<CreditBucket>, InputError> {
    let free = amount_of(&inputs.free);
    let package = amount_of(&inputs.package);
    let topup = amount_of(&inputs.topup);

    let package_expiry = match non_empty(&inputs.package_expiry) {
        Some(raw) => parse_expiry("package expiry", raw)?,
        None if package > 0.0 => {
            return Err(InputError::MissingExpiry {
                kind: CreditKind::Package,
            })
        }
        None => now,
    };

    let topup_expiry = match non_empty(&inputs.topup_expiry) {
        Some(raw) => parse_expiry("top-up expiry", raw)?,
        None if topup > 0.0 => default_topup_expiry(now)?,
        None => now,
    };

    Ok(vec![
        CreditBucket::free(free),
        CreditBucket::package(package, package_expiry),
        CreditBucket::topup(topup, topup_expiry),
    ])
}

pub fn usage_of(inputs: &CreditInputs) -> f64 {
    amount_of(&inputs.usage)
}
