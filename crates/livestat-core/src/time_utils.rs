use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Timelike, Utc};
use tracing::warn;

// ── Fixed zone ────────────────────────────────────────────────────────────────

/// Offset of China Standard Time from UTC, in seconds.
///
/// Every monitored platform reports in this zone, so all bucketing uses it
/// regardless of the timezone of the machine running the analysis.
pub const CST_OFFSET_SECS: i32 = 8 * 3600;

/// Number of one-minute slots in a 24-hour day.
pub const MINUTES_PER_DAY: usize = 24 * 60;

/// The fixed `+08:00` offset.
pub fn china_standard_time() -> FixedOffset {
    FixedOffset::east_opt(CST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

// ── TimeUnit ──────────────────────────────────────────────────────────────────

/// Resolution of a raw `record_time` column.
///
/// Bilibili rows are stamped in seconds, Douyin rows in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    /// Convert a stamp in this unit to whole unix seconds.
    ///
    /// Sub-second precision is dropped.
    pub fn to_seconds(self, ts: i64) -> i64 {
        match self {
            TimeUnit::Seconds => ts,
            TimeUnit::Milliseconds => ts.div_euclid(1000),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

/// Convert a raw stamp into a calendar time in the fixed `+08:00` zone.
///
/// Stamps outside chrono's representable range collapse to the unix epoch
/// and log a warning.
pub fn to_zoned(ts: i64, unit: TimeUnit) -> DateTime<FixedOffset> {
    let secs = unit.to_seconds(ts);
    let utc = DateTime::from_timestamp(secs, 0).unwrap_or_else(|| {
        warn!("timestamp {} out of range, using the unix epoch", ts);
        DateTime::<Utc>::default()
    });
    utc.with_timezone(&china_standard_time())
}

/// ISO 8601 rendering of a raw stamp, e.g. `"2024-01-01T08:00:00+08:00"`.
pub fn ts_to_iso(ts: i64, unit: TimeUnit) -> String {
    to_zoned(ts, unit).to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Fractional hour of day in `[0, 24)`.
pub fn hour_fraction(ts: i64, unit: TimeUnit) -> f64 {
    let dt = to_zoned(ts, unit);
    f64::from(dt.hour()) + f64::from(dt.minute()) / 60.0 + f64::from(dt.second()) / 3600.0
}

/// Minute-of-day index in `0..MINUTES_PER_DAY`, ignoring the calendar date.
pub fn minute_of_day(ts: i64, unit: TimeUnit) -> usize {
    let dt = to_zoned(ts, unit);
    (dt.hour() * 60 + dt.minute()) as usize
}

/// The current wall-clock time as an ISO 8601 string in the fixed zone.
pub fn now_iso() -> String {
    Utc::now()
        .with_timezone(&china_standard_time())
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
