use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::time_utils::{TimeUnit, MINUTES_PER_DAY};

// ── Raw rows ──────────────────────────────────────────────────────────────────

/// One polling row from the Bilibili `BLUsers` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BilibiliSample {
    /// Unix seconds when the poller recorded this row.
    pub record_time: i64,
    /// Display name at the time of polling.
    pub name: String,
    /// Numeric streamer id.
    pub uid: i64,
    /// Live room id.
    pub room_id: i64,
    /// `1` while broadcasting, `0` otherwise.
    pub live_status: i64,
    /// Room title.
    pub title: String,
    /// Opaque broadcast-session identifier. `None` or `0` means no session.
    ///
    /// The upstream API reports the session start stamp here, but it is only
    /// ever used as a grouping key.
    pub live_time: Option<i64>,
    /// Follower count.
    pub attention: i64,
    /// Viewer count.
    pub online_num: i64,
    /// Number of guard (paid membership) holders.
    pub guard_num: i64,
}

impl BilibiliSample {
    pub const TIME_UNIT: TimeUnit = TimeUnit::Seconds;

    /// The session this row belongs to, if it was recorded while live under
    /// a valid session id.
    pub fn live_session(&self) -> Option<i64> {
        match self.live_time {
            Some(id) if self.live_status == 1 && id > 0 => Some(id),
            _ => None,
        }
    }
}

/// One polling row from the Douyin `DYUsers` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DouyinSample {
    /// Unix milliseconds when the poller recorded this row.
    pub record_time: i64,
    /// Opaque streamer id.
    pub sec_uid: String,
    pub nickname: String,
    /// `1` while broadcasting, `0` otherwise.
    pub live_status: i64,
    pub follower_count: i64,
    pub max_follower_count: i64,
    pub total_favorited: i64,
}

impl DouyinSample {
    pub const TIME_UNIT: TimeUnit = TimeUnit::Milliseconds;
}

// ── MinuteHistogram ───────────────────────────────────────────────────────────

/// A count per minute of a 24-hour day in the fixed `+08:00` zone.
///
/// Always holds exactly [`MINUTES_PER_DAY`] slots. Serialized as a plain
/// JSON array; deserializing an array of any other length fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<u32>", try_from = "Vec<u32>")]
pub struct MinuteHistogram {
    counts: Vec<u32>,
}

impl MinuteHistogram {
    /// An all-zero histogram.
    pub fn new() -> Self {
        Self {
            counts: vec![0; MINUTES_PER_DAY],
        }
    }

    /// Increment a single minute. Indices past the end of the day wrap.
    pub fn bump(&mut self, minute: usize) {
        self.counts[minute % MINUTES_PER_DAY] += 1;
    }

    /// Count at `minute`, wrapping like [`MinuteHistogram::bump`].
    pub fn get(&self, minute: usize) -> u32 {
        self.counts[minute % MINUTES_PER_DAY]
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// `true` when no minute has been counted.
    pub fn is_zero(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Sum of all slots.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

impl Default for MinuteHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl From<MinuteHistogram> for Vec<u32> {
    fn from(hist: MinuteHistogram) -> Self {
        hist.counts
    }
}

impl TryFrom<Vec<u32>> for MinuteHistogram {
    type Error = String;

    fn try_from(counts: Vec<u32>) -> Result<Self, Self::Error> {
        if counts.len() != MINUTES_PER_DAY {
            return Err(format!(
                "minute distribution must have {} slots, got {}",
                MINUTES_PER_DAY,
                counts.len()
            ));
        }
        Ok(Self { counts })
    }
}

// ── Series points ─────────────────────────────────────────────────────────────

/// One sample of a follower / attention time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// ISO 8601 time in the fixed zone.
    pub time: String,
    /// Raw stamp in the source platform's unit.
    pub timestamp: i64,
    pub value: i64,
}

/// One sample of the guard-count series, tagged with the live status of the
/// row it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPoint {
    pub time: String,
    pub timestamp: i64,
    pub value: i64,
    pub live_status: i64,
}

// ── Session curves ────────────────────────────────────────────────────────────

/// One data point of a session curve, aligned to the session's first record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPoint {
    /// Minutes since the session's earliest record, rounded to one decimal.
    pub elapsed_min: f64,
    pub record_time_iso: String,
    pub online_num: i64,
    pub guard_num: i64,
    pub attention: i64,
}

/// Viewer / guard / follower curves of a single broadcast session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCurve {
    /// Session identifier.
    pub live_time: i64,
    /// ISO time of the session's earliest record.
    pub start_iso: String,
    /// Title of the session's earliest record.
    pub title: String,
    pub data_points: Vec<SessionPoint>,
}

// ── Per-streamer aggregates ───────────────────────────────────────────────────

/// Derived views for one Bilibili streamer.
///
/// `minute_distribution` is an *occupancy* histogram: each slot counts the
/// sessions that were live during that minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilibiliStreamer {
    pub uid: i64,
    pub name: String,
    pub room_id: i64,
    pub minute_distribution: MinuteHistogram,
    pub attention_series: Vec<SeriesPoint>,
    pub sessions: Vec<SessionCurve>,
    pub guard_series: Vec<GuardPoint>,
}

/// Derived views for one Douyin streamer.
///
/// `minute_distribution` is a *session-start* histogram: each slot counts
/// offline→online transitions observed at that minute. It is not comparable
/// with the Bilibili occupancy histogram. `sessions` and `guard_series` are
/// always empty because the table carries no session or guard data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DouyinStreamer {
    pub sec_uid: String,
    pub name: String,
    pub minute_distribution: MinuteHistogram,
    pub follower_series: Vec<SeriesPoint>,
    pub sessions: Vec<SessionCurve>,
    pub guard_series: Vec<GuardPoint>,
}

// ── Envelope ──────────────────────────────────────────────────────────────────

/// One platform's streamers plus a human-readable platform name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformEnvelope<S> {
    pub name: String,
    pub streamers: BTreeMap<String, S>,
}

/// Both platform envelopes under their stable keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platforms {
    pub bilibili: PlatformEnvelope<BilibiliStreamer>,
    pub douyin: PlatformEnvelope<DouyinStreamer>,
}

/// The complete artifact produced by one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveDataset {
    pub platforms: Platforms,
    /// ISO time in the fixed zone when the dataset was built.
    pub generated_at: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
