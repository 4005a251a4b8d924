//! Minute-of-day histograms.
//!
//! Two different measures share the [`MinuteHistogram`] shape:
//!
//! * [`occupancy_histogram`] counts, per minute, how many sessions were live
//!   during that minute. Used for Bilibili, whose rows carry session ids.
//! * [`start_edge_histogram`] counts, per minute, how many sessions *started*
//!   at that minute, detected from offline→online transitions. Used for
//!   Douyin, whose rows carry only a live flag.
//!
//! The two are not comparable and must be labelled separately downstream.

use std::collections::BTreeMap;

use livestat_core::models::{BilibiliSample, DouyinSample, MinuteHistogram};
use livestat_core::time_utils::{minute_of_day, MINUTES_PER_DAY};

// ── Session ranges ────────────────────────────────────────────────────────────

/// Earliest and latest `record_time` seen for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRange {
    pub first: i64,
    pub last: i64,
}

impl SessionRange {
    fn widen(&mut self, ts: i64) {
        self.first = self.first.min(ts);
        self.last = self.last.max(ts);
    }
}

/// Group live rows by session id and keep each session's true min/max stamp.
///
/// Rows recorded offline or without a positive session id are ignored.
pub fn session_ranges(samples: &[BilibiliSample]) -> BTreeMap<i64, SessionRange> {
    let mut ranges: BTreeMap<i64, SessionRange> = BTreeMap::new();
    for sample in samples {
        let Some(session) = sample.live_session() else {
            continue;
        };
        let ts = sample.record_time;
        ranges
            .entry(session)
            .and_modify(|r| r.widen(ts))
            .or_insert(SessionRange { first: ts, last: ts });
    }
    ranges
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

/// Increment every minute in the closed range `[start, end]`.
///
/// When `end < start` the span straddles midnight and is split into
/// `[start, 1439]` and `[0, end]`.
pub fn add_span(hist: &mut MinuteHistogram, start: usize, end: usize) {
    if end >= start {
        (start..=end).for_each(|m| hist.bump(m));
    } else {
        (start..MINUTES_PER_DAY).for_each(|m| hist.bump(m));
        (0..=end).for_each(|m| hist.bump(m));
    }
}

/// Session-occupancy histogram for one Bilibili streamer.
///
/// Each session contributes once to every minute between its first and last
/// record; overlapping sessions accumulate.
pub fn occupancy_histogram(samples: &[BilibiliSample]) -> MinuteHistogram {
    let mut hist = MinuteHistogram::new();
    for range in session_ranges(samples).values() {
        let start = minute_of_day(range.first, BilibiliSample::TIME_UNIT);
        let end = minute_of_day(range.last, BilibiliSample::TIME_UNIT);
        add_span(&mut hist, start, end);
    }
    hist
}

// ── Start edges ───────────────────────────────────────────────────────────────

/// Session-start histogram for one Douyin streamer.
///
/// `samples` must be in recording order. The status before the first sample
/// is taken to be offline, so a stream that is already live at the first poll
/// counts as a start.
pub fn start_edge_histogram(samples: &[DouyinSample]) -> MinuteHistogram {
    let mut hist = MinuteHistogram::new();
    let mut prev_status = 0;
    for sample in samples {
        if sample.live_status == 1 && prev_status == 0 {
            hist.bump(minute_of_day(sample.record_time, DouyinSample::TIME_UNIT));
        }
        prev_status = sample.live_status;
    }
    hist
}

// ── Tests ─────────────────────────────────────────────────────────────────────
