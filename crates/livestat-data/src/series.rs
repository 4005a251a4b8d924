//! Timestamp-deduplicated time series.
//!
//! Pollers occasionally write more than one row for the same instant. Every
//! series keeps exactly one point per timestamp (the row seen last in input
//! order) and is emitted in ascending timestamp order.

use std::collections::BTreeMap;

use livestat_core::models::{BilibiliSample, DouyinSample, GuardPoint, SeriesPoint};
use livestat_core::time_utils::ts_to_iso;

/// Collapse `records` to one output per timestamp.
///
/// Records are visited in order and each one replaces whatever was stored
/// under its timestamp, so the last occurrence wins. The result is sorted by
/// timestamp ascending with no duplicates.
pub fn dedup_by_timestamp<R, T>(
    records: &[R],
    timestamp: impl Fn(&R) -> i64,
    build: impl Fn(&R) -> T,
) -> Vec<T> {
    let mut latest: BTreeMap<i64, &R> = BTreeMap::new();
    for record in records {
        latest.insert(timestamp(record), record);
    }
    latest.into_values().map(build).collect()
}

/// Follower counts of one Bilibili streamer.
pub fn attention_series(samples: &[BilibiliSample]) -> Vec<SeriesPoint> {
    dedup_by_timestamp(
        samples,
        |s| s.record_time,
        |s| SeriesPoint {
            time: ts_to_iso(s.record_time, BilibiliSample::TIME_UNIT),
            timestamp: s.record_time,
            value: s.attention,
        },
    )
}

/// Guard counts of one Bilibili streamer, each tagged with its live status.
pub fn guard_series(samples: &[BilibiliSample]) -> Vec<GuardPoint> {
    dedup_by_timestamp(
        samples,
        |s| s.record_time,
        |s| GuardPoint {
            time: ts_to_iso(s.record_time, BilibiliSample::TIME_UNIT),
            timestamp: s.record_time,
            value: s.guard_num,
            live_status: s.live_status,
        },
    )
}

/// Follower counts of one Douyin streamer. Timestamps stay in milliseconds.
pub fn follower_series(samples: &[DouyinSample]) -> Vec<SeriesPoint> {
    dedup_by_timestamp(
        samples,
        |s| s.record_time,
        |s| SeriesPoint {
            time: ts_to_iso(s.record_time, DouyinSample::TIME_UNIT),
            timestamp: s.record_time,
            value: s.follower_count,
        },
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn bl(record_time: i64, attention: i64, guard_num: i64, live_status: i64) -> BilibiliSample {
        BilibiliSample {
            record_time,
            name: "bl".to_string(),
            uid: 1,
            room_id: 10,
            live_status,
            title: String::new(),
            live_time: None,
            attention,
            online_num: 0,
            guard_num,
        }
    }

    fn dy(record_time: i64, follower_count: i64) -> DouyinSample {
        DouyinSample {
            record_time,
            sec_uid: "MS4w".to_string(),
            nickname: "dy".to_string(),
            live_status: 0,
            follower_count,
            max_follower_count: 0,
            total_favorited: 0,
        }
    }

    // ── dedup_by_timestamp ───────────────────────────────────────────────────

    #[test]
    fn test_dedup_last_occurrence_wins() {
        let records = [(10, "a"), (10, "b"), (5, "c"), (10, "d")];
        let out = dedup_by_timestamp(&records, |r| r.0, |r| r.1);
        assert_eq!(out, vec!["c", "d"]);
    }

    #[test]
    fn test_dedup_sorted_strictly_ascending() {
        let records = [(30, 0), (10, 0), (20, 0), (10, 1), (30, 2)];
        let out = dedup_by_timestamp(&records, |r| r.0, |r| *r);
        let stamps: Vec<i64> = out.iter().map(|r| r.0).collect();
        assert_eq!(stamps, vec![10, 20, 30]);
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_dedup_empty() {
        let out: Vec<i64> = dedup_by_timestamp(&[] as &[(i64, i64)], |r| r.0, |r| r.1);
        assert!(out.is_empty());
    }

    // ── attention_series ─────────────────────────────────────────────────────

    #[test]
    fn test_attention_series_duplicate_stamp_keeps_later_value() {
        let samples = vec![bl(100, 5, 0, 0), bl(100, 6, 0, 0), bl(160, 7, 0, 0)];
        let series = attention_series(&samples);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 100);
        assert_eq!(series[0].value, 6);
        assert_eq!(series[1].value, 7);
    }

    #[test]
    fn test_attention_series_iso_time() {
        let series = attention_series(&[bl(1_704_067_200, 1, 0, 0)]);
        assert_eq!(series[0].time, "2024-01-01T08:00:00+08:00");
    }

    // ── guard_series ─────────────────────────────────────────────────────────

    #[test]
    fn test_guard_series_carries_status_of_surviving_row() {
        let samples = vec![bl(100, 0, 3, 0), bl(100, 0, 4, 1)];
        let series = guard_series(&samples);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value, 4);
        assert_eq!(series[0].live_status, 1);
    }

    // ── follower_series ──────────────────────────────────────────────────────

    #[test]
    fn test_follower_series_keeps_millisecond_stamps() {
        let samples = vec![
            dy(1_704_067_260_000, 11),
            dy(1_704_067_200_000, 10),
            dy(1_704_067_200_000, 12),
        ];
        let series = follower_series(&samples);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 1_704_067_200_000);
        assert_eq!(series[0].value, 12);
        assert_eq!(series[0].time, "2024-01-01T08:00:00+08:00");
        assert_eq!(series[1].time, "2024-01-01T08:01:00+08:00");
    }
}
