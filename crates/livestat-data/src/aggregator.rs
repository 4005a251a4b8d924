//! Per-platform aggregation of polling rows into per-streamer views.

use std::collections::BTreeMap;

use livestat_core::models::{BilibiliSample, BilibiliStreamer, DouyinSample, DouyinStreamer};
use tracing::debug;

use crate::histogram::{occupancy_histogram, start_edge_histogram};
use crate::series::{attention_series, follower_series, guard_series};
use crate::sessions::session_curves;

// ── StreamerAggregator ────────────────────────────────────────────────────────

/// Stateless helper that groups platform rows by streamer and derives views.
pub struct StreamerAggregator;

impl StreamerAggregator {
    /// Aggregate Bilibili rows, keyed by the decimal form of `uid`.
    ///
    /// The display name comes from the streamer's last row and the room id
    /// from the first.
    pub fn aggregate_bilibili(samples: &[BilibiliSample]) -> BTreeMap<String, BilibiliStreamer> {
        Self::group_by(samples, |s| s.uid)
            .into_iter()
            .filter_map(|(uid, rows)| {
                let first = rows.first()?;
                let last = rows.last()?;

                let streamer = BilibiliStreamer {
                    uid,
                    name: last.name.clone(),
                    room_id: first.room_id,
                    minute_distribution: occupancy_histogram(&rows),
                    attention_series: attention_series(&rows),
                    sessions: session_curves(&rows),
                    guard_series: guard_series(&rows),
                };
                debug!(
                    "bilibili {} ({}): {} rows, {} sessions",
                    uid,
                    streamer.name,
                    rows.len(),
                    streamer.sessions.len()
                );
                Some((uid.to_string(), streamer))
            })
            .collect()
    }

    /// Aggregate Douyin rows, keyed by `sec_uid`.
    ///
    /// The display name comes from the streamer's last row. No session curves
    /// or guard data exist for this platform.
    pub fn aggregate_douyin(samples: &[DouyinSample]) -> BTreeMap<String, DouyinStreamer> {
        Self::group_by(samples, |s| s.sec_uid.clone())
            .into_iter()
            .filter_map(|(sec_uid, rows)| {
                let last = rows.last()?;

                let streamer = DouyinStreamer {
                    sec_uid: sec_uid.clone(),
                    name: last.nickname.clone(),
                    minute_distribution: start_edge_histogram(&rows),
                    follower_series: follower_series(&rows),
                    sessions: Vec::new(),
                    guard_series: Vec::new(),
                };
                debug!(
                    "douyin {} ({}): {} rows, {} session starts",
                    sec_uid,
                    streamer.name,
                    rows.len(),
                    streamer.minute_distribution.total()
                );
                Some((sec_uid, streamer))
            })
            .collect()
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Bucket rows by `key_fn`, keeping input order within each bucket.
    fn group_by<R: Clone, K: Ord>(rows: &[R], key_fn: impl Fn(&R) -> K) -> BTreeMap<K, Vec<R>> {
        let mut groups: BTreeMap<K, Vec<R>> = BTreeMap::new();
        for row in rows {
            groups.entry(key_fn(row)).or_default().push(row.clone());
        }
        groups
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use livestat_core::time_utils::MINUTES_PER_DAY;

    /// 2024-01-01T00:00:00+08:00 in unix seconds.
    const LOCAL_MIDNIGHT: i64 = 1_704_038_400;

    fn make_bl(
        uid: i64,
        name: &str,
        minute: i64,
        live_status: i64,
        live_time: Option<i64>,
    ) -> BilibiliSample {
        BilibiliSample {
            record_time: LOCAL_MIDNIGHT + minute * 60,
            name: name.to_string(),
            uid,
            room_id: uid * 10,
            live_status,
            title: format!("{}'s room", name),
            live_time,
            attention: 1000 + minute,
            online_num: 50,
            guard_num: 3,
        }
    }

    fn make_dy(sec_uid: &str, nickname: &str, minute: i64, live_status: i64) -> DouyinSample {
        DouyinSample {
            record_time: (LOCAL_MIDNIGHT + minute * 60) * 1000,
            sec_uid: sec_uid.to_string(),
            nickname: nickname.to_string(),
            live_status,
            follower_count: 200 + minute,
            max_follower_count: 0,
            total_favorited: 0,
        }
    }

    // ── aggregate_bilibili ────────────────────────────────────────────────────

    #[test]
    fn test_bilibili_groups_by_uid() {
        let samples = vec![
            make_bl(1, "one", 10, 1, Some(5)),
            make_bl(2, "two", 10, 0, None),
            make_bl(1, "one", 20, 1, Some(5)),
        ];
        let result = StreamerAggregator::aggregate_bilibili(&samples);

        assert_eq!(result.len(), 2);
        assert_eq!(result["1"].uid, 1);
        assert_eq!(result["1"].room_id, 10);
        assert_eq!(result["1"].attention_series.len(), 2);
        assert_eq!(result["1"].sessions.len(), 1);
        assert_eq!(result["2"].sessions.len(), 0);
        assert!(result["2"].minute_distribution.is_zero());
    }

    #[test]
    fn test_bilibili_name_from_last_row() {
        let samples = vec![
            make_bl(1, "old name", 10, 0, None),
            make_bl(1, "new name", 20, 0, None),
        ];
        let result = StreamerAggregator::aggregate_bilibili(&samples);
        assert_eq!(result["1"].name, "new name");
    }

    #[test]
    fn test_bilibili_minute_distribution_is_occupancy() {
        let samples = vec![
            make_bl(1, "one", 100, 1, Some(5)),
            make_bl(1, "one", 105, 1, Some(5)),
        ];
        let result = StreamerAggregator::aggregate_bilibili(&samples);
        let hist = &result["1"].minute_distribution;

        assert_eq!(hist.counts().len(), MINUTES_PER_DAY);
        for m in 0..MINUTES_PER_DAY {
            let expected = u32::from((100..=105).contains(&m));
            assert_eq!(hist.get(m), expected, "minute {}", m);
        }
    }

    #[test]
    fn test_bilibili_guard_series_includes_offline_rows() {
        let samples = vec![
            make_bl(1, "one", 10, 0, None),
            make_bl(1, "one", 20, 1, Some(5)),
        ];
        let result = StreamerAggregator::aggregate_bilibili(&samples);
        let statuses: Vec<i64> = result["1"]
            .guard_series
            .iter()
            .map(|g| g.live_status)
            .collect();
        assert_eq!(statuses, vec![0, 1]);
    }

    #[test]
    fn test_bilibili_empty() {
        assert!(StreamerAggregator::aggregate_bilibili(&[]).is_empty());
    }

    // ── aggregate_douyin ──────────────────────────────────────────────────────

    #[test]
    fn test_douyin_edge_histogram_and_empty_sessions() {
        let samples = vec![
            make_dy("a", "first", 0, 0),
            make_dy("a", "first", 1, 1),
            make_dy("a", "renamed", 2, 1),
            make_dy("b", "other", 3, 0),
        ];
        let result = StreamerAggregator::aggregate_douyin(&samples);

        assert_eq!(result.len(), 2);
        let a = &result["a"];
        assert_eq!(a.sec_uid, "a");
        assert_eq!(a.name, "renamed");
        assert_eq!(a.minute_distribution.get(1), 1);
        assert_eq!(a.minute_distribution.total(), 1);
        assert_eq!(a.follower_series.len(), 3);
        assert!(a.sessions.is_empty());
        assert!(a.guard_series.is_empty());
        assert!(result["b"].minute_distribution.is_zero());
    }

    #[test]
    fn test_douyin_streamers_do_not_share_status() {
        // "a" ends live; "b" starting live must still count as a start.
        let samples = vec![make_dy("a", "a", 0, 1), make_dy("b", "b", 5, 1)];
        let result = StreamerAggregator::aggregate_douyin(&samples);
        assert_eq!(result["b"].minute_distribution.get(5), 1);
    }

    #[test]
    fn test_douyin_empty() {
        assert!(StreamerAggregator::aggregate_douyin(&[]).is_empty());
    }
}
