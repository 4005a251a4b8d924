//! Per-session viewer curves for Bilibili streamers.

use std::collections::BTreeMap;

use livestat_core::models::{BilibiliSample, SessionCurve, SessionPoint};
use livestat_core::time_utils::ts_to_iso;

/// Round to one decimal place.
///
/// Rounds the exact binary value with ties to even, so `0.25` becomes `0.2`
/// and `0.15` (stored just below the tie) becomes `0.1`.
fn round1(x: f64) -> f64 {
    format!("{:.1}", x).parse().unwrap_or(x)
}

/// Build one curve per session, ordered by session id.
///
/// Only rows recorded live under a positive session id take part. Within a
/// session, every point's `elapsed_min` is measured from the session's
/// earliest record, so the first point is always `0.0`. Title and start time
/// come from that earliest record.
pub fn session_curves(samples: &[BilibiliSample]) -> Vec<SessionCurve> {
    let mut groups: BTreeMap<i64, Vec<&BilibiliSample>> = BTreeMap::new();
    for sample in samples {
        if let Some(session) = sample.live_session() {
            groups.entry(session).or_default().push(sample);
        }
    }

    groups
        .into_iter()
        .filter_map(|(session, mut records)| {
            records.sort_by_key(|r| r.record_time);
            let first = *records.first()?;
            let origin = first.record_time;

            let mut data_points: Vec<SessionPoint> = records
                .iter()
                .map(|r| SessionPoint {
                    elapsed_min: round1((r.record_time - origin) as f64 / 60.0),
                    record_time_iso: ts_to_iso(r.record_time, BilibiliSample::TIME_UNIT),
                    online_num: r.online_num,
                    guard_num: r.guard_num,
                    attention: r.attention,
                })
                .collect();
            data_points.sort_by(|a, b| a.elapsed_min.total_cmp(&b.elapsed_min));

            Some(SessionCurve {
                live_time: session,
                start_iso: ts_to_iso(origin, BilibiliSample::TIME_UNIT),
                title: first.title.clone(),
                data_points,
            })
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
