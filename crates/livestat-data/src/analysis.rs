//! Top-level assembly of the visualization dataset.
//!
//! Runs both platform aggregators, wraps each result in its platform
//! envelope and stamps the generation time.

use std::collections::BTreeMap;

use livestat_core::models::{
    BilibiliStreamer, DouyinStreamer, LiveDataset, PlatformEnvelope, Platforms,
};
use livestat_core::time_utils::now_iso;

use crate::aggregator::StreamerAggregator;
use crate::reader::DumpSnapshot;

// ── Platform labels ───────────────────────────────────────────────────────────

/// Display name of the Bilibili envelope.
pub const BILIBILI_DISPLAY_NAME: &str = "Bilibili";

/// Display name of the Douyin envelope.
pub const DOUYIN_DISPLAY_NAME: &str = "抖音";

// ── Public functions ──────────────────────────────────────────────────────────

/// Wrap already-aggregated platform maps into a dataset stamped with the
/// current time.
pub fn assemble(
    bilibili: BTreeMap<String, BilibiliStreamer>,
    douyin: BTreeMap<String, DouyinStreamer>,
) -> LiveDataset {
    LiveDataset {
        platforms: Platforms {
            bilibili: PlatformEnvelope {
                name: BILIBILI_DISPLAY_NAME.to_string(),
                streamers: bilibili,
            },
            douyin: PlatformEnvelope {
                name: DOUYIN_DISPLAY_NAME.to_string(),
                streamers: douyin,
            },
        },
        generated_at: now_iso(),
    }
}

/// Aggregate both platforms of `snapshot` and assemble the dataset.
pub fn build_dataset(snapshot: &DumpSnapshot) -> LiveDataset {
    assemble(
        StreamerAggregator::aggregate_bilibili(&snapshot.bilibili),
        StreamerAggregator::aggregate_douyin(&snapshot.douyin),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
