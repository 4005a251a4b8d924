//! Data layer for livestat.
//!
//! Loads a monitoring-database dump, derives per-streamer heatmaps, time
//! series and session curves for both platforms, and writes the combined
//! dataset as a browser-loadable artifact.

pub mod aggregator;
pub mod analysis;
pub mod histogram;
pub mod reader;
pub mod series;
pub mod sessions;
pub mod writer;

pub use livestat_core as core;
