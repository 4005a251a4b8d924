mod bootstrap;

use anyhow::{Context, Result};
use livestat_core::settings::Settings;
use livestat_data::aggregator::StreamerAggregator;
use livestat_data::analysis::assemble;
use livestat_data::reader::load_dump;
use livestat_data::writer::write_dataset;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging()?;
    tracing::info!("livestat v{} starting", env!("CARGO_PKG_VERSION"));

    let sql_path = settings.resolved_sql_path();
    println!("[*] Loading SQL from: {}", sql_path.display());
    let snapshot = load_dump(&sql_path)
        .with_context(|| format!("failed to load dump {}", sql_path.display()))?;

    println!("[*] Processing BLUsers (Bilibili)...");
    let bilibili = StreamerAggregator::aggregate_bilibili(&snapshot.bilibili);
    println!("    Found {} streamers", bilibili.len());

    println!("[*] Processing DYUsers (Douyin)...");
    let douyin = StreamerAggregator::aggregate_douyin(&snapshot.douyin);
    println!("    Found {} streamers", douyin.len());

    let dataset = assemble(bilibili, douyin);

    let output_path = settings.output_path();
    let bytes = write_dataset(&dataset, &output_path)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!("[✓] Output written to: {}", output_path.display());
    println!("    File size: {}", format_megabytes(bytes));

    tracing::info!("Done, generated at {}", dataset.generated_at);
    Ok(())
}

/// Render a byte count as mebibytes with two decimals, e.g. `"1.50 MB"`.
fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(1024 * 1024 * 3 / 2), "1.50 MB");
        assert_eq!(format_megabytes(10_000), "0.01 MB");
    }
}
