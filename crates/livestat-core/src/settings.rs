use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Dump location used when `--sql` is not given, relative to the working
/// directory.
pub const DEFAULT_SQL_PATH: &str = "src/database.sql";

/// Where the generated artifact is written, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "src/analyze/data.js";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Build per-streamer visualization data from a livestream-monitoring dump
#[derive(Parser, Debug, Clone)]
#[command(
    name = "livestat",
    about = "Build per-streamer visualization data from a livestream-monitoring dump",
    version
)]
pub struct Settings {
    /// Path to the SQL dump
    #[arg(long = "sql", value_name = "PATH", default_value = DEFAULT_SQL_PATH)]
    pub sql_path: PathBuf,
}

impl Settings {
    /// Parse settings from the process arguments, exiting on bad input.
    pub fn load() -> Self {
        Settings::parse()
    }

    /// Parse settings from an explicit argument list (first item is the
    /// program name).
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Settings::try_parse_from(args)
    }

    /// The dump path made absolute against the current working directory.
    ///
    /// Falls back to the path as given when the working directory cannot be
    /// determined.
    pub fn resolved_sql_path(&self) -> PathBuf {
        std::path::absolute(&self.sql_path).unwrap_or_else(|_| self.sql_path.clone())
    }

    /// Destination of the generated artifact.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(DEFAULT_OUTPUT_PATH)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
