//! Serialization of the dataset into the browser-loadable artifact.
//!
//! The artifact is a small JavaScript file that assigns the pretty-printed
//! JSON dataset to `window.LIVE_DATA`, so the dashboard can load it with a
//! plain `<script>` tag.

use std::path::Path;

use livestat_core::error::{LiveStatError, Result};
use livestat_core::models::LiveDataset;
use tracing::debug;

const HEADER: &str = "// Auto-generated by livestat";
const ASSIGNMENT: &str = "window.LIVE_DATA = ";

/// Render `dataset` as the JavaScript artifact text.
pub fn render_js(dataset: &LiveDataset) -> Result<String> {
    let json = serde_json::to_string_pretty(dataset)?;
    Ok(format!("{}\n{}{};\n", HEADER, ASSIGNMENT, json))
}

/// Parse artifact text produced by [`render_js`] back into a dataset.
pub fn parse_js(text: &str) -> Result<LiveDataset> {
    let start = text
        .find(ASSIGNMENT)
        .ok_or_else(|| LiveStatError::MalformedArtifact("missing LIVE_DATA assignment".into()))?;
    let payload = text[start + ASSIGNMENT.len()..].trim_end();
    let payload = payload
        .strip_suffix(';')
        .ok_or_else(|| LiveStatError::MalformedArtifact("missing trailing ';'".into()))?;
    Ok(serde_json::from_str(payload)?)
}

/// Write the artifact to `path`, creating parent directories as needed.
///
/// The file is written to a temporary sibling and renamed into place.
/// Returns the number of bytes written.
pub fn write_dataset(dataset: &LiveDataset, path: &Path) -> Result<u64> {
    let text = render_js(dataset)?;
    let write_err = |source| LiveStatError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = path.with_extension("js.tmp");
    std::fs::write(&tmp, &text).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;

    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(text.len() as u64)
}

/// Read and parse an artifact previously written by [`write_dataset`].
pub fn read_dataset(path: &Path) -> Result<LiveDataset> {
    let text = std::fs::read_to_string(path).map_err(|source| LiveStatError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_js(&text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::assemble;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn empty_dataset() -> LiveDataset {
        assemble(BTreeMap::new(), BTreeMap::new())
    }

    #[test]
    fn test_render_js_wrapper() {
        let text = render_js(&empty_dataset()).unwrap();
        assert!(text.starts_with("// Auto-generated by livestat\nwindow.LIVE_DATA = {"));
        assert!(text.ends_with("};\n"));
    }

    #[test]
    fn test_render_js_keeps_non_ascii() {
        let text = render_js(&empty_dataset()).unwrap();
        assert!(text.contains("\"抖音\""));
    }

    #[test]
    fn test_parse_js_rejects_plain_json() {
        let err = parse_js("{}").unwrap_err();
        assert!(matches!(err, LiveStatError::MalformedArtifact(_)));
    }

    #[test]
    fn test_parse_js_rejects_missing_semicolon() {
        let err = parse_js("window.LIVE_DATA = {}").unwrap_err();
        assert!(matches!(err, LiveStatError::MalformedArtifact(_)));
    }

    #[test]
    fn test_write_dataset_creates_parents() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("src").join("analyze").join("data.js");
        let dataset = empty_dataset();

        let bytes = write_dataset(&dataset, &path).unwrap();

        assert!(path.is_file());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), bytes);
        assert!(!path.with_extension("js.tmp").exists());
        assert_eq!(read_dataset(&path).unwrap(), dataset);
    }

    #[test]
    fn test_write_dataset_overwrites() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("data.js");
        std::fs::write(&path, "stale").unwrap();

        write_dataset(&empty_dataset(), &path).unwrap();
        assert!(read_dataset(&path).is_ok());
    }
}
