//! Artifact and snapshot file output

use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Default output directory.
pub const DEFAULT_OUT_DIR: &str = "generated";
/// Default stylesheet file name.
pub const DEFAULT_CSS_FILE: &str = "design-tokens.css";
/// Default JS module file name.
pub const DEFAULT_JS_FILE: &str = "designTokens.js";
/// Raw body of the last successful fetch.
pub const RESPONSE_SNAPSHOT_FILE: &str = "lastRawFigmaSuccessResponse.json";
/// Last write-back payload.
pub const PAYLOAD_SNAPSHOT_FILE: &str = "lastRawFigmaWritePayload.json";

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write `content` to `path`, replacing any existing file.
///
/// Parent directories are created if they don't exist.
pub fn write_text(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    log::info!("Writing to {}", path.display());
    std::fs::write(path, content)
}

fn create_parent(path: &Path) -> io::Result<&Path> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(parent)
        }
        _ => Ok(Path::new(".")),
    }
}

/// Write several files so that either all of them are replaced or none is.
///
/// Every file is first written to a temporary file next to its target. The
/// targets are only replaced once all contents are on disk.
pub fn write_all_or_nothing(files: &[(&Path, &str)]) -> io::Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, content) in files {
        let mut temp = NamedTempFile::new_in(create_parent(path)?)?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        staged.push((temp, *path));
    }

    for (temp, path) in staged {
        log::info!("Writing to {}", path.display());
        temp.persist(path)?;
    }
    Ok(())
}

/// Write `value` as JSON indented with two spaces.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)?;
    Ok(())
}

/// Where a run writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub css: PathBuf,
    pub js: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>, css_file: &str, js_file: &str) -> Self {
        let dir = dir.into();
        Self { css: dir.join(css_file), js: dir.join(js_file), dir }
    }

    pub fn response_snapshot(&self) -> PathBuf {
        self.dir.join(RESPONSE_SNAPSHOT_FILE)
    }

    pub fn payload_snapshot(&self) -> PathBuf {
        self.dir.join(PAYLOAD_SNAPSHOT_FILE)
    }

    /// Import path shown in the JS usage banner, always `/`-separated.
    pub fn js_import_path(&self) -> String {
        let parts: Vec<String> = self
            .js
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        parts.join("/")
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::new(DEFAULT_OUT_DIR, DEFAULT_CSS_FILE, DEFAULT_JS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_paths() {
        let paths = OutputPaths::default();
        assert_eq!(paths.css, Path::new("generated/design-tokens.css"));
        assert_eq!(paths.js, Path::new("generated/designTokens.js"));
        assert_eq!(paths.response_snapshot(), Path::new("generated/lastRawFigmaSuccessResponse.json"));
        assert_eq!(paths.payload_snapshot(), Path::new("generated/lastRawFigmaWritePayload.json"));
        assert_eq!(paths.js_import_path(), "generated/designTokens.js");
    }

    #[test]
    fn test_js_import_path_skips_current_dir() {
        let paths = OutputPaths::new("./web/tokens", "a.css", "tokens.js");
        assert_eq!(paths.js_import_path(), "web/tokens/tokens.js");
    }

    #[test]
    fn test_write_text_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dirs/tokens.css");

        write_text(&path, ":root {}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ":root {}");

        write_text(&path, ":root {\n}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ":root {\n}");
    }

    #[test]
    fn test_write_all_or_nothing_replaces_every_file() {
        let dir = tempdir().unwrap();
        let css = dir.path().join("out/tokens.css");
        let js = dir.path().join("out/tokens.js");
        write_text(&css, "old css").unwrap();

        write_all_or_nothing(&[(&css, ":root {}"), (&js, "export default {};")]).unwrap();
        assert_eq!(std::fs::read_to_string(&css).unwrap(), ":root {}");
        assert_eq!(std::fs::read_to_string(&js).unwrap(), "export default {};");
        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 2);
    }

    #[test]
    fn test_write_all_or_nothing_leaves_files_on_failure() {
        let dir = tempdir().unwrap();
        let css = dir.path().join("tokens.css");
        write_text(&css, "old css").unwrap();
        // A regular file where the second target's directory should be
        let blocker = dir.path().join("blocked");
        write_text(&blocker, "").unwrap();
        let js = blocker.join("tokens.js");

        assert!(write_all_or_nothing(&[(&css, "new css"), (&js, "new js")]).is_err());
        assert_eq!(std::fs::read_to_string(&css).unwrap(), "old css");
        assert!(!js.exists());
    }

    #[test]
    fn test_write_json_pretty_keeps_key_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let value: serde_json::Value = serde_json::from_str(r#"{"z": 1, "a": [true]}"#).unwrap();

        write_json_pretty(&path, &value).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"z\": 1,\n  \"a\": [\n    true\n  ]\n}"
        );
    }
}
