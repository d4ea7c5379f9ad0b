//! The sync pipeline
//!
//! fetch -> response snapshot -> audit -> render -> payload snapshot ->
//! write-back -> artifacts. Both artifacts are rendered before anything is
//! sent to Figma, and each step returns early on error, so a failed
//! write-back leaves the previous artifacts untouched.

use crate::audit::{audit, AuditReport};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::export::{render_artifacts, Artifacts, ExportOptions, TokenTable};
use crate::models::VariablesMeta;
use crate::output::{write_all_or_nothing, write_json_pretty, OutputPaths};
use crate::remote::{check_status, FetchedVariables, VariablesApi};
use std::fs;
use std::path::Path;

/// Settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// Read published instead of local variables
    pub published: bool,
    /// Send corrections back to Figma
    pub write_back: bool,
    /// Write raw response and payload snapshots
    pub snapshots: bool,
    pub paths: OutputPaths,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { published: false, write_back: true, snapshots: true, paths: OutputPaths::default() }
    }
}

impl From<&SyncConfig> for SyncOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            published: config.remote.published,
            write_back: config.remote.write_back,
            snapshots: config.output.snapshots,
            paths: config.output.paths(),
        }
    }
}

/// What a completed run did
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub report: AuditReport,
    /// True if a non-empty payload was accepted by Figma
    pub written_back: bool,
    pub tokens: TokenTable,
}

/// Run the whole pipeline against `api`.
pub fn run_sync<A: VariablesApi + ?Sized>(
    api: &A,
    file_key: &str,
    options: &SyncOptions,
) -> Result<SyncOutcome, SyncError> {
    let fetched = api.fetch_variables(file_key, options.published).map_err(SyncError::RemoteFetch)?;
    if options.snapshots {
        write_json_pretty(&options.paths.response_snapshot(), &fetched.raw)?;
    }

    let meta = &fetched.response.meta;
    let report = audit(meta)?;
    let (tokens, artifacts) = render(meta, &report, &options.paths)?;
    let mut written_back = false;

    if !report.payload.is_empty() {
        if options.snapshots {
            write_json_pretty(&options.paths.payload_snapshot(), &report.payload)?;
        }

        if options.write_back {
            api.write_variables(file_key, &report.payload).map_err(SyncError::RemoteWrite)?;
            log::info!("Successfully updated variables in Figma.");
            written_back = true;
        } else {
            log::warn!(
                "Write-back skipped: {} correction(s) were not stored in Figma. The generated files will be out of sync and should not be used in a production environment.",
                report.payload.len()
            );
        }
    }

    write_rendered(&artifacts, &options.paths)?;
    Ok(SyncOutcome { report, written_back, tokens })
}

/// Fetch and audit without writing anything.
pub fn audit_remote<A: VariablesApi + ?Sized>(
    api: &A,
    file_key: &str,
    published: bool,
) -> Result<AuditReport, SyncError> {
    let fetched = api.fetch_variables(file_key, published).map_err(SyncError::RemoteFetch)?;
    audit(&fetched.response.meta)
}

/// Audit a saved fetch snapshot and regenerate the artifacts from it.
pub fn generate_from_snapshot(snapshot: &Path, paths: &OutputPaths) -> Result<SyncOutcome, SyncError> {
    log::info!("Reading snapshot {}", snapshot.display());
    let text = fs::read_to_string(snapshot)?;
    let fetched = FetchedVariables::from_json(&text)?;
    check_status(200, &fetched.raw).map_err(SyncError::RemoteFetch)?;

    let report = audit(&fetched.response.meta)?;
    if !report.payload.is_empty() {
        log::warn!(
            "{} correction(s) found in the snapshot were not stored in Figma.",
            report.payload.len()
        );
    }

    let tokens = write_artifacts(&fetched.response.meta, &report, paths)?;
    Ok(SyncOutcome { report, written_back: false, tokens })
}

/// Build the token table and render both artifacts without touching disk.
pub fn render(
    meta: &VariablesMeta,
    report: &AuditReport,
    paths: &OutputPaths,
) -> Result<(TokenTable, Artifacts), SyncError> {
    let tokens = TokenTable::build(meta, &report.ramps)?;
    let options = ExportOptions { js_import_path: paths.js_import_path() };
    let artifacts = render_artifacts(&tokens, &options)?;
    Ok((tokens, artifacts))
}

fn write_rendered(artifacts: &Artifacts, paths: &OutputPaths) -> Result<(), SyncError> {
    write_all_or_nothing(&[
        (paths.css.as_path(), artifacts.css.as_str()),
        (paths.js.as_path(), artifacts.js.as_str()),
    ])?;
    Ok(())
}

/// Build the token table and write both artifacts.
pub fn write_artifacts(
    meta: &VariablesMeta,
    report: &AuditReport,
    paths: &OutputPaths,
) -> Result<TokenTable, SyncError> {
    let (tokens, artifacts) = render(meta, report, paths)?;
    write_rendered(&artifacts, paths)?;
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WritePayload;
    use crate::output::{PAYLOAD_SNAPSHOT_FILE, RESPONSE_SNAPSHOT_FILE};
    use crate::remote::RemoteError;
    use crate::resolve::ResolveError;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use tempfile::TempDir;

    const FIXTURE: &str = include_str!("../tests/fixtures/variables_response.json");

    struct FakeApi {
        body: String,
        write_status: u16,
        writes: RefCell<Vec<Value>>,
    }

    impl FakeApi {
        fn new(body: &str, write_status: u16) -> Self {
            Self { body: body.to_string(), write_status, writes: RefCell::new(Vec::new()) }
        }
    }

    impl VariablesApi for FakeApi {
        fn fetch_variables(&self, _file_key: &str, _published: bool) -> Result<FetchedVariables, RemoteError> {
            let raw: Value = serde_json::from_str(&self.body).unwrap();
            check_status(200, &raw)?;
            Ok(FetchedVariables::from_value(raw).unwrap())
        }

        fn write_variables(&self, _file_key: &str, payload: &WritePayload) -> Result<Value, RemoteError> {
            self.writes.borrow_mut().push(serde_json::to_value(payload).unwrap());
            match self.write_status {
                200 => Ok(json!({"status": 200, "error": false})),
                403 => Err(RemoteError::InsufficientPrivilege),
                status => Err(RemoteError::Rejected { status, message: "Bad request".into() }),
            }
        }
    }

    fn options(dir: &TempDir) -> SyncOptions {
        SyncOptions { paths: OutputPaths::new(dir.path(), "design-tokens.css", "designTokens.js"), ..Default::default() }
    }

    #[test]
    fn test_full_sync_writes_everything() {
        let dir = TempDir::new().unwrap();
        let api = FakeApi::new(FIXTURE, 200);
        let outcome = run_sync(&api, "file", &options(&dir)).unwrap();

        assert!(outcome.written_back);
        assert_eq!(api.writes.borrow().len(), 1);
        assert_eq!(outcome.report.findings.len(), 10);
        for file in ["design-tokens.css", "designTokens.js", RESPONSE_SNAPSHOT_FILE, PAYLOAD_SNAPSHOT_FILE] {
            assert!(dir.path().join(file).exists(), "{} missing", file);
        }

        let payload: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(PAYLOAD_SNAPSHOT_FILE)).unwrap()).unwrap();
        assert_eq!(payload, api.writes.borrow()[0]);
    }

    #[test]
    fn test_response_snapshot_keeps_remote_order() {
        let dir = TempDir::new().unwrap();
        run_sync(&FakeApi::new(FIXTURE, 200), "file", &options(&dir)).unwrap();
        let snapshot = fs::read_to_string(dir.path().join(RESPONSE_SNAPSHOT_FILE)).unwrap();
        let collections = snapshot.find("\"variableCollections\"").unwrap();
        let variables = snapshot.find("\"variables\"").unwrap();
        assert!(collections < variables);
        assert!(snapshot.starts_with("{\n  \"status\": 200,"));
    }

    #[test]
    fn test_write_failure_writes_no_artifacts() {
        let dir = TempDir::new().unwrap();
        let err = run_sync(&FakeApi::new(FIXTURE, 403), "file", &options(&dir)).unwrap_err();

        assert!(matches!(err, SyncError::RemoteWrite(RemoteError::InsufficientPrivilege)));
        assert!(!dir.path().join("design-tokens.css").exists());
        assert!(!dir.path().join("designTokens.js").exists());
        assert!(dir.path().join(PAYLOAD_SNAPSHOT_FILE).exists());
    }

    #[test]
    fn test_skip_write_still_generates() {
        let dir = TempDir::new().unwrap();
        let api = FakeApi::new(FIXTURE, 500);
        let opts = SyncOptions { write_back: false, ..options(&dir) };
        let outcome = run_sync(&api, "file", &opts).unwrap();

        assert!(!outcome.written_back);
        assert!(api.writes.borrow().is_empty());
        assert!(dir.path().join("design-tokens.css").exists());
    }

    #[test]
    fn test_fetch_failure() {
        let dir = TempDir::new().unwrap();
        let api = FakeApi::new(r#"{"status": 403, "error": true, "message": "Invalid token"}"#, 200);
        let err = run_sync(&api, "file", &options(&dir)).unwrap_err();

        assert!(matches!(err, SyncError::RemoteFetch(RemoteError::Rejected { status: 403, .. })));
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_fatal_audit_writes_only_response_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut raw: Value = serde_json::from_str(FIXTURE).unwrap();
        raw["meta"]["variables"]["VariableID:2:2"]["valuesByMode"]["2:0"]["id"] = json!("VariableID:9:9");
        let api = FakeApi::new(&raw.to_string(), 200);

        let err = run_sync(&api, "file", &options(&dir)).unwrap_err();
        assert!(matches!(err, SyncError::BrokenAlias(ref names) if names == &vec!["Surface/Background".to_string()]));
        assert!(dir.path().join(RESPONSE_SNAPSHOT_FILE).exists());
        assert!(!dir.path().join(PAYLOAD_SNAPSHOT_FILE).exists());
        assert!(!dir.path().join("design-tokens.css").exists());
    }

    #[test]
    fn test_circular_alias_aborts_before_write_back() {
        let dir = TempDir::new().unwrap();
        let mut raw: Value = serde_json::from_str(FIXTURE).unwrap();
        raw["meta"]["variables"]["VariableID:2:1"]["valuesByMode"]["2:0"]["id"] = json!("VariableID:2:2");
        raw["meta"]["variables"]["VariableID:2:2"]["valuesByMode"]["2:0"]["id"] = json!("VariableID:2:1");
        let api = FakeApi::new(&raw.to_string(), 200);

        let err = run_sync(&api, "file", &options(&dir)).unwrap_err();
        assert!(matches!(
            err,
            SyncError::Resolve(ResolveError::Circular(ref chain))
                if chain == &vec!["Brand/Primary", "Surface/Background", "Brand/Primary"]
        ));
        assert!(api.writes.borrow().is_empty());
        assert!(!dir.path().join(PAYLOAD_SNAPSHOT_FILE).exists());
        assert!(!dir.path().join("design-tokens.css").exists());
    }

    #[test]
    fn test_artifact_write_failure_keeps_old_stylesheet() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("design-tokens.css");
        fs::write(&css, "old css").unwrap();
        // A regular file where the JS directory should be
        fs::write(dir.path().join("blocked"), "").unwrap();
        let opts = SyncOptions {
            write_back: false,
            paths: OutputPaths::new(dir.path(), "design-tokens.css", "blocked/designTokens.js"),
            ..Default::default()
        };

        assert!(run_sync(&FakeApi::new(FIXTURE, 200), "file", &opts).is_err());
        assert_eq!(fs::read_to_string(&css).unwrap(), "old css");
    }

    #[test]
    fn test_no_snapshots_option() {
        let dir = TempDir::new().unwrap();
        let opts = SyncOptions { snapshots: false, ..options(&dir) };
        run_sync(&FakeApi::new(FIXTURE, 200), "file", &opts).unwrap();
        assert!(!dir.path().join(RESPONSE_SNAPSHOT_FILE).exists());
        assert!(!dir.path().join(PAYLOAD_SNAPSHOT_FILE).exists());
    }

    #[test]
    fn test_audit_remote_writes_nothing() {
        let api = FakeApi::new(FIXTURE, 200);
        let report = audit_remote(&api, "file", true).unwrap();
        assert_eq!(report.payload.len(), 16);
        assert!(api.writes.borrow().is_empty());
    }

    #[test]
    fn test_generate_from_snapshot_matches_sync() {
        let synced = TempDir::new().unwrap();
        run_sync(&FakeApi::new(FIXTURE, 200), "file", &options(&synced)).unwrap();

        let offline = TempDir::new().unwrap();
        let paths = OutputPaths::new(offline.path(), "design-tokens.css", "designTokens.js");
        let snapshot = synced.path().join(RESPONSE_SNAPSHOT_FILE);
        let outcome = generate_from_snapshot(&snapshot, &paths).unwrap();

        assert!(!outcome.written_back);
        assert_eq!(
            fs::read_to_string(offline.path().join("design-tokens.css")).unwrap(),
            fs::read_to_string(synced.path().join("design-tokens.css")).unwrap()
        );
    }

    #[test]
    fn test_sync_options_from_config() {
        let mut config = SyncConfig::default();
        config.remote.published = true;
        config.output.snapshots = false;
        let options = SyncOptions::from(&config);
        assert!(options.published);
        assert!(options.write_back);
        assert!(!options.snapshots);
        assert_eq!(options.paths, OutputPaths::default());
    }
}
