//! Offline generate command

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::error::SyncError;
use crate::sync::generate_from_snapshot;

use super::{load_settings, report_error, EXIT_SUCCESS};

/// Execute the generate command
pub fn run_generate(config_path: Option<&Path>, snapshot: &Path, out: Option<PathBuf>) -> ExitCode {
    let overrides = CliOverrides { out, ..Default::default() };

    let result = (|| -> Result<_, SyncError> {
        let config = load_settings(config_path, &overrides)?;
        let paths = config.output.paths();
        let outcome = generate_from_snapshot(snapshot, &paths)?;
        Ok((paths, outcome))
    })();

    match result {
        Ok((paths, outcome)) => {
            println!(
                "Generated {} and {} ({} finding(s) not stored in Figma)",
                paths.css.display(),
                paths.js.display(),
                outcome.report.findings.len()
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => report_error(&e),
    }
}
