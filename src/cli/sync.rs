//! Remote command implementations (sync, audit)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::audit::AuditReport;
use crate::config::CliOverrides;
use crate::error::SyncError;
use crate::remote::FigmaClient;
use crate::sync::{audit_remote, run_sync as run_pipeline, SyncOptions};

use super::{load_settings, report_error, CredentialArgs, EXIT_SUCCESS};

/// Execute the sync command
pub fn run_sync(
    config_path: Option<&Path>,
    credentials: &CredentialArgs,
    published: bool,
    host: Option<String>,
    skip_write: bool,
    out: Option<PathBuf>,
) -> ExitCode {
    let overrides = CliOverrides {
        out,
        published: published.then_some(true),
        write_back: skip_write.then_some(false),
        host,
    };

    let result = (|| -> Result<_, SyncError> {
        let config = load_settings(config_path, &overrides)?;
        let creds = credentials.resolve()?;
        let client = FigmaClient::new(config.host(), creds.token.as_str()).map_err(SyncError::RemoteFetch)?;
        run_pipeline(&client, &creds.file_key, &SyncOptions::from(&config))
    })();

    match result {
        Ok(outcome) => {
            println!(
                "Synced {} semantic mode(s) and {} primitive token(s); {} finding(s){}",
                outcome.tokens.modes().count(),
                outcome.tokens.primitives().len(),
                outcome.report.findings.len(),
                if outcome.written_back { ", corrections written to Figma" } else { "" }
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => report_error(&e),
    }
}

fn print_report(report: &AuditReport, json: bool) -> Result<(), SyncError> {
    if json {
        let value = serde_json::json!({
            "findings": report.findings,
            "payload": report.payload,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for finding in &report.findings {
        println!("{}: {}", finding.kind, finding.message);
    }
    println!(
        "{} finding(s), {} correction(s) would be written to Figma",
        report.findings.len(),
        report.payload.len()
    );
    Ok(())
}

/// Execute the audit command
pub fn run_audit(
    config_path: Option<&Path>,
    credentials: &CredentialArgs,
    published: bool,
    host: Option<String>,
    json: bool,
) -> ExitCode {
    let overrides = CliOverrides { published: published.then_some(true), host, ..Default::default() };

    let result = (|| -> Result<_, SyncError> {
        let config = load_settings(config_path, &overrides)?;
        let creds = credentials.resolve()?;
        let client = FigmaClient::new(config.host(), creds.token.as_str()).map_err(SyncError::RemoteFetch)?;
        let report = audit_remote(&client, &creds.file_key, config.remote.published)?;
        print_report(&report, json)
    })();

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => report_error(&e),
    }
}
