//! Tokensync - Library for auditing Figma design-token variables
//!
//! This library provides functionality to:
//! - Fetch a Figma file's variables and keep their remote order
//! - Derive tint/shade ramps from `/50` base colors and audit the file against them
//! - Build the correction payload and write it back to Figma
//! - Generate CSS custom properties and a frozen JS token object

pub mod audit;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod naming;
pub mod output;
pub mod ramp;
pub mod remote;
pub mod resolve;
pub mod sync;

pub use audit::{audit, AuditReport, Finding, FindingKind};
pub use error::SyncError;
pub use sync::{generate_from_snapshot, run_sync, SyncOptions, SyncOutcome};
