//! Configuration module for tokensync
//!
//! Provides types and parsing for `tokensync.toml` project configuration
//! and the Figma credentials read from the environment.

pub mod credentials;
pub mod loader;
pub mod schema;

pub use credentials::*;
pub use loader::*;
pub use schema::*;
