//! Global CLI options
//!
//! Collects the flags that shape how a run talks to the platform, as opposed
//! to what it links (application name, URL, criticality).

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to the command context.
///
/// # Precedence
///
/// For most options, the precedence is: CLI flag > environment variable > credentials file > default.
/// This struct captures the CLI/env layer; the credentials file is read later in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (pretty, json)
    pub format: OutputFormat,

    /// Credentials profile (defaults to `default`)
    pub profile: Option<String>,

    /// Custom credentials file path (defaults to ~/.veracode/credentials)
    pub credentials_file: Option<String>,

    /// Custom API host for development/testing
    pub api_host: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            profile: cli.profile.clone(),
            credentials_file: cli.credentials_file.clone(),
            api_host: cli.api_host.clone(),
        }
    }

    /// Get profile override as `Option<&str>`.
    pub fn profile_ref(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Get credentials file path as `Option<&str>`.
    pub fn credentials_file_ref(&self) -> Option<&str> {
        self.credentials_file.as_deref()
    }

    /// Get API host override as `Option<&str>`.
    pub fn api_host_ref(&self) -> Option<&str> {
        self.api_host.as_deref()
    }
}
