//! Command execution context
//!
//! Resolves credentials and the API host once, then hands the command a ready
//! API client.

use std::sync::Arc;

use log::debug;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{VeracodeApi, VeracodeClient};
use crate::config::ApiConfig;
use crate::error::Result;

/// Context for command execution containing the API client and output format.
pub struct CommandContext {
    /// Signed API client
    pub client: Arc<dyn VeracodeApi>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// This handles:
    /// - Resolving credentials (environment, then credentials file profile)
    /// - Choosing the API host (override, then credential region)
    /// - Creating the signed API client
    ///
    /// # Errors
    /// Returns error if credentials cannot be found or the secret is malformed.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = ApiConfig::resolve(
            opts.api_host_ref(),
            opts.profile_ref(),
            opts.credentials_file_ref(),
        )?;
        debug!("Using API host {}", config.base_url);

        let client = VeracodeClient::new(&config)?;

        Ok(Self::with_client(Arc::new(client), opts.format))
    }

    /// Create a context around an existing client.
    pub fn with_client(client: Arc<dyn VeracodeApi>, format: OutputFormat) -> Self {
        Self { client, format }
    }
}
