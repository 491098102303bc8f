//! Configuration management for da-app-link
//!
//! Resolves API credentials and the API host once at startup. Credentials come
//! from `VERACODE_API_KEY_ID`/`VERACODE_API_KEY_SECRET` when both are set,
//! otherwise from a profile section of the Veracode credentials file
//! (`~/.veracode/credentials` by default):
//!
//! ```text
//! [default]
//! veracode_api_key_id = <id>
//! veracode_api_key_secret = <secret>
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{ConfigError, Result};

/// Environment variable holding the API key id
pub const ENV_API_KEY_ID: &str = "VERACODE_API_KEY_ID";

/// Environment variable holding the API key secret
pub const ENV_API_KEY_SECRET: &str = "VERACODE_API_KEY_SECRET";

/// Profile used when none is requested
pub const DEFAULT_PROFILE: &str = "default";

const KEY_ID_FIELD: &str = "veracode_api_key_id";
const KEY_SECRET_FIELD: &str = "veracode_api_key_secret";

/// Veracode API region, selected by the credential prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Commercial,
    European,
    Federal,
}

impl Region {
    /// Determine the region from an API key id such as `vera01ei-0123abcd`.
    ///
    /// The prefix is compared case-insensitively.
    pub fn from_key_id(api_key_id: &str) -> Self {
        match api_key_id.split_once('-') {
            Some((prefix, _)) if prefix.eq_ignore_ascii_case("vera01ei") => Region::European,
            Some((prefix, _)) if prefix.eq_ignore_ascii_case("vera01es") => Region::Federal,
            _ => Region::Commercial,
        }
    }

    /// Base URL of the REST API for this region
    pub fn base_url(&self) -> &'static str {
        match self {
            Region::Commercial => "https://api.veracode.com",
            Region::European => "https://api.veracode.eu",
            Region::Federal => "https://api.veracode.us",
        }
    }
}

/// Veracode API credentials
#[derive(Clone)]
pub struct Credentials {
    pub api_key_id: String,
    pub api_key_secret: String,
}

// Keep the secret out of debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key_id", &self.api_key_id)
            .field("api_key_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(api_key_id: impl Into<String>, api_key_secret: impl Into<String>) -> Self {
        Self {
            api_key_id: api_key_id.into(),
            api_key_secret: api_key_secret.into(),
        }
    }

    /// Get the default credentials file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".veracode").join("credentials"))
    }

    /// Read credentials from the environment.
    ///
    /// Returns `Ok(None)` when neither variable is set.
    pub fn from_env() -> Result<Option<Self>> {
        let id = std::env::var(ENV_API_KEY_ID).ok().filter(|v| !v.is_empty());
        let secret = std::env::var(ENV_API_KEY_SECRET)
            .ok()
            .filter(|v| !v.is_empty());

        match (id, secret) {
            (Some(id), Some(secret)) => Ok(Some(Self::new(id, secret))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::Invalid(format!(
                "{ENV_API_KEY_ID} is set but {ENV_API_KEY_SECRET} is not"
            ))
            .into()),
            (None, Some(_)) => Err(ConfigError::Invalid(format!(
                "{ENV_API_KEY_SECRET} is set but {ENV_API_KEY_ID} is not"
            ))
            .into()),
        }
    }

    /// Load a profile from a credentials file
    pub fn load_from(path: &Path, profile: &str) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        Ok(parse_credentials(&contents, profile)?)
    }

    /// Region implied by the key id prefix
    pub fn region(&self) -> Region {
        Region::from_key_id(&self.api_key_id)
    }

    /// Key id without any region prefix, as used for signing
    pub fn signing_key_id(&self) -> &str {
        strip_region_prefix(&self.api_key_id)
    }

    /// Key secret without any region prefix, as used for signing
    pub fn signing_key_secret(&self) -> &str {
        strip_region_prefix(&self.api_key_secret)
    }
}

fn strip_region_prefix(value: &str) -> &str {
    value.rsplit_once('-').map_or(value, |(_, rest)| rest)
}

/// Parse one profile out of an INI-style credentials file.
///
/// Field names are matched case-insensitively, so `VERACODE_API_KEY_ID` and
/// `veracode_api_key_id` are equivalent.
fn parse_credentials(
    contents: &str,
    profile: &str,
) -> std::result::Result<Credentials, ConfigError> {
    let mut sections: HashMap<String, ::config::Value> = ::config::Config::builder()
        .add_source(::config::File::from_str(contents, ::config::FileFormat::Ini))
        .build()
        .and_then(|parsed| parsed.try_deserialize())
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let name = sections
        .keys()
        .find(|name| name.as_str() == profile)
        .or_else(|| sections.keys().find(|name| name.eq_ignore_ascii_case(profile)))
        .cloned()
        .ok_or_else(|| ConfigError::ProfileNotFound(profile.to_string()))?;

    let fields = sections
        .remove(&name)
        .and_then(|section| section.into_table().ok())
        .ok_or_else(|| ConfigError::Invalid(format!("'{profile}' is not a profile section")))?;

    let field = |wanted: &str| {
        fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
            .and_then(|(_, value)| value.clone().into_string().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    match (field(KEY_ID_FIELD), field(KEY_SECRET_FIELD)) {
        (Some(id), Some(secret)) => Ok(Credentials::new(id, secret)),
        _ => Err(ConfigError::Invalid(format!(
            "profile '{profile}' needs both {KEY_ID_FIELD} and {KEY_SECRET_FIELD}"
        ))),
    }
}

/// Resolved API settings for a single run
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without trailing slash
    pub base_url: String,

    pub credentials: Credentials,
}

impl ApiConfig {
    /// Resolve credentials and the API host.
    ///
    /// Precedence: environment credentials over the credentials file, and an
    /// explicit `api_host` over the region implied by the key id.
    pub fn resolve(
        api_host: Option<&str>,
        profile: Option<&str>,
        credentials_file: Option<&str>,
    ) -> Result<Self> {
        let credentials = match Credentials::from_env()? {
            Some(credentials) => {
                debug!("Using credentials from environment");
                credentials
            }
            None => {
                let profile = profile.unwrap_or(DEFAULT_PROFILE);
                let path = match credentials_file {
                    Some(path) => PathBuf::from(path),
                    None => {
                        let path = Credentials::default_path()?;
                        if !path.exists() {
                            return Err(ConfigError::MissingCredentials.into());
                        }
                        path
                    }
                };
                debug!(
                    "Using credentials profile '{}' from {}",
                    profile,
                    path.display()
                );
                Credentials::load_from(&path, profile)?
            }
        };

        Ok(Self::with_credentials(credentials, api_host))
    }

    /// Build a config from known credentials
    pub fn with_credentials(credentials: Credentials, api_host: Option<&str>) -> Self {
        let base_url = api_host
            .map(|host| host.trim_end_matches('/').to_string())
            .unwrap_or_else(|| credentials.region().base_url().to_string());

        Self {
            base_url,
            credentials,
        }
    }
}
