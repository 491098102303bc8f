//! Application profile models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Application profile as returned by the platform application search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformApplication {
    /// Application profile name
    pub name: String,

    /// Unique id used to link scans to the profile
    pub uuid: String,
}

/// Search response for `platform_applications`
///
/// The `_embedded` envelope is omitted by the API when nothing matches, so both
/// levels default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformApplicationsPage {
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedApplications,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedApplications {
    #[serde(default)]
    pub platform_applications: Vec<PlatformApplication>,
}

impl PlatformApplicationsPage {
    pub fn into_applications(self) -> Vec<PlatformApplication> {
        self.embedded.platform_applications
    }
}

/// Business criticality of an application profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessCriticality {
    #[serde(rename = "VL")]
    VeryLow,
    #[serde(rename = "L")]
    Low,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "H")]
    High,
    #[serde(rename = "VH")]
    VeryHigh,
}

impl BusinessCriticality {
    pub const ALL: [BusinessCriticality; 5] = [
        BusinessCriticality::VeryHigh,
        BusinessCriticality::High,
        BusinessCriticality::Medium,
        BusinessCriticality::Low,
        BusinessCriticality::VeryLow,
    ];

    /// Short code sent to the API (`VH`, `H`, ...)
    pub fn code(&self) -> &'static str {
        match self {
            BusinessCriticality::VeryLow => "VL",
            BusinessCriticality::Low => "L",
            BusinessCriticality::Medium => "M",
            BusinessCriticality::High => "H",
            BusinessCriticality::VeryHigh => "VH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BusinessCriticality::VeryLow => "Very Low",
            BusinessCriticality::Low => "Low",
            BusinessCriticality::Medium => "Medium",
            BusinessCriticality::High => "High",
            BusinessCriticality::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for BusinessCriticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BusinessCriticality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| format!("invalid business criticality '{s}' (expected VH, H, M, L or VL)"))
    }
}

/// Request body for creating an application profile
#[derive(Debug, Clone, Serialize)]
pub struct CreateApplicationRequest {
    pub profile: ApplicationProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationProfile {
    pub name: String,
    pub business_criticality: BusinessCriticality,
}

impl CreateApplicationRequest {
    pub fn new(name: impl Into<String>, business_criticality: BusinessCriticality) -> Self {
        Self {
            profile: ApplicationProfile {
                name: name.into(),
                business_criticality,
            },
        }
    }
}
