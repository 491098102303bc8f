//! Veracode REST API client

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub mod auth;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod veracode;

#[cfg(test)]
pub use mock::MockVeracodeClient;
pub use models::{AnalysisRequest, CreateApplicationRequest, PlatformApplication};
pub use veracode::VeracodeClient;

/// Veracode API operations used to link a dynamic analysis to an application
#[async_trait]
pub trait VeracodeApi: Send + Sync {
    /// Search application profiles by name.
    ///
    /// The platform matches on substrings, so results may contain names that
    /// only contain the query.
    async fn search_applications(&self, name: &str) -> Result<Vec<PlatformApplication>>;

    /// Create an application profile.
    async fn create_application(&self, request: &CreateApplicationRequest) -> Result<ApiReply>;

    /// Create a dynamic analysis.
    async fn create_analysis(&self, request: &AnalysisRequest) -> Result<ApiReply>;
}

/// Status and body of a write request.
///
/// Write endpoints report success through specific status codes, so the
/// caller decides what counts as success.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,

    /// Parsed JSON body, if the response had one
    pub body: Option<Value>,
}

impl ApiReply {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }
}
