//! Mock Veracode API client for testing
//!
//! Provides a mock implementation of [`VeracodeApi`] for unit testing
//! without making real API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{AnalysisRequest, ApiReply, CreateApplicationRequest, PlatformApplication, VeracodeApi};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockVeracodeClient::new()
///     .with_search_results(vec![app("AcmeApp", "1234")])
///     .await;
///
/// let apps = mock.search_applications("AcmeApp").await?;
/// assert_eq!(apps.len(), 1);
/// ```
pub struct MockVeracodeClient {
    /// Search results, one entry per call; the last entry repeats
    search_results: Arc<Mutex<VecDeque<Vec<PlatformApplication>>>>,
    /// Status returned from create_application
    create_status: Arc<Mutex<u16>>,
    /// Status returned from create_analysis
    analysis_status: Arc<Mutex<u16>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Every call in order, for sequencing assertions
    calls: Arc<Mutex<Vec<ApiCall>>>,
}

impl Default for MockVeracodeClient {
    fn default() -> Self {
        Self {
            search_results: Arc::new(Mutex::new(VecDeque::new())),
            create_status: Arc::new(Mutex::new(200)),
            analysis_status: Arc::new(Mutex::new(201)),
            error: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// A recorded API call with its serialized body
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Search(String),
    CreateApplication(Value),
    CreateAnalysis(Value),
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CallCounts {
    pub search_applications: usize,
    pub create_application: usize,
    pub create_analysis: usize,
}

impl MockVeracodeClient {
    /// Create a new mock client with default responses.
    ///
    /// Searches return nothing, creation returns 200, analyses return 201.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the applications returned by every search.
    pub async fn with_search_results(self, apps: Vec<PlatformApplication>) -> Self {
        self.with_search_sequence(vec![apps]).await
    }

    /// Configure successive search results; the last one repeats.
    pub async fn with_search_sequence(self, results: Vec<Vec<PlatformApplication>>) -> Self {
        *self.search_results.lock().await = results.into();
        self
    }

    /// Configure the status returned from create_application.
    pub async fn with_create_status(self, status: u16) -> Self {
        *self.create_status.lock().await = status;
        self
    }

    /// Configure the status returned from create_analysis.
    pub async fn with_analysis_status(self, status: u16) -> Self {
        *self.analysis_status.lock().await = status;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// All calls made so far, in order.
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().await.clone()
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        let calls = self.calls.lock().await;
        let mut counts = CallCounts::default();
        for call in calls.iter() {
            match call {
                ApiCall::Search(_) => counts.search_applications += 1,
                ApiCall::CreateApplication(_) => counts.create_application += 1,
                ApiCall::CreateAnalysis(_) => counts.create_analysis += 1,
            }
        }
        counts
    }

    /// Bodies submitted to create_analysis.
    pub async fn analysis_bodies(&self) -> Vec<Value> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                ApiCall::CreateAnalysis(body) => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    /// Bodies submitted to create_application.
    pub async fn application_bodies(&self) -> Vec<Value> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                ApiCall::CreateApplication(body) => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<()> {
        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e.into());
        }
        Ok(())
    }

    async fn record(&self, call: ApiCall) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl VeracodeApi for MockVeracodeClient {
    async fn search_applications(&self, name: &str) -> Result<Vec<PlatformApplication>> {
        self.record(ApiCall::Search(name.to_string())).await;
        self.check_error().await?;

        let mut results = self.search_results.lock().await;
        if results.len() > 1 {
            Ok(results.pop_front().unwrap_or_default())
        } else {
            Ok(results.front().cloned().unwrap_or_default())
        }
    }

    async fn create_application(&self, request: &CreateApplicationRequest) -> Result<ApiReply> {
        self.record(ApiCall::CreateApplication(serde_json::to_value(request)?))
            .await;
        self.check_error().await?;

        let status = *self.create_status.lock().await;
        Ok(ApiReply::new(status, None))
    }

    async fn create_analysis(&self, request: &AnalysisRequest) -> Result<ApiReply> {
        self.record(ApiCall::CreateAnalysis(serde_json::to_value(request)?))
            .await;
        self.check_error().await?;

        let status = *self.analysis_status.lock().await;
        Ok(ApiReply::new(status, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(name: &str, uuid: &str) -> PlatformApplication {
        PlatformApplication {
            name: name.to_string(),
            uuid: uuid.to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_sequence_repeats_last() {
        let mock = MockVeracodeClient::new()
            .with_search_sequence(vec![vec![], vec![app("AcmeApp", "1")]])
            .await;

        assert!(mock.search_applications("AcmeApp").await.unwrap().is_empty());
        assert_eq!(mock.search_applications("AcmeApp").await.unwrap().len(), 1);
        assert_eq!(mock.search_applications("AcmeApp").await.unwrap().len(), 1);
        assert_eq!(mock.call_counts().await.search_applications, 3);
    }

    #[tokio::test]
    async fn test_error_is_consumed_once() {
        let mock = MockVeracodeClient::new()
            .with_error(ApiError::Network("down".to_string()))
            .await;

        assert!(mock.search_applications("x").await.is_err());
        assert!(mock.search_applications("x").await.is_ok());
    }
}
