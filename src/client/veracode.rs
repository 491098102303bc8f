//! Veracode API client implementation

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use super::auth::HmacSigner;
use super::models::PlatformApplicationsPage;
use super::{AnalysisRequest, ApiReply, CreateApplicationRequest, PlatformApplication, VeracodeApi};
use crate::config::ApiConfig;
use crate::error::{ApiError, ConfigError, Result};

const USER_AGENT: &str = concat!("da-app-link/", env!("CARGO_PKG_VERSION"));

const APPLICATION_SEARCH_PATH: &str = "/was/configservice/v1/platform_applications";
const APPLICATIONS_PATH: &str = "/appsec/v1/applications";
const ANALYSES_PATH: &str = "/was/configservice/v1/analyses";

/// Veracode API client
pub struct VeracodeClient {
    http: HttpClient,
    base_url: String,
    signer: HmacSigner,
}

impl VeracodeClient {
    /// Create a new client for the resolved API settings
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            signer: HmacSigner::new(&config.credentials)?,
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let parsed = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };

        parsed.map_err(|e| ConfigError::Invalid(format!("Invalid API URL {}: {}", raw, e)).into())
    }

    /// Sign and send a request
    async fn send<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response> {
        let authorization = self.signer.authorization(&method, &url)?;
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, authorization);
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await.map_err(ApiError::from)?)
    }

    /// POST a JSON body and hand back the raw status and body
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<ApiReply> {
        let url = self.url(path, &[])?;
        let response = self.send(Method::POST, url, Some(body)).await?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(ApiError::from)?;
        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        };

        Ok(ApiReply::new(status, body))
    }
}

/// Map a failed read request to an error
async fn error_for_status(response: Response) -> ApiError {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => ApiError::NotFound(
            response
                .text()
                .await
                .unwrap_or_else(|_| "Resource not found".to_string()),
        ),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            ApiError::RateLimit(Duration::from_secs(retry_after))
        }
        status if status.is_server_error() => ApiError::ServerError(
            response
                .text()
                .await
                .unwrap_or_else(|_| format!("Server error: {}", status)),
        ),
        status => ApiError::UnexpectedStatus {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        },
    }
}

#[async_trait]
impl VeracodeApi for VeracodeClient {
    async fn search_applications(&self, name: &str) -> Result<Vec<PlatformApplication>> {
        let url = self.url(APPLICATION_SEARCH_PATH, &[("application_name", name)])?;
        let response = self.send::<()>(Method::GET, url, None).await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await.into());
        }

        let text = response.text().await.map_err(ApiError::from)?;
        debug!("Application search response: {}", text);

        let page: PlatformApplicationsPage = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse application search response: {}", e))
        })?;

        Ok(page.into_applications())
    }

    async fn create_application(&self, request: &CreateApplicationRequest) -> Result<ApiReply> {
        self.post(APPLICATIONS_PATH, request).await
    }

    async fn create_analysis(&self, request: &AnalysisRequest) -> Result<ApiReply> {
        self.post(ANALYSES_PATH, request).await
    }
}
