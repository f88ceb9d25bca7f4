//! Reqwest-based HTTP transport for the Admin API.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method as HttpMethod};
use url::Url;

use super::{Error, ReqwestConfig, TRACING_TARGET};
use crate::{ApiRequest, ApiResponse, Credentials, Method, Transport, TransportService};

/// Inner client that holds the HTTP client, credentials and configuration.
struct ReqwestClientInner {
    http: Client,
    credentials: Credentials,
    config: ReqwestConfig,
}

/// Reqwest-based transport that signs every call with HTTP basic auth.
///
/// Requests go to `{api_url}/v1_1/{cloud_name}/{action}` with the request
/// body encoded as JSON.
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("credentials", &self.inner.credentials)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest transport for the given account.
    ///
    /// # Errors
    ///
    /// Returns a [`Configuration`](crate::ErrorKind::Configuration) error if
    /// the base URL cannot carry a path, or a transport error if the HTTP
    /// client cannot be created.
    pub fn new(credentials: Credentials, config: ReqwestConfig) -> crate::Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %config.api_url,
            cloud_name = credentials.cloud_name(),
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        if config.api_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(config.api_url.clone()).into());
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(Error::from)?;

        let inner = ReqwestClientInner {
            http,
            credentials,
            config,
        };

        tracing::info!(
            target: TRACING_TARGET,
            "Reqwest client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the transport configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Gets the account credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// Converts this client into a [`TransportService`] for use with dependency injection.
    pub fn into_service(self) -> TransportService {
        TransportService::new(self)
    }

    /// Resolves the account-scoped URL of an action.
    pub fn endpoint(&self, action: &str) -> crate::Result<Url> {
        let mut url = self.inner.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.inner.config.api_url.clone()))?
            .pop_if_empty()
            .push("v1_1")
            .push(self.inner.credentials.cloud_name())
            .extend(action.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestClient {
    fn url(&self, action: &str) -> String {
        self.endpoint(action)
            .map(String::from)
            .unwrap_or_else(|_| action.to_owned())
    }

    async fn execute(&self, request: &ApiRequest) -> crate::Result<ApiResponse> {
        let url = self.endpoint(&request.action)?;
        let body = serde_json::to_vec(&request.body).map_err(Error::Serde)?;
        let method = match request.method {
            Method::Post => HttpMethod::POST,
            Method::Delete => HttpMethod::DELETE,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            method = %request.method,
            url = %url,
            "Sending request"
        );

        let credentials = &self.inner.credentials;
        let http_response = self
            .inner
            .http
            .request(method, url.clone())
            .basic_auth(credentials.api_key(), Some(credentials.api_secret()))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(Error::from)?;

        let status = http_response.status();
        let bytes = http_response.bytes().await.map_err(Error::from)?;

        Ok(ApiResponse::new(status.as_u16(), bytes.to_vec())
            .with_url(url.as_str())
            .with_reason(status.canonical_reason()))
    }
}
