//! HTTP client for the CareerLens REST API.
//!
//! Every request re-reads the persisted session and attaches its token as a
//! bearer credential when one exists, so signing in or out takes effect on
//! the very next call without rebuilding the client.

pub mod analysis;
pub mod auth;
pub mod resume;

#[cfg(test)]
pub(crate) mod testing;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ApiConfig;
use crate::session::SessionStore;
use crate::utils::{CareerLensError, CareerLensResult};

pub use analysis::AnalysisApi;
pub use auth::AuthApi;
pub use resume::ResumeApi;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    sessions: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, sessions: SessionStore) -> CareerLensResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("careerlens/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sessions,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    pub fn resumes(&self) -> ResumeApi {
        ResumeApi::new(self.clone())
    }

    pub fn analysis(&self) -> AnalysisApi {
        AnalysisApi::new(self.clone())
    }

    /// Builds a request against `path` with the stored bearer token, if any.
    pub(crate) async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, url);
        match self.sessions.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and maps any non-2xx status to a server error.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> CareerLensResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!("API error {}: {}", status, body);
        Err(CareerLensError::server(status.as_u16(), error_message(status, &body)))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> CareerLensResult<T> {
        let response = self.send(builder).await?;
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            CareerLensError::server(status.as_u16(), format!("unexpected response body: {e}"))
        })
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
