use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::info;

use super::ApiClient;
use crate::analysis::{AnalysisHandle, AnalysisRequest, AnalysisResult, AnalysisSource};
use crate::utils::{CareerLensError, CareerLensResult};

/// Create response; the server may add a status or other fields.
#[derive(Debug, Deserialize)]
struct CreatedAnalysis {
    id: Option<i64>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Clone)]
pub struct AnalysisApi {
    client: ApiClient,
}

impl AnalysisApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submits a request as-is; field validation is the caller's job.
    pub async fn start_analysis(&self, request: &AnalysisRequest) -> CareerLensResult<AnalysisHandle> {
        let builder = self.client.request(Method::POST, "/analysis").await;
        let created: CreatedAnalysis = self.client.send_json(builder.json(request)).await?;

        let id = created
            .id
            .ok_or_else(|| CareerLensError::server(200, "server did not return an analysis id"))?;

        info!(
            "Analysis #{} created ({})",
            id,
            created.status.as_deref().unwrap_or("no status")
        );
        Ok(AnalysisHandle { id })
    }

    pub async fn fetch_result(&self, handle: AnalysisHandle) -> CareerLensResult<AnalysisResult> {
        let builder = self
            .client
            .request(Method::GET, &format!("/analysis/{}", handle.id))
            .await;
        self.client.send_json(builder).await
    }
}

#[async_trait]
impl AnalysisSource for AnalysisApi {
    async fn fetch(&self, handle: AnalysisHandle) -> CareerLensResult<AnalysisResult> {
        self.fetch_result(handle).await
    }
}
