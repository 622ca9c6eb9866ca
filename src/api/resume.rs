use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::ApiClient;
use crate::utils::{require_field, CareerLensResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumePayload {
    pub title: String,
    pub description: String,
}

impl ResumePayload {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> CareerLensResult<()> {
        require_field("title", &self.title)?;
        require_field("description", &self.description)
    }
}

/// `GET /resume` answers with a page; only its content is used.
#[derive(Debug, Deserialize)]
struct ResumePage {
    #[serde(default)]
    content: Vec<Resume>,
}

pub struct ResumeApi {
    client: ApiClient,
}

impl ResumeApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists the signed-in user's resumes, degrading to an empty list on any
    /// failure. Use [`ResumeApi::try_list`] when the caller needs the error.
    pub async fn list(&self) -> Vec<Resume> {
        match self.try_list().await {
            Ok(resumes) => resumes,
            Err(e) => {
                warn!("Resume list unavailable, showing none: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_list(&self) -> CareerLensResult<Vec<Resume>> {
        let request = self.client.request(Method::GET, "/resume").await;
        let page: ResumePage = self.client.send_json(request).await?;
        Ok(page.content)
    }

    pub async fn create(&self, payload: &ResumePayload) -> CareerLensResult<Resume> {
        let request = self.client.request(Method::POST, "/resume").await;
        let resume: Resume = self.client.send_json(request.json(payload)).await?;
        info!("Resume created: {} ({})", resume.title, resume.id);
        Ok(resume)
    }

    pub async fn update(&self, id: i64, payload: &ResumePayload) -> CareerLensResult<Resume> {
        let request = self.client.request(Method::PUT, &format!("/resume/{id}")).await;
        let resume: Resume = self.client.send_json(request.json(payload)).await?;
        info!("Resume updated: {} ({})", resume.title, resume.id);
        Ok(resume)
    }

    /// Returns whether the server confirmed the deletion with 200 or 204.
    pub async fn delete(&self, id: i64) -> CareerLensResult<bool> {
        let request = self.client.request(Method::DELETE, &format!("/resume/{id}")).await;
        let response = self.client.send(request).await?;
        Ok(matches!(response.status(), StatusCode::OK | StatusCode::NO_CONTENT))
    }
}
