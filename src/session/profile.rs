use serde::Serialize;

use super::AuthUser;
use crate::api::ApiClient;
use crate::utils::{CareerLensError, CareerLensResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub user: AuthUser,
    pub resume_count: usize,
    /// Percentage of the profile that is filled in.
    pub completeness: u8,
}

/// Name and email are worth 30 each, a photo and at least one resume 20 each.
pub fn completeness(user: &AuthUser, has_photo: bool, resume_count: usize) -> u8 {
    let mut progress = 0;
    if !user.name.trim().is_empty() {
        progress += 30;
    }
    if user.email.as_deref().is_some_and(|e| !e.trim().is_empty()) {
        progress += 30;
    }
    if has_photo {
        progress += 20;
    }
    if resume_count > 0 {
        progress += 20;
    }
    progress
}

impl ProfileSummary {
    /// Builds the summary for the signed-in user. Resume count uses the
    /// lenient list, so an unreachable server reads as zero resumes.
    pub async fn load(api: &ApiClient) -> CareerLensResult<Self> {
        let session = api
            .sessions()
            .load()
            .await?
            .ok_or(CareerLensError::NotAuthenticated)?;

        let resume_count = api.resumes().list().await.len();
        let completeness = completeness(&session.user, false, resume_count);

        Ok(Self {
            user: session.user,
            resume_count,
            completeness,
        })
    }
}
