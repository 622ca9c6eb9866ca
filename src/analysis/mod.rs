//! Resume/job compatibility analysis: request, polling and score derivation.
//!
//! The server computes an analysis asynchronously. A freshly created analysis
//! reports three empty skill lists; it is settled as soon as any list is
//! non-empty, and the client never polls a settled analysis again.

pub mod poller;
pub mod score;
pub mod ticker;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{require_field, CareerLensError, CareerLensResult};

pub use poller::{spawn_poller, AnalysisPoller, AnalysisSource, CancelHandle, PollOutcome, PollTask};
pub use score::score;
pub use ticker::{IntervalTicker, ManualTicker, TickController, Ticker};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    #[serde(rename = "jobDescription")]
    pub job_description: String,
    #[serde(rename = "idResume")]
    pub resume_id: i64,
}

impl AnalysisRequest {
    pub fn new(job_title: impl Into<String>, job_description: impl Into<String>, resume_id: i64) -> Self {
        Self {
            job_title: job_title.into(),
            job_description: job_description.into(),
            resume_id,
        }
    }

    /// Required-field check run by callers before submitting.
    pub fn validate(&self) -> CareerLensResult<()> {
        if self.resume_id <= 0 {
            return Err(CareerLensError::validation("select a resume"));
        }
        require_field("job title", &self.job_title)?;
        require_field("job description", &self.job_description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisHandle {
    pub id: i64,
}

impl std::fmt::Display for AnalysisHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "analysis #{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
}

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub matching_skills: Vec<Skill>,
    #[serde(default)]
    pub missing_skills: Vec<Skill>,
    #[serde(default)]
    pub extra_skills: Vec<Skill>,
}

impl AnalysisResult {
    pub fn is_settled(&self) -> bool {
        !self.matching_skills.is_empty()
            || !self.missing_skills.is_empty()
            || !self.extra_skills.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.matching_skills.len()
    }

    pub fn gap_count(&self) -> usize {
        self.missing_skills.len()
    }

    pub fn score(&self) -> u8 {
        score(self.match_count() as u64, self.gap_count() as u64)
    }
}

/// A result that has left the pending state, as handed to the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettledAnalysis {
    pub handle: AnalysisHandle,
    pub result: AnalysisResult,
    pub score: u8,
    /// Fetches issued, the settling one included.
    pub attempts: u32,
    pub settled_at: DateTime<Utc>,
}

impl SettledAnalysis {
    pub fn new(handle: AnalysisHandle, result: AnalysisResult, attempts: u32) -> Self {
        let score = result.score();
        Self {
            handle,
            result,
            score,
            attempts,
            settled_at: Utc::now(),
        }
    }
}
