use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::candidate::{Candidate, CandidateStatus, CulturalFit};
use crate::models::fit_score::FitScore;
use crate::services::candidate_service::CandidateList;

/// Assembled by the application route from the multipart form, after the
/// resume has been handed to the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCandidate {
    pub job_id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub resume_url: String,
    #[validate(nested)]
    pub cultural_fit: CulturalFitPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CulturalFitPayload {
    #[validate(length(min = 1))]
    pub performance: String,
    #[validate(length(min = 1))]
    pub energy: String,
    #[validate(length(min = 1))]
    pub culture: String,
}

impl From<CulturalFitPayload> for CulturalFit {
    fn from(value: CulturalFitPayload) -> Self {
        Self {
            performance: value.performance,
            energy: value.energy,
            culture: value.culture,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCandidateStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateFitScorePayload {
    pub job_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CandidateListQuery {
    #[serde(rename = "jobId")]
    pub job_id: Option<Uuid>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_url: String,
    pub cultural_fit: CulturalFit,
    pub status: CandidateStatus,
    pub fit_score: Option<FitScore>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateListResponse {
    pub items: Vec<CandidateResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl From<Candidate> for CandidateResponse {
    fn from(value: Candidate) -> Self {
        Self {
            id: value.id,
            job_id: value.job_id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            resume_url: value.resume_url,
            cultural_fit: value.cultural_fit,
            status: value.status,
            fit_score: value.fit_score,
            created_at: value.created_at,
        }
    }
}

impl From<CandidateList> for CandidateListResponse {
    fn from(value: CandidateList) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}
