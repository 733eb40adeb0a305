use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job::{Job, JobCulture, JobEnergy, JobPerformance, JobStatus};
use crate::services::job_service::JobList;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub performance: JobPerformance,
    pub energy: JobEnergy,
    pub culture: JobCulture,
}

/// Merge-patch payload: absent fields are left untouched. The application
/// link is not here - it is derived at creation time and never editable.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub performance: Option<JobPerformance>,
    pub energy: Option<JobEnergy>,
    pub culture: Option<JobCulture>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub performance: JobPerformance,
    pub energy: JobEnergy,
    pub culture: JobCulture,
    pub application_link: String,
    pub status: JobStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub items: Vec<JobResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatsResponse {
    pub total: i64,
    pub draft: i64,
    pub published: i64,
    pub closed: i64,
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            performance: value.performance,
            energy: value.energy,
            culture: value.culture,
            application_link: value.application_link,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<JobList> for JobListResponse {
    fn from(value: JobList) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}
