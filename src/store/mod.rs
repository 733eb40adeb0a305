//! Entity Store Adapter - the persistence boundary the core calls.
//!
//! Everything above this module speaks in domain types; the adapter owns
//! how records are kept. `PgStore` is the production backend, `MemoryStore`
//! the injectable one for tests and local runs, so no service ever touches
//! process-wide state.

pub mod memory;
pub mod postgres;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::fit_score::FitScore;
use crate::models::interview::{
    Interview, InterviewFeedback, InterviewKind, InterviewStatus,
};
use crate::models::job::{Job, JobCulture, JobEnergy, JobPerformance, JobStatus};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Guarded job deletion found candidates still referencing the job.
    #[error("job has dependent candidates")]
    DependentsExist,

    /// Any other backend failure, original message preserved.
    #[error("{0}")]
    Backend(String),
}

/// A query window plus the unpaginated filtered count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    /// Case-insensitive substring over title and description, ANDed with
    /// the status filter.
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CandidateFilter {
    /// Candidate listings are always scoped to exactly one job.
    pub job_id: Uuid,
    pub status: Option<CandidateStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct InterviewFilter {
    pub candidate_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
}

/// Merge-patch for jobs: only `Some` fields are written, everything else is
/// left untouched. `application_link` and `created_at` have no patch field
/// on purpose. Implementations bump `updated_at` on every applied patch.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub performance: Option<JobPerformance>,
    pub energy: Option<JobEnergy>,
    pub culture: Option<JobCulture>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidatePatch {
    pub status: Option<CandidateStatus>,
    /// A new score replaces the previous one wholesale; scores are never
    /// cleared, only overwritten.
    pub fit_score: Option<FitScore>,
}

#[derive(Debug, Clone, Default)]
pub struct InterviewPatch {
    pub kind: Option<InterviewKind>,
    pub date: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub interviewer: Option<String>,
    pub status: Option<InterviewStatus>,
    pub notes: Option<String>,
    pub score: Option<f32>,
    pub feedback: Option<InterviewFeedback>,
}

/// Typed CRUD + query surface over jobs, candidates and interviews.
///
/// Contract notes:
/// - `get_*` return `Ok(None)` for missing rows; only genuine backend
///   failures become `StoreError::Backend`.
/// - `update_*` apply a merge-patch and return the updated record, or
///   `Ok(None)` when the row does not exist.
/// - `query_*` order newest-first by `created_at`; `Page::total` is the
///   unpaginated filtered count.
/// - `delete_job` is atomic with respect to its dependent check: it must
///   observe jobs and candidates in one consistent snapshot and fail with
///   `StoreError::DependentsExist` while any candidate references the job.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EntityStore: Send + Sync {
    // Jobs
    async fn insert_job(&self, job: Job) -> StoreResult<()>;
    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>>;
    async fn update_job(&self, id: Uuid, patch: JobPatch) -> StoreResult<Option<Job>>;
    async fn delete_job(&self, id: Uuid) -> StoreResult<bool>;
    async fn query_jobs(
        &self,
        filter: JobFilter,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Page<Job>>;
    async fn count_jobs_by_status(&self) -> StoreResult<Vec<(JobStatus, i64)>>;

    // Candidates
    async fn insert_candidate(&self, candidate: Candidate) -> StoreResult<()>;
    async fn get_candidate(&self, id: Uuid) -> StoreResult<Option<Candidate>>;
    async fn update_candidate(
        &self,
        id: Uuid,
        patch: CandidatePatch,
    ) -> StoreResult<Option<Candidate>>;
    async fn delete_candidate(&self, id: Uuid) -> StoreResult<bool>;
    async fn query_candidates(
        &self,
        filter: CandidateFilter,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Page<Candidate>>;

    // Interviews
    async fn insert_interview(&self, interview: Interview) -> StoreResult<()>;
    async fn get_interview(&self, id: Uuid) -> StoreResult<Option<Interview>>;
    async fn update_interview(
        &self,
        id: Uuid,
        patch: InterviewPatch,
    ) -> StoreResult<Option<Interview>>;
    async fn delete_interview(&self, id: Uuid) -> StoreResult<bool>;
    async fn query_interviews(&self, filter: InterviewFilter) -> StoreResult<Vec<Interview>>;
}
