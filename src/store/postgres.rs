use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::candidate::{Candidate, CulturalFit};
use crate::models::fit_score::FitScore;
use crate::models::interview::{Interview, InterviewFeedback};
use crate::models::job::{Job, JobCulture, JobEnergy, JobPerformance, JobStatus};

use super::{
    CandidateFilter, CandidatePatch, EntityStore, InterviewFilter, InterviewPatch, JobFilter,
    JobPatch, Page, StoreError, StoreResult,
};

/// Production adapter over Postgres. Nested document fields live in JSONB
/// columns; the candidates->jobs foreign key is declared RESTRICT as a
/// backstop for the guarded delete, which also checks inside a transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        // foreign_key_violation
        if db.code().as_deref() == Some("23503") {
            return StoreError::DependentsExist;
        }
    }
    StoreError::Backend(err.to_string())
}

fn bad_row(what: &str, value: &str) -> StoreError {
    StoreError::Backend(format!("unexpected {} in store: {}", what, value))
}

#[derive(FromRow)]
struct JobRow {
    id: Uuid,
    title: String,
    description: String,
    performance: Json<JobPerformance>,
    energy: Json<JobEnergy>,
    culture: Json<JobCulture>,
    application_link: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = StoreError;

    fn try_from(row: JobRow) -> StoreResult<Self> {
        let status = row
            .status
            .parse::<JobStatus>()
            .map_err(|_| bad_row("job status", &row.status))?;
        Ok(Job {
            id: row.id,
            title: row.title,
            description: row.description,
            performance: row.performance.0,
            energy: row.energy.0,
            culture: row.culture.0,
            application_link: row.application_link,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CandidateRow {
    id: Uuid,
    job_id: Uuid,
    name: String,
    email: String,
    phone: String,
    resume_url: String,
    cultural_fit: Json<CulturalFit>,
    status: String,
    fit_score: Option<Json<FitScore>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = StoreError;

    fn try_from(row: CandidateRow) -> StoreResult<Self> {
        let status = row
            .status
            .parse()
            .map_err(|_| bad_row("candidate status", &row.status))?;
        Ok(Candidate {
            id: row.id,
            job_id: row.job_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            resume_url: row.resume_url,
            cultural_fit: row.cultural_fit.0,
            status,
            fit_score: row.fit_score.map(|j| j.0),
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct InterviewRow {
    id: Uuid,
    candidate_id: Uuid,
    job_id: Uuid,
    kind: String,
    date: DateTime<Utc>,
    duration: String,
    interviewer: String,
    status: String,
    notes: String,
    score: Option<f32>,
    feedback: Json<InterviewFeedback>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InterviewRow> for Interview {
    type Error = StoreError;

    fn try_from(row: InterviewRow) -> StoreResult<Self> {
        let kind = row
            .kind
            .parse()
            .map_err(|_| bad_row("interview type", &row.kind))?;
        let status = row
            .status
            .parse()
            .map_err(|_| bad_row("interview status", &row.status))?;
        Ok(Interview {
            id: row.id,
            candidate_id: row.candidate_id,
            job_id: row.job_id,
            kind,
            date: row.date,
            duration: row.duration,
            interviewer: row.interviewer,
            status,
            notes: row.notes,
            score: row.score,
            feedback: row.feedback.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const JOB_COLUMNS: &str = "id, title, description, performance, energy, culture, \
                           application_link, status, created_at, updated_at";
const CANDIDATE_COLUMNS: &str = "id, job_id, name, email, phone, resume_url, cultural_fit, \
                                 status, fit_score, created_at";
const INTERVIEW_COLUMNS: &str = "id, candidate_id, job_id, kind, date, duration, interviewer, \
                                 status, notes, score, feedback, created_at, updated_at";

#[async_trait::async_trait]
impl EntityStore for PgStore {
    async fn insert_job(&self, job: Job) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO jobs (id, title, description, performance, energy, culture, \
             application_link, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(Json(&job.performance))
        .bind(Json(&job.energy))
        .bind(Json(&job.culture))
        .bind(&job.application_link)
        .bind(job.status.as_str())
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Job::try_from).transpose()
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> StoreResult<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "UPDATE jobs SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                performance = COALESCE($4, performance), \
                energy = COALESCE($5, energy), \
                culture = COALESCE($6, culture), \
                status = COALESCE($7, status), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.performance.map(Json))
        .bind(patch.energy.map(Json))
        .bind(patch.culture.map(Json))
        .bind(patch.status.map(|s| s.as_str().to_string()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Job::try_from).transpose()
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        if exists.is_none() {
            return Ok(false);
        }

        let has_dependents: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM candidates WHERE job_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        if has_dependents {
            return Err(StoreError::DependentsExist);
        }

        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        tx.commit().await.map_err(map_sqlx)?;
        Ok(true)
    }

    async fn query_jobs(
        &self,
        filter: JobFilter,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Page<Job>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            filters.push(format!("status = ${}", args.len() + 1));
            args.push(status.as_str().to_string());
        }
        if let Some(search) = filter.search {
            let first = args.len() + 1;
            let second = first + 1;
            filters.push(format!(
                "(title ILIKE ${} OR description ILIKE ${})",
                first, second
            ));
            args.push(format!("%{}%", search.clone()));
            args.push(format!("%{}%", search));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT {} FROM jobs {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            JOB_COLUMNS,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM jobs {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, JobRow>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        items_statement = items_statement.bind(limit).bind(offset);
        let rows = items_statement
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let items = rows
            .into_iter()
            .map(Job::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Page { items, total })
    }

    async fn count_jobs_by_status(&self) -> StoreResult<Vec<(JobStatus, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM jobs GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;
        let mut counts = Vec::with_capacity(rows.len());
        for (status, count) in rows {
            let status = status
                .parse::<JobStatus>()
                .map_err(|_| bad_row("job status", &status))?;
            counts.push((status, count));
        }
        Ok(counts)
    }

    async fn insert_candidate(&self, candidate: Candidate) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO candidates (id, job_id, name, email, phone, resume_url, \
             cultural_fit, status, fit_score, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(candidate.id)
        .bind(candidate.job_id)
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.resume_url)
        .bind(Json(&candidate.cultural_fit))
        .bind(candidate.status.as_str())
        .bind(candidate.fit_score.as_ref().map(Json))
        .bind(candidate.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn get_candidate(&self, id: Uuid) -> StoreResult<Option<Candidate>> {
        let row = sqlx::query_as::<_, CandidateRow>(&format!(
            "SELECT {} FROM candidates WHERE id = $1",
            CANDIDATE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Candidate::try_from).transpose()
    }

    async fn update_candidate(
        &self,
        id: Uuid,
        patch: CandidatePatch,
    ) -> StoreResult<Option<Candidate>> {
        let row = sqlx::query_as::<_, CandidateRow>(&format!(
            "UPDATE candidates SET \
                status = COALESCE($2, status), \
                fit_score = COALESCE($3, fit_score) \
             WHERE id = $1 \
             RETURNING {}",
            CANDIDATE_COLUMNS
        ))
        .bind(id)
        .bind(patch.status.map(|s| s.as_str().to_string()))
        .bind(patch.fit_score.map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Candidate::try_from).transpose()
    }

    async fn delete_candidate(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(res.rows_affected() > 0)
    }

    async fn query_candidates(
        &self,
        filter: CandidateFilter,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Page<Candidate>> {
        let status = filter.status.map(|s| s.as_str().to_string());
        let (rows, total) = if let Some(status) = status {
            let rows = sqlx::query_as::<_, CandidateRow>(&format!(
                "SELECT {} FROM candidates WHERE job_id = $1 AND status = $2 \
                 ORDER BY created_at DESC LIMIT $3 OFFSET $4",
                CANDIDATE_COLUMNS
            ))
            .bind(filter.job_id)
            .bind(&status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM candidates WHERE job_id = $1 AND status = $2",
            )
            .bind(filter.job_id)
            .bind(&status)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
            (rows, total)
        } else {
            let rows = sqlx::query_as::<_, CandidateRow>(&format!(
                "SELECT {} FROM candidates WHERE job_id = $1 \
                 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                CANDIDATE_COLUMNS
            ))
            .bind(filter.job_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
            let total: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM candidates WHERE job_id = $1")
                    .bind(filter.job_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx)?;
            (rows, total)
        };

        let items = rows
            .into_iter()
            .map(Candidate::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Page { items, total })
    }

    async fn insert_interview(&self, interview: Interview) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO interviews (id, candidate_id, job_id, kind, date, duration, \
             interviewer, status, notes, score, feedback, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(interview.id)
        .bind(interview.candidate_id)
        .bind(interview.job_id)
        .bind(interview.kind.as_str())
        .bind(interview.date)
        .bind(&interview.duration)
        .bind(&interview.interviewer)
        .bind(interview.status.as_str())
        .bind(&interview.notes)
        .bind(interview.score)
        .bind(Json(&interview.feedback))
        .bind(interview.created_at)
        .bind(interview.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn get_interview(&self, id: Uuid) -> StoreResult<Option<Interview>> {
        let row = sqlx::query_as::<_, InterviewRow>(&format!(
            "SELECT {} FROM interviews WHERE id = $1",
            INTERVIEW_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Interview::try_from).transpose()
    }

    async fn update_interview(
        &self,
        id: Uuid,
        patch: InterviewPatch,
    ) -> StoreResult<Option<Interview>> {
        let row = sqlx::query_as::<_, InterviewRow>(&format!(
            "UPDATE interviews SET \
                kind = COALESCE($2, kind), \
                date = COALESCE($3, date), \
                duration = COALESCE($4, duration), \
                interviewer = COALESCE($5, interviewer), \
                status = COALESCE($6, status), \
                notes = COALESCE($7, notes), \
                score = COALESCE($8, score), \
                feedback = COALESCE($9, feedback), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            INTERVIEW_COLUMNS
        ))
        .bind(id)
        .bind(patch.kind.map(|k| k.as_str().to_string()))
        .bind(patch.date)
        .bind(patch.duration)
        .bind(patch.interviewer)
        .bind(patch.status.map(|s| s.as_str().to_string()))
        .bind(patch.notes)
        .bind(patch.score)
        .bind(patch.feedback.map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Interview::try_from).transpose()
    }

    async fn delete_interview(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM interviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(res.rows_affected() > 0)
    }

    async fn query_interviews(&self, filter: InterviewFilter) -> StoreResult<Vec<Interview>> {
        let mut filters = Vec::new();
        let mut args: Vec<Uuid> = Vec::new();

        if let Some(candidate_id) = filter.candidate_id {
            filters.push(format!("candidate_id = ${}", args.len() + 1));
            args.push(candidate_id);
        }
        if let Some(job_id) = filter.job_id {
            filters.push(format!("job_id = ${}", args.len() + 1));
            args.push(job_id);
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let query = format!(
            "SELECT {} FROM interviews {} ORDER BY created_at DESC",
            INTERVIEW_COLUMNS, where_clause
        );
        let mut statement = sqlx::query_as::<_, InterviewRow>(&query);
        for value in &args {
            statement = statement.bind(value);
        }
        let rows = statement.fetch_all(&self.pool).await.map_err(map_sqlx)?;
        rows.into_iter().map(Interview::try_from).collect()
    }
}
