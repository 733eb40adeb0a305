use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::store::{EntityStore, JobFilter, JobPatch};

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn EntityStore>,
    public_base_url: String,
}

pub struct JobList {
    pub items: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

pub struct JobStats {
    pub total: i64,
    pub draft: i64,
    pub published: i64,
    pub closed: i64,
}

impl JobService {
    pub fn new(store: Arc<dyn EntityStore>, public_base_url: String) -> Self {
        Self {
            store,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Jobs start in draft with a link derived from their id; the link is
    /// never accepted from the caller.
    pub async fn create(&self, payload: CreateJobPayload) -> Result<Job> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let job = Job {
            id,
            title: payload.title,
            description: payload.description,
            performance: payload.performance,
            energy: payload.energy,
            culture: payload.culture,
            application_link: format!("{}/apply/{}", self.public_base_url, id),
            status: JobStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_job(job.clone()).await?;
        info!(job_id = %job.id, title = %job.title, "job created");
        Ok(job)
    }

    pub async fn get(&self, id: Uuid) -> Result<Job> {
        self.store
            .get_job(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateJobPayload) -> Result<Job> {
        let status = payload
            .status
            .as_deref()
            .map(str::parse::<JobStatus>)
            .transpose()?;
        let patch = JobPatch {
            title: payload.title,
            description: payload.description,
            performance: payload.performance,
            energy: payload.energy,
            culture: payload.culture,
            status,
        };
        self.store
            .update_job(id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))
    }

    /// Sole deletion path. The store performs the dependent-candidate check
    /// and the delete against one consistent snapshot.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self.store.delete_job(id).await?;
        if !deleted {
            return Err(Error::NotFound(format!("Job {} not found", id)));
        }
        info!(job_id = %id, "job deleted");
        Ok(())
    }

    pub async fn list(&self, query: JobListQuery) -> Result<JobList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let status = query
            .status
            .as_deref()
            .map(str::parse::<JobStatus>)
            .transpose()?;
        let filter = JobFilter {
            status,
            search: query.search,
        };

        let result = self.store.query_jobs(filter, offset, per_page).await?;
        let total_pages = ((result.total as f64) / (per_page as f64)).ceil() as i64;

        Ok(JobList {
            items: result.items,
            total: result.total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn stats(&self) -> Result<JobStats> {
        let counts = self.store.count_jobs_by_status().await?;
        let mut stats = JobStats {
            total: 0,
            draft: 0,
            published: 0,
            closed: 0,
        };
        for (status, count) in counts {
            stats.total += count;
            match status {
                JobStatus::Draft => stats.draft += count,
                JobStatus::Published => stats.published += count,
                JobStatus::Closed => stats.closed += count,
            }
        }
        Ok(stats)
    }
}
