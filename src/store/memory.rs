use std::sync::RwLock;

use uuid::Uuid;

use crate::models::candidate::Candidate;
use crate::models::interview::Interview;
use crate::models::job::{Job, JobStatus};

use super::{
    CandidateFilter, CandidatePatch, EntityStore, InterviewFilter, InterviewPatch, JobFilter,
    JobPatch, Page, StoreError, StoreResult,
};

#[derive(Default)]
struct Inner {
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
    interviews: Vec<Interview>,
}

/// In-memory adapter. One lock over all three collections, so the guarded
/// job delete sees jobs and candidates in a single consistent snapshot.
/// Backs the test suites and local runs without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> StoreError {
        StoreError::Backend("memory store lock poisoned".to_string())
    }
}

fn window<T: Clone>(mut items: Vec<T>, offset: i64, limit: i64) -> Page<T> {
    let total = items.len() as i64;
    let start = offset.max(0).min(total) as usize;
    let end = (start + limit.max(0) as usize).min(items.len());
    items.drain(..start);
    items.truncate(end - start);
    Page { items, total }
}

#[async_trait::async_trait]
impl EntityStore for MemoryStore {
    async fn insert_job(&self, job: Job) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.jobs.push(job);
        Ok(())
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(inner.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> StoreResult<Option<Job>> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        let Some(job) = inner.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            job.title = title;
        }
        if let Some(description) = patch.description {
            job.description = description;
        }
        if let Some(performance) = patch.performance {
            job.performance = performance;
        }
        if let Some(energy) = patch.energy {
            job.energy = energy;
        }
        if let Some(culture) = patch.culture {
            job.culture = culture;
        }
        if let Some(status) = patch.status {
            job.status = status;
        }
        job.updated_at = chrono::Utc::now();
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        if !inner.jobs.iter().any(|j| j.id == id) {
            return Ok(false);
        }
        if inner.candidates.iter().any(|c| c.job_id == id) {
            return Err(StoreError::DependentsExist);
        }
        inner.jobs.retain(|j| j.id != id);
        Ok(true)
    }

    async fn query_jobs(
        &self,
        filter: JobFilter,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Page<Job>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let mut matched: Vec<Job> = inner
            .jobs
            .iter()
            .filter(|j| filter.status.map_or(true, |s| j.status == s))
            .filter(|j| {
                needle.as_deref().map_or(true, |q| {
                    j.title.to_lowercase().contains(q)
                        || j.description.to_lowercase().contains(q)
                })
            })
            .cloned()
            .collect();
        matched.reverse();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(window(matched, offset, limit))
    }

    async fn count_jobs_by_status(&self) -> StoreResult<Vec<(JobStatus, i64)>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(JobStatus::ALL
            .iter()
            .map(|&status| {
                let count = inner.jobs.iter().filter(|j| j.status == status).count();
                (status, count as i64)
            })
            .collect())
    }

    async fn insert_candidate(&self, candidate: Candidate) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.candidates.push(candidate);
        Ok(())
    }

    async fn get_candidate(&self, id: Uuid) -> StoreResult<Option<Candidate>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(inner.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn update_candidate(
        &self,
        id: Uuid,
        patch: CandidatePatch,
    ) -> StoreResult<Option<Candidate>> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        let Some(candidate) = inner.candidates.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(status) = patch.status {
            candidate.status = status;
        }
        if let Some(fit_score) = patch.fit_score {
            candidate.fit_score = Some(fit_score);
        }
        Ok(Some(candidate.clone()))
    }

    async fn delete_candidate(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        let before = inner.candidates.len();
        inner.candidates.retain(|c| c.id != id);
        Ok(inner.candidates.len() != before)
    }

    async fn query_candidates(
        &self,
        filter: CandidateFilter,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Page<Candidate>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        let mut matched: Vec<Candidate> = inner
            .candidates
            .iter()
            .filter(|c| c.job_id == filter.job_id)
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        matched.reverse();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(window(matched, offset, limit))
    }

    async fn insert_interview(&self, interview: Interview) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.interviews.push(interview);
        Ok(())
    }

    async fn get_interview(&self, id: Uuid) -> StoreResult<Option<Interview>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(inner.interviews.iter().find(|i| i.id == id).cloned())
    }

    async fn update_interview(
        &self,
        id: Uuid,
        patch: InterviewPatch,
    ) -> StoreResult<Option<Interview>> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        let Some(interview) = inner.interviews.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if let Some(kind) = patch.kind {
            interview.kind = kind;
        }
        if let Some(date) = patch.date {
            interview.date = date;
        }
        if let Some(duration) = patch.duration {
            interview.duration = duration;
        }
        if let Some(interviewer) = patch.interviewer {
            interview.interviewer = interviewer;
        }
        if let Some(status) = patch.status {
            interview.status = status;
        }
        if let Some(notes) = patch.notes {
            interview.notes = notes;
        }
        if let Some(score) = patch.score {
            interview.score = Some(score);
        }
        if let Some(feedback) = patch.feedback {
            interview.feedback = feedback;
        }
        interview.updated_at = chrono::Utc::now();
        Ok(Some(interview.clone()))
    }

    async fn delete_interview(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        let before = inner.interviews.len();
        inner.interviews.retain(|i| i.id != id);
        Ok(inner.interviews.len() != before)
    }

    async fn query_interviews(&self, filter: InterviewFilter) -> StoreResult<Vec<Interview>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        let mut matched: Vec<Interview> = inner
            .interviews
            .iter()
            .filter(|i| filter.candidate_id.map_or(true, |c| i.candidate_id == c))
            .filter(|i| filter.job_id.map_or(true, |j| i.job_id == j))
            .cloned()
            .collect();
        matched.reverse();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::{CandidateStatus, CulturalFit};
    use crate::models::job::{JobCulture, JobEnergy, JobPerformance};
    use chrono::Utc;

    fn job(title: &str, status: JobStatus) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "desc".to_string(),
            performance: JobPerformance {
                experience: "3 years".to_string(),
                deliveries: "ship features".to_string(),
                skills: vec!["rust".to_string()],
            },
            energy: JobEnergy {
                availability: "full-time".to_string(),
                deadlines: "weekly".to_string(),
                pressure: "moderate".to_string(),
            },
            culture: JobCulture {
                legal_values: vec!["integrity".to_string()],
            },
            application_link: format!("http://localhost/apply/{}", title),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn candidate(job_id: Uuid) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            job_id,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: "+100".to_string(),
            resume_url: "http://localhost/uploads/x.pdf".to_string(),
            cultural_fit: CulturalFit {
                performance: "ships".to_string(),
                energy: "steady".to_string(),
                culture: "aligned".to_string(),
            },
            status: CandidateStatus::New,
            fit_score: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn guarded_delete_refuses_while_candidates_remain() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let j = job("guarded", JobStatus::Draft);
            let job_id = j.id;
            store.insert_job(j).await.unwrap();
            let c = candidate(job_id);
            let candidate_id = c.id;
            store.insert_candidate(c).await.unwrap();

            let err = store.delete_job(job_id).await.unwrap_err();
            assert!(matches!(err, StoreError::DependentsExist));
            assert!(store.get_job(job_id).await.unwrap().is_some());

            assert!(store.delete_candidate(candidate_id).await.unwrap());
            assert!(store.delete_job(job_id).await.unwrap());
            assert!(store.get_job(job_id).await.unwrap().is_none());
        });
    }

    #[test]
    fn delete_missing_job_reports_absence() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            assert!(!store.delete_job(Uuid::new_v4()).await.unwrap());
        });
    }

    #[test]
    fn job_query_filters_compose_and_total_ignores_window() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store
                .insert_job(job("Senior Rust Engineer", JobStatus::Published))
                .await
                .unwrap();
            store
                .insert_job(job("Junior Rust Engineer", JobStatus::Draft))
                .await
                .unwrap();
            store
                .insert_job(job("Office Manager", JobStatus::Published))
                .await
                .unwrap();

            let page = store
                .query_jobs(
                    JobFilter {
                        status: Some(JobStatus::Published),
                        search: Some("rust".to_string()),
                    },
                    0,
                    10,
                )
                .await
                .unwrap();
            assert_eq!(page.total, 1);
            assert_eq!(page.items[0].title, "Senior Rust Engineer");

            let page = store
                .query_jobs(JobFilter::default(), 2, 10)
                .await
                .unwrap();
            assert_eq!(page.total, 3);
            assert_eq!(page.items.len(), 1);

            let page = store
                .query_jobs(JobFilter::default(), 30, 10)
                .await
                .unwrap();
            assert_eq!(page.total, 3);
            assert!(page.items.is_empty());
        });
    }

    #[test]
    fn candidate_query_is_scoped_to_one_job() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let a = job("a", JobStatus::Published);
            let b = job("b", JobStatus::Published);
            let (a_id, b_id) = (a.id, b.id);
            store.insert_job(a).await.unwrap();
            store.insert_job(b).await.unwrap();
            for _ in 0..3 {
                store.insert_candidate(candidate(a_id)).await.unwrap();
            }
            store.insert_candidate(candidate(b_id)).await.unwrap();

            let page = store
                .query_candidates(
                    CandidateFilter {
                        job_id: a_id,
                        status: None,
                    },
                    0,
                    10,
                )
                .await
                .unwrap();
            assert_eq!(page.total, 3);
            assert!(page.items.iter().all(|c| c.job_id == a_id));
        });
    }

    #[test]
    fn query_returns_newest_first() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let mut older = job("older", JobStatus::Draft);
            older.created_at = Utc::now() - chrono::Duration::hours(1);
            let newer = job("newer", JobStatus::Draft);
            store.insert_job(older).await.unwrap();
            store.insert_job(newer).await.unwrap();

            let page = store
                .query_jobs(JobFilter::default(), 0, 10)
                .await
                .unwrap();
            assert_eq!(page.items[0].title, "newer");
            assert_eq!(page.items[1].title, "older");
        });
    }
}
