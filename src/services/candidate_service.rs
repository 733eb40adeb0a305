use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::dto::candidate_dto::{CandidateListQuery, NewCandidate};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::store::{CandidateFilter, CandidatePatch, EntityStore};

#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn EntityStore>,
}

pub struct CandidateList {
    pub items: Vec<Candidate>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl CandidateService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// The referenced job must exist before anything is written; applications
    /// always start in `new` with no fit score.
    pub async fn create(&self, payload: NewCandidate) -> Result<Candidate> {
        let job = self
            .store
            .get_job(payload.job_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", payload.job_id)))?;

        let candidate = Candidate {
            id: Uuid::new_v4(),
            job_id: job.id,
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            resume_url: payload.resume_url,
            cultural_fit: payload.cultural_fit.into(),
            status: CandidateStatus::New,
            fit_score: None,
            created_at: Utc::now(),
        };
        self.store.insert_candidate(candidate.clone()).await?;
        info!(candidate_id = %candidate.id, job_id = %job.id, "candidate created");
        Ok(candidate)
    }

    pub async fn get(&self, id: Uuid) -> Result<Candidate> {
        self.store
            .get_candidate(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
    }

    /// Transitions are deliberately unordered: any of the three values may
    /// follow any other, and re-setting the current value is a no-op rather
    /// than an error.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Candidate> {
        let status = status.parse::<CandidateStatus>()?;
        let patch = CandidatePatch {
            status: Some(status),
            ..Default::default()
        };
        let candidate = self
            .store
            .update_candidate(id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))?;
        info!(candidate_id = %id, status = %status, "candidate status updated");
        Ok(candidate)
    }

    /// Removing an application never touches the job it pointed at.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self.store.delete_candidate(id).await?;
        if !deleted {
            return Err(Error::NotFound(format!("Candidate {} not found", id)));
        }
        info!(candidate_id = %id, "candidate deleted");
        Ok(())
    }

    pub async fn list(&self, job_id: Uuid, query: CandidateListQuery) -> Result<CandidateList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let status = query
            .status
            .as_deref()
            .map(str::parse::<CandidateStatus>)
            .transpose()?;
        let filter = CandidateFilter { job_id, status };

        let result = self.store.query_candidates(filter, offset, per_page).await?;
        let total_pages = ((result.total as f64) / (per_page as f64)).ceil() as i64;

        Ok(CandidateList {
            items: result.items,
            total: result.total,
            page,
            per_page,
            total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::candidate_dto::CulturalFitPayload;
    use crate::dto::job_dto::CreateJobPayload;
    use crate::models::job::{JobCulture, JobEnergy, JobPerformance};
    use crate::services::job_service::JobService;
    use crate::store::MemoryStore;

    fn new_candidate(job_id: Uuid, name: &str) -> NewCandidate {
        NewCandidate {
            job_id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: "+1234567890".to_string(),
            resume_url: "http://localhost:3000/uploads/r.pdf".to_string(),
            cultural_fit: CulturalFitPayload {
                performance: "Strong track record shipping backend systems".to_string(),
                energy: "Steady under deadline pressure".to_string(),
                culture: "Values integrity and ownership".to_string(),
            },
        }
    }

    async fn seeded_job(store: Arc<MemoryStore>) -> Uuid {
        let jobs = JobService::new(store, "http://localhost:3000".to_string());
        jobs.create(CreateJobPayload {
            title: "Backend Engineer".to_string(),
            description: "Rust services".to_string(),
            performance: JobPerformance {
                experience: "5 years".to_string(),
                deliveries: "services".to_string(),
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
        })
        .await
        .unwrap()
        .id
    }

    #[test]
    fn creation_against_missing_job_writes_nothing() {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::new());
            let svc = CandidateService::new(store.clone());
            let ghost_job = Uuid::new_v4();

            let err = svc.create(new_candidate(ghost_job, "Alice")).await.unwrap_err();
            assert!(matches!(err, Error::NotFound(_)));

            let page = svc.list(ghost_job, CandidateListQuery::default()).await.unwrap();
            assert_eq!(page.total, 0);
        });
    }

    #[test]
    fn new_candidates_start_in_new_without_score() {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::new());
            let job_id = seeded_job(store.clone()).await;
            let svc = CandidateService::new(store);

            let candidate = svc.create(new_candidate(job_id, "Alice")).await.unwrap();
            assert_eq!(candidate.status, CandidateStatus::New);
            assert!(candidate.fit_score.is_none());
        });
    }

    #[test]
    fn status_accepts_any_of_the_three_values_and_nothing_else() {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::new());
            let job_id = seeded_job(store.clone()).await;
            let svc = CandidateService::new(store);
            let candidate = svc.create(new_candidate(job_id, "Alice")).await.unwrap();

            // forward, backward, skip - all allowed
            for target in ["sent_to_manager", "new", "reviewed"] {
                let updated = svc.update_status(candidate.id, target).await.unwrap();
                assert_eq!(updated.status.as_str(), target);
            }

            let err = svc.update_status(candidate.id, "hired").await.unwrap_err();
            assert!(matches!(err, Error::InvalidStatus(v) if v == "hired"));
            assert_eq!(
                svc.get(candidate.id).await.unwrap().status,
                CandidateStatus::Reviewed
            );
        });
    }

    #[test]
    fn setting_the_same_status_twice_is_idempotent() {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::new());
            let job_id = seeded_job(store.clone()).await;
            let svc = CandidateService::new(store);
            let candidate = svc.create(new_candidate(job_id, "Alice")).await.unwrap();

            let once = svc.update_status(candidate.id, "reviewed").await.unwrap();
            let twice = svc.update_status(candidate.id, "reviewed").await.unwrap();
            assert_eq!(once.status, twice.status);
            assert_eq!(once.created_at, twice.created_at);
            assert_eq!(once.fit_score, twice.fit_score);
        });
    }

    #[test]
    fn pagination_windows_twenty_five_candidates() {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::new());
            let job_id = seeded_job(store.clone()).await;
            let svc = CandidateService::new(store);
            for i in 0..25 {
                svc.create(new_candidate(job_id, &format!("Candidate {}", i)))
                    .await
                    .unwrap();
            }

            let third = svc
                .list(
                    job_id,
                    CandidateListQuery {
                        page: Some(3),
                        per_page: Some(10),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(third.items.len(), 5);
            assert_eq!(third.total, 25);
            assert_eq!(third.total_pages, 3);

            let fourth = svc
                .list(
                    job_id,
                    CandidateListQuery {
                        page: Some(4),
                        per_page: Some(10),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert!(fourth.items.is_empty());
            assert_eq!(fourth.total, 25);
        });
    }

    #[test]
    fn deleting_a_candidate_leaves_the_job_in_place() {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::new());
            let job_id = seeded_job(store.clone()).await;
            let svc = CandidateService::new(store.clone());
            let candidate = svc.create(new_candidate(job_id, "Alice")).await.unwrap();

            svc.delete(candidate.id).await.unwrap();
            assert!(matches!(
                svc.get(candidate.id).await.unwrap_err(),
                Error::NotFound(_)
            ));
            assert!(store.get_job(job_id).await.unwrap().is_some());
        });
    }
}
