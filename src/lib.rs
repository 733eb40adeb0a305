pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use crate::services::{
    candidate_service::CandidateService, fit_score_service::FitScoreService,
    interview_service::InterviewService, job_service::JobService,
    resume_storage::{LocalResumeStorage, ResumeStorage},
};
use crate::store::EntityStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub jobs: JobService,
    pub candidates: CandidateService,
    pub interviews: InterviewService,
    pub fit_scores: FitScoreService,
    pub resumes: Arc<dyn ResumeStorage>,
}

impl AppState {
    /// Builds the service graph over whichever store adapter the caller
    /// injects - Postgres in production, an in-memory store in tests.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        let config = crate::config::get_config();
        let resumes = Arc::new(LocalResumeStorage::new(
            config.uploads_dir.clone(),
            config.public_base_url.clone(),
        ));
        Self::with_resume_storage(store, resumes)
    }

    pub fn with_resume_storage(
        store: Arc<dyn EntityStore>,
        resumes: Arc<dyn ResumeStorage>,
    ) -> Self {
        let config = crate::config::get_config();
        let jobs = JobService::new(store.clone(), config.public_base_url.clone());
        let candidates = CandidateService::new(store.clone());
        let interviews = InterviewService::new(store.clone());
        let fit_scores = FitScoreService::new(store.clone());

        Self {
            store,
            jobs,
            candidates,
            interviews,
            fit_scores,
            resumes,
        }
    }
}
