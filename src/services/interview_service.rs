use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::dto::interview_dto::{CreateInterviewPayload, UpdateInterviewPayload};
use crate::error::{Error, Result};
use crate::models::interview::{Interview, InterviewFeedback, InterviewStatus};
use crate::store::{EntityStore, InterviewFilter, InterviewPatch};

#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn EntityStore>,
}

impl InterviewService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Interviews always start out `scheduled` with an empty feedback block,
    /// whatever the caller sends. Both referenced records must exist.
    pub async fn create(&self, payload: CreateInterviewPayload) -> Result<Interview> {
        let candidate = self
            .store
            .get_candidate(payload.candidate_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("Candidate {} not found", payload.candidate_id))
            })?;
        self.store
            .get_job(payload.job_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", payload.job_id)))?;

        let now = Utc::now();
        let interview = Interview {
            id: Uuid::new_v4(),
            candidate_id: candidate.id,
            job_id: payload.job_id,
            kind: payload.kind,
            date: payload.date,
            duration: payload.duration,
            interviewer: payload.interviewer,
            status: InterviewStatus::Scheduled,
            notes: payload.notes,
            score: None,
            feedback: InterviewFeedback::default(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_interview(interview.clone()).await?;
        info!(interview_id = %interview.id, candidate_id = %interview.candidate_id, "interview created");
        Ok(interview)
    }

    pub async fn get(&self, id: Uuid) -> Result<Interview> {
        self.store
            .get_interview(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Interview {} not found", id)))
    }

    /// Free-form recruiter updates. Feedback stays optional at every status;
    /// a completed interview without scores is accepted. Nothing here ever
    /// touches the candidate's own status.
    pub async fn update(&self, payload: UpdateInterviewPayload) -> Result<Interview> {
        let status = payload
            .status
            .as_deref()
            .map(str::parse::<InterviewStatus>)
            .transpose()?;
        if let Some(feedback) = &payload.feedback {
            validate_feedback(feedback)?;
        }

        let patch = InterviewPatch {
            kind: payload.kind,
            date: payload.date,
            duration: payload.duration,
            interviewer: payload.interviewer,
            status,
            notes: payload.notes,
            score: payload.score,
            feedback: payload.feedback,
        };
        self.store
            .update_interview(payload.id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Interview {} not found", payload.id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Interview> {
        let interview = self.get(id).await?;
        self.store.delete_interview(id).await?;
        info!(interview_id = %id, "interview deleted");
        Ok(interview)
    }

    pub async fn list(&self, filter: InterviewFilter) -> Result<Vec<Interview>> {
        Ok(self.store.query_interviews(filter).await?)
    }
}

fn validate_feedback(feedback: &InterviewFeedback) -> Result<()> {
    let components = [
        ("technical_skills", feedback.technical_skills),
        ("communication", feedback.communication),
        ("problem_solving", feedback.problem_solving),
        ("cultural_fit", feedback.cultural_fit),
        ("experience", feedback.experience),
        ("overall", feedback.overall),
    ];
    for (name, value) in components {
        if let Some(value) = value {
            if !(0.0..=10.0).contains(&value) {
                return Err(Error::BadRequest(format!(
                    "Feedback {} must be between 0 and 10",
                    name
                )));
            }
        }
    }
    Ok(())
}
