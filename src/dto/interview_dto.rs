use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::interview::{Interview, InterviewFeedback, InterviewKind, InterviewStatus};

/// New interviews always start out `scheduled` with an empty feedback block;
/// neither is accepted from the client here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInterviewPayload {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    #[serde(rename = "type")]
    pub kind: InterviewKind,
    pub date: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub duration: String,
    #[validate(length(min = 1))]
    pub interviewer: String,
    #[serde(default)]
    pub notes: String,
}

/// Collection-level update: the record id travels in the body. Feedback,
/// when present, replaces the whole block.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateInterviewPayload {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: Option<InterviewKind>,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(min = 1))]
    pub duration: Option<String>,
    #[validate(length(min = 1))]
    pub interviewer: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub score: Option<f32>,
    pub feedback: Option<InterviewFeedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InterviewListQuery {
    #[serde(rename = "candidateId")]
    pub candidate_id: Option<Uuid>,
    #[serde(rename = "jobId")]
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteInterviewQuery {
    pub id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewResponse {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    #[serde(rename = "type")]
    pub kind: InterviewKind,
    pub date: DateTime<Utc>,
    pub duration: String,
    pub interviewer: String,
    pub status: InterviewStatus,
    pub notes: String,
    pub score: Option<f32>,
    pub feedback: InterviewFeedback,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewListResponse {
    pub items: Vec<InterviewResponse>,
}

impl From<Interview> for InterviewResponse {
    fn from(value: Interview) -> Self {
        Self {
            id: value.id,
            candidate_id: value.candidate_id,
            job_id: value.job_id,
            kind: value.kind,
            date: value.date,
            duration: value.duration,
            interviewer: value.interviewer,
            status: value.status,
            notes: value.notes,
            score: value.score,
            feedback: value.feedback,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
