use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;
use crate::models::fit_score::FitScore;

/// Free-text self-assessment collected on the application form, mirrored
/// against the job's performance/energy/culture sections when scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalFit {
    pub performance: String,
    pub energy: String,
    pub culture: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    New,
    Reviewed,
    SentToManager,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 3] = [
        CandidateStatus::New,
        CandidateStatus::Reviewed,
        CandidateStatus::SentToManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::New => "new",
            CandidateStatus::Reviewed => "reviewed",
            CandidateStatus::SentToManager => "sent_to_manager",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(CandidateStatus::New),
            "reviewed" => Ok(CandidateStatus::Reviewed),
            "sent_to_manager" => Ok(CandidateStatus::SentToManager),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

/// An application submitted against exactly one job. `job_id` is validated
/// at creation and immutable afterwards; deleting a candidate never touches
/// the job it points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_url: String,
    pub cultural_fit: CulturalFit,
    pub status: CandidateStatus,
    pub fit_score: Option<FitScore>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_status_round_trips_through_str() {
        for status in CandidateStatus::ALL {
            assert_eq!(status.as_str().parse::<CandidateStatus>().unwrap(), status);
        }
    }

    #[test]
    fn candidate_status_serializes_snake_case() {
        let json = serde_json::to_string(&CandidateStatus::SentToManager).unwrap();
        assert_eq!(json, "\"sent_to_manager\"");
    }

    #[test]
    fn unknown_candidate_status_is_rejected() {
        let err = "hired".parse::<CandidateStatus>().unwrap_err();
        assert!(matches!(err, Error::InvalidStatus(v) if v == "hired"));
    }
}
