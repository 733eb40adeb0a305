use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewKind {
    #[serde(rename = "Technical Interview")]
    Technical,
    #[serde(rename = "Cultural Fit Interview")]
    CulturalFit,
    #[serde(rename = "Behavioral Interview")]
    Behavioral,
    #[serde(rename = "Final Round Interview")]
    FinalRound,
    #[serde(rename = "Phone Screen")]
    PhoneScreen,
    #[serde(rename = "Take-Home Assignment Review")]
    TakeHomeReview,
    #[serde(rename = "Reference Check")]
    ReferenceCheck,
    Other,
}

impl InterviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewKind::Technical => "Technical Interview",
            InterviewKind::CulturalFit => "Cultural Fit Interview",
            InterviewKind::Behavioral => "Behavioral Interview",
            InterviewKind::FinalRound => "Final Round Interview",
            InterviewKind::PhoneScreen => "Phone Screen",
            InterviewKind::TakeHomeReview => "Take-Home Assignment Review",
            InterviewKind::ReferenceCheck => "Reference Check",
            InterviewKind::Other => "Other",
        }
    }
}

impl FromStr for InterviewKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Technical Interview" => Ok(InterviewKind::Technical),
            "Cultural Fit Interview" => Ok(InterviewKind::CulturalFit),
            "Behavioral Interview" => Ok(InterviewKind::Behavioral),
            "Final Round Interview" => Ok(InterviewKind::FinalRound),
            "Phone Screen" => Ok(InterviewKind::PhoneScreen),
            "Take-Home Assignment Review" => Ok(InterviewKind::TakeHomeReview),
            "Reference Check" => Ok(InterviewKind::ReferenceCheck),
            "Other" => Ok(InterviewKind::Other),
            other => Err(Error::BadRequest(format!(
                "Unknown interview type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
    #[serde(rename = "no-show")]
    NoShow,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 5] = [
        InterviewStatus::Scheduled,
        InterviewStatus::Completed,
        InterviewStatus::Cancelled,
        InterviewStatus::Rescheduled,
        InterviewStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
            InterviewStatus::Rescheduled => "rescheduled",
            InterviewStatus::NoShow => "no-show",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(InterviewStatus::Scheduled),
            "completed" => Ok(InterviewStatus::Completed),
            "cancelled" => Ok(InterviewStatus::Cancelled),
            "rescheduled" => Ok(InterviewStatus::Rescheduled),
            "no-show" => Ok(InterviewStatus::NoShow),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongYes,
    Yes,
    Maybe,
    No,
    StrongNo,
}

/// Structured interviewer feedback. Every numeric component is 0-10 and
/// optional at every status; an interview carries a default (empty) feedback
/// block from the moment it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewFeedback {
    pub technical_skills: Option<f32>,
    pub communication: Option<f32>,
    pub problem_solving: Option<f32>,
    pub cultural_fit: Option<f32>,
    pub experience: Option<f32>,
    pub overall: Option<f32>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendation: Recommendation,
    pub next_steps: String,
}

impl Default for InterviewFeedback {
    fn default() -> Self {
        Self {
            technical_skills: None,
            communication: None,
            problem_solving: None,
            cultural_fit: None,
            experience: None,
            overall: None,
            strengths: Vec::new(),
            areas_for_improvement: Vec::new(),
            recommendation: Recommendation::Maybe,
            next_steps: String::new(),
        }
    }
}

/// A scheduled or completed evaluation touchpoint for a candidate/job pair.
/// Always created in `scheduled`; a rescheduled interview is expected to be
/// followed by a new record rather than mutated back to `scheduled`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
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
