use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::models::fit_score::{overall_score, FitScore};
use crate::models::job::Job;
use crate::store::{CandidatePatch, EntityStore};

pub struct ComponentScores {
    pub technical: u8,
    pub cultural: u8,
    pub behavioral: u8,
}

/// Produces the three component scores for a candidate/job pair. Kept as a
/// separate seam so the heuristic can be swapped for a deterministic or
/// model-backed scorer without touching the aggregation contract or any
/// caller.
pub trait FitScorer: Send + Sync {
    fn score(&self, candidate: &Candidate, job: &Job) -> ComponentScores;
}

/// Token-overlap scorer with a small random jitter per component. The jitter
/// means repeat calls for the same pair may disagree; callers must not
/// assume otherwise.
pub struct HeuristicScorer;

fn tokens(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.len() > 2)
        .collect()
}

/// Overlap between the candidate narrative and what the job asks for,
/// mapped into [0, 100] with the jitter applied on top.
fn component_score(narrative: &str, expectation: &str) -> u8 {
    let narrative = tokens(narrative);
    let expectation = tokens(expectation);
    let ratio = if expectation.is_empty() {
        0.0
    } else {
        narrative.intersection(&expectation).count() as f64 / expectation.len() as f64
    };
    let base = 55.0 + 35.0 * ratio;
    let jitter: f64 = rand::thread_rng().gen_range(0.0..=10.0);
    (base + jitter).round().clamp(0.0, 100.0) as u8
}

impl FitScorer for HeuristicScorer {
    fn score(&self, candidate: &Candidate, job: &Job) -> ComponentScores {
        let technical_expectation = format!(
            "{} {} {}",
            job.performance.skills.join(" "),
            job.performance.experience,
            job.performance.deliveries
        );
        let behavioral_expectation = format!(
            "{} {} {}",
            job.energy.availability, job.energy.deadlines, job.energy.pressure
        );
        let behavioral_narrative = format!(
            "{} {}",
            candidate.cultural_fit.energy, candidate.cultural_fit.performance
        );

        ComponentScores {
            technical: component_score(&candidate.cultural_fit.performance, &technical_expectation),
            cultural: component_score(
                &candidate.cultural_fit.culture,
                &job.culture.legal_values.join(" "),
            ),
            behavioral: component_score(&behavioral_narrative, &behavioral_expectation),
        }
    }
}

#[derive(Clone)]
pub struct FitScoreService {
    store: Arc<dyn EntityStore>,
    scorer: Arc<dyn FitScorer>,
}

impl FitScoreService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self::with_scorer(store, Arc::new(HeuristicScorer))
    }

    pub fn with_scorer(store: Arc<dyn EntityStore>, scorer: Arc<dyn FitScorer>) -> Self {
        Self { store, scorer }
    }

    /// Scores `candidate_id` against `job_id` and attaches the result to the
    /// candidate, replacing any previous score. Concurrent recalculation of
    /// the same candidate resolves last-write-wins.
    pub async fn calculate(&self, candidate_id: Uuid, job_id: Uuid) -> Result<FitScore> {
        let candidate = self
            .store
            .get_candidate(candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", candidate_id)))?;
        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", job_id)))?;
        if candidate.job_id != job.id {
            return Err(Error::JobMismatch {
                candidate_id,
                job_id,
            });
        }

        let components = self.scorer.score(&candidate, &job);
        let overall = overall_score(components.technical, components.cultural, components.behavioral);
        let fit_score = FitScore {
            technical_score: components.technical,
            cultural_score: components.cultural,
            behavioral_score: components.behavioral,
            overall_score: overall,
            ai_analysis: analysis_text(&candidate, &job, &components, overall),
            calculated_at: Utc::now(),
        };

        let patch = CandidatePatch {
            fit_score: Some(fit_score.clone()),
            ..Default::default()
        };
        self.store
            .update_candidate(candidate_id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", candidate_id)))?;
        info!(candidate_id = %candidate_id, job_id = %job_id, overall, "fit score calculated");
        Ok(fit_score)
    }
}

fn analysis_text(
    candidate: &Candidate,
    job: &Job,
    components: &ComponentScores,
    overall: u8,
) -> String {
    let dimensions = [
        ("technical", components.technical),
        ("cultural", components.cultural),
        ("behavioral", components.behavioral),
    ];
    let mut strongest = dimensions[0];
    let mut weakest = dimensions[0];
    for dim in dimensions {
        if dim.1 > strongest.1 {
            strongest = dim;
        }
        if dim.1 < weakest.1 {
            weakest = dim;
        }
    }
    format!(
        "{} scores {}/100 overall against {}. Strongest dimension: {} ({}); \
         weakest dimension: {} ({}).",
        candidate.name, overall, job.title, strongest.0, strongest.1, weakest.0, weakest.1
    )
}
