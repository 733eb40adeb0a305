use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bytes::Bytes;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::candidate_dto::{
        CalculateFitScorePayload, CandidateListQuery, CandidateListResponse, CandidateResponse,
        CulturalFitPayload, NewCandidate, UpdateCandidateStatusPayload,
    },
    error::{Error, Result},
    services::resume_storage::extension_for,
    AppState,
};

/// Boundary limits for the uploaded resume; the core never sees the file.
const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

struct ApplicationForm {
    job_id: Option<Uuid>,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    cultural_fit: Option<String>,
    resume: Option<(String, Bytes)>,
}

async fn read_application_form(mut multipart: Multipart) -> Result<ApplicationForm> {
    let mut form = ApplicationForm {
        job_id: None,
        name: None,
        email: None,
        phone: None,
        cultural_fit: None,
        resume: None,
    };

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "jobId" => {
                let raw = field.text().await?;
                let id = raw
                    .parse()
                    .map_err(|_| Error::BadRequest(format!("Invalid job id: {}", raw)))?;
                form.job_id = Some(id);
            }
            "name" => form.name = Some(field.text().await?),
            "email" => form.email = Some(field.text().await?),
            "phone" => form.phone = Some(field.text().await?),
            "culturalFit" => form.cultural_fit = Some(field.text().await?),
            "resume" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .ok_or_else(|| Error::BadRequest("Resume content type is required".into()))?;
                let data = field.bytes().await?;
                form.resume = Some((content_type, data));
            }
            _ => {}
        }
    }
    Ok(form)
}

#[utoipa::path(
    post,
    path = "/api/candidates",
    responses(
        (status = 201, description = "Application submitted", body = Json<CandidateResponse>),
        (status = 400, description = "Missing or malformed fields"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = read_application_form(multipart).await?;

    let (Some(job_id), Some(name), Some(email), Some(phone), Some(cultural_fit), Some(resume)) = (
        form.job_id,
        form.name,
        form.email,
        form.phone,
        form.cultural_fit,
        form.resume,
    ) else {
        return Err(Error::BadRequest("Missing required fields".into()));
    };

    let cultural_fit: CulturalFitPayload = serde_json::from_str(&cultural_fit)
        .map_err(|_| Error::BadRequest("Invalid cultural fit data".into()))?;

    let (content_type, data) = resume;
    if extension_for(&content_type).is_none() {
        return Err(Error::BadRequest(
            "Invalid file type. Please upload PDF, DOC, or DOCX files only.".into(),
        ));
    }
    if data.len() > MAX_RESUME_BYTES {
        return Err(Error::BadRequest(
            "File size too large. Maximum size is 5MB.".into(),
        ));
    }

    let mut payload = NewCandidate {
        job_id,
        name,
        email,
        phone,
        resume_url: "pending".to_string(),
        cultural_fit,
    };
    payload.validate()?;

    // Reject a dead job reference before the file is written anywhere.
    state.jobs.get(job_id).await?;
    payload.resume_url = state
        .resumes
        .store(job_id, &payload.name, &content_type, data)
        .await?;

    let candidate = state.candidates.create(payload).await?;
    Ok((StatusCode::CREATED, Json(CandidateResponse::from(candidate))))
}

#[utoipa::path(
    get,
    path = "/api/candidates",
    params(
        ("jobId" = Uuid, Query, description = "Job the candidates applied to"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("page" = Option<i64>, Query, description = "Page number, 1-indexed"),
        ("per_page" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Candidates for the job", body = Json<CandidateListResponse>),
        (status = 400, description = "Missing job id")
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse> {
    let job_id = query
        .job_id
        .ok_or_else(|| Error::BadRequest("Job ID is required".into()))?;
    let result = state.candidates.list(job_id, query).await?;
    Ok(Json(CandidateListResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate found", body = Json<CandidateResponse>),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidates.get(id).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    post,
    path = "/api/candidates/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    request_body = UpdateCandidateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<CandidateResponse>),
        (status = 400, description = "Status outside the enumerated set"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCandidateStatusPayload>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidates.update_status(id, &payload.status).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    post,
    path = "/api/candidates/{id}/fit-score",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    request_body = CalculateFitScorePayload,
    responses(
        (status = 200, description = "Score calculated and attached", body = Json<CandidateResponse>),
        (status = 400, description = "Candidate did not apply to this job"),
        (status = 404, description = "Candidate or job not found")
    )
)]
#[axum::debug_handler]
pub async fn calculate_fit_score(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CalculateFitScorePayload>,
) -> Result<impl IntoResponse> {
    state.fit_scores.calculate(id, payload.job_id).await?;
    let candidate = state.candidates.get(id).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 204, description = "Candidate deleted"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.candidates.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
