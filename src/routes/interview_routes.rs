use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interview_dto::{
        CreateInterviewPayload, DeleteInterviewQuery, InterviewListQuery, InterviewListResponse,
        InterviewResponse, UpdateInterviewPayload,
    },
    error::{Error, Result},
    store::InterviewFilter,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/interviews",
    params(
        ("candidateId" = Option<Uuid>, Query, description = "Filter by candidate"),
        ("jobId" = Option<Uuid>, Query, description = "Filter by job")
    ),
    responses(
        (status = 200, description = "Matching interviews", body = Json<InterviewListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Query(query): Query<InterviewListQuery>,
) -> Result<impl IntoResponse> {
    let items = state
        .interviews
        .list(InterviewFilter {
            candidate_id: query.candidate_id,
            job_id: query.job_id,
        })
        .await?;
    Ok(Json(InterviewListResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/interviews",
    request_body = CreateInterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<InterviewResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate or job not found")
    )
)]
#[axum::debug_handler]
pub async fn create_interview(
    State(state): State<AppState>,
    Json(payload): Json<CreateInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state.interviews.create(payload).await?;
    Ok((StatusCode::CREATED, Json(InterviewResponse::from(interview))))
}

#[utoipa::path(
    put,
    path = "/api/interviews",
    request_body = UpdateInterviewPayload,
    responses(
        (status = 200, description = "Interview updated", body = Json<InterviewResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    Json(payload): Json<UpdateInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state.interviews.update(payload).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    delete,
    path = "/api/interviews",
    params(
        ("id" = Uuid, Query, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview deleted, record returned", body = Json<InterviewResponse>),
        (status = 400, description = "Missing interview id"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_interview(
    State(state): State<AppState>,
    Query(query): Query<DeleteInterviewQuery>,
) -> Result<impl IntoResponse> {
    let id = query
        .id
        .ok_or_else(|| Error::BadRequest("Interview ID is required".into()))?;
    let interview = state.interviews.delete(id).await?;
    Ok(Json(InterviewResponse::from(interview)))
}
