use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    AssessmentId, AssessmentSubmission, DevelopmentalDomain, StepDirection,
};
use super::evaluation::ScoreError;
use super::guard::RequesterIdentity;
use super::repository::{ArtifactStore, AssessmentRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing HTTP endpoints for the assessment workflow.
pub fn assessment_router<R, A>(service: Arc<AssessmentService<R, A>>) -> Router
where
    R: AssessmentRepository + 'static,
    A: ArtifactStore + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<R, A>))
        .route("/api/v1/assessments/intake", post(intake_handler::<R, A>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(report_handler::<R, A>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/artifact",
            post(finalize_handler::<R, A>),
        )
        .route("/api/v1/catalog/items", get(browse_handler::<R, A>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) requester: RequesterIdentity,
    #[serde(flatten)]
    pub(crate) submission: AssessmentSubmission,
    #[serde(default)]
    pub(crate) reference_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IntakeRequest {
    pub(crate) requester: RequesterIdentity,
    pub(crate) child: super::domain::ChildSnapshot,
    #[serde(default)]
    pub(crate) reference_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FinalizeRequest {
    pub(crate) requester: RequesterIdentity,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdentityQuery {
    pub(crate) requester_id: String,
    pub(crate) role: super::guard::Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BrowseQuery {
    pub(crate) requester_id: String,
    pub(crate) role: super::guard::Role,
    pub(crate) domain: String,
    pub(crate) month_age: f64,
    #[serde(default)]
    pub(crate) direction: Option<StepDirection>,
}

impl IdentityQuery {
    fn identity(self) -> RequesterIdentity {
        RequesterIdentity {
            user_id: self.requester_id,
            role: self.role,
        }
    }
}

pub(crate) async fn submit_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: ArtifactStore + 'static,
{
    let reference_date = request
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());

    match service.submit(&request.requester, request.submission, reference_date) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn intake_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    axum::Json(request): axum::Json<IntakeRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: ArtifactStore + 'static,
{
    let reference_date = request
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());

    match service.intake(&request.requester, &request.child, reference_date) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
    Query(query): Query<IdentityQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: ArtifactStore + 'static,
{
    let identity = query.identity();
    match service.report(&identity, &AssessmentId(assessment_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finalize_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
    axum::Json(request): axum::Json<FinalizeRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: ArtifactStore + 'static,
{
    match service.finalize(&request.requester, &AssessmentId(assessment_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn browse_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Query(query): Query<BrowseQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: ArtifactStore + 'static,
{
    let BrowseQuery {
        requester_id,
        role,
        domain,
        month_age,
        direction,
    } = query;

    let Some(domain) = DevelopmentalDomain::from_label(&domain) else {
        return error_response(ScoreError::UnknownDomain(domain).into());
    };
    let identity = RequesterIdentity {
        user_id: requester_id,
        role,
    };

    match service.browse_items(&identity, domain, month_age, direction) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::Access(_) => StatusCode::FORBIDDEN,
        AssessmentServiceError::Score(_) | AssessmentServiceError::Schedule(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AssessmentServiceError::Artifact { .. } => StatusCode::BAD_GATEWAY,
    };

    let payload = match &error {
        AssessmentServiceError::Artifact { assessment_id, .. } => json!({
            "error": error.to_string(),
            "assessment_id": assessment_id,
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}
