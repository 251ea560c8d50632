use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ActorId, ApplicationData, ApplicationId, ApplicationStatus, InterviewDetails,
    InterviewFeedback, InterviewResult, JobId, OfferDetails, StudentId,
};
use super::report;
use super::repository::{
    ApplicationRepository, NotificationTrigger, PlacementDirectory, RepositoryError,
};
use super::service::{ApplicationServiceError, PlacementApplicationService};
use super::workflow::WorkflowError;

/// Router builder exposing the application lifecycle over HTTP.
pub fn application_router<R, N, D>(
    service: Arc<PlacementApplicationService<R, N, D>>,
) -> Router
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/placement/applications",
            post(create_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/applications/export",
            get(export_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/applications/:application_id",
            get(get_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/applications/:application_id/timeline",
            get(timeline_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/applications/:application_id/status",
            post(set_status_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/applications/:application_id/faculty-approval",
            post(faculty_approval_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/applications/:application_id/interview",
            post(schedule_interview_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/applications/:application_id/interview/feedback",
            post(interview_feedback_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/applications/:application_id/offer",
            post(extend_offer_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/applications/:application_id/offer/response",
            post(offer_response_handler::<R, N, D>),
        )
        .route(
            "/api/v1/placement/reports/funnel",
            get(funnel_handler::<R, N, D>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: String,
    pub student_id: String,
    #[serde(default)]
    pub data: ApplicationData,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SetStatusRequest {
    status: ApplicationStatus,
    actor_id: String,
    #[serde(default)]
    comments: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum FacultyDecision {
    Approved,
    Rejected,
}

#[derive(Debug, Deserialize)]
struct FacultyApprovalRequest {
    decision: FacultyDecision,
    actor_id: String,
    #[serde(default)]
    comments: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScheduleInterviewRequest {
    #[serde(flatten)]
    details: InterviewDetails,
    actor_id: String,
}

#[derive(Debug, Deserialize)]
struct InterviewFeedbackRequest {
    result: InterviewResult,
    #[serde(default)]
    rating: Option<u8>,
    #[serde(default)]
    comments: Option<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    areas_for_improvement: Vec<String>,
    actor_id: String,
}

#[derive(Debug, Deserialize)]
struct ExtendOfferRequest {
    #[serde(flatten)]
    details: OfferDetails,
    actor_id: String,
}

#[derive(Debug, Deserialize)]
struct OfferResponseRequest {
    student_id: String,
    accepted: bool,
    #[serde(default)]
    decline_reason: Option<String>,
}

pub(crate) async fn create_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
    axum::Json(request): axum::Json<CreateApplicationRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    match service.create_application(
        JobId(request.job_id),
        StudentId(request.student_id),
        request.data,
        request.comments,
    ) {
        Ok(application) => {
            (StatusCode::CREATED, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn timeline_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    match service.timeline(&ApplicationId(application_id)) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_status_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<SetStatusRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    match service.set_status(
        &ApplicationId(application_id),
        request.status,
        &ActorId(request.actor_id),
        request.comments,
    ) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn faculty_approval_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<FacultyApprovalRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    let approved = matches!(request.decision, FacultyDecision::Approved);
    match service.submit_faculty_approval(
        &ApplicationId(application_id),
        approved,
        &ActorId(request.actor_id),
        request.comments,
    ) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schedule_interview_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<ScheduleInterviewRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    match service.schedule_interview(
        &ApplicationId(application_id),
        request.details,
        &ActorId(request.actor_id),
    ) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn interview_feedback_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<InterviewFeedbackRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    let feedback = InterviewFeedback {
        rating: request.rating,
        comments: request.comments,
        strengths: request.strengths,
        areas_for_improvement: request.areas_for_improvement,
    };
    match service.submit_interview_feedback(
        &ApplicationId(application_id),
        request.result,
        Some(feedback),
        &ActorId(request.actor_id),
    ) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn extend_offer_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<ExtendOfferRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    match service.extend_offer(
        &ApplicationId(application_id),
        request.details,
        &ActorId(request.actor_id),
    ) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn offer_response_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<OfferResponseRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    match service.respond_to_offer(
        &ApplicationId(application_id),
        &StudentId(request.student_id),
        request.accepted,
        request.decline_reason,
    ) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn funnel_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    match service.list() {
        Ok(applications) => {
            (StatusCode::OK, axum::Json(report::funnel(&applications))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R, N, D>(
    State(service): State<Arc<PlacementApplicationService<R, N, D>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    let applications = match service.list() {
        Ok(applications) => applications,
        Err(error) => return error_response(error),
    };

    let mut buffer = Vec::new();
    if let Err(error) = report::export_csv(&applications, &mut buffer) {
        let payload = json!({ "error": error.to_string() });
        return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv")],
        buffer,
    )
        .into_response()
}

/// Map the service error taxonomy onto HTTP statuses. The HTTP layer is the
/// only place this mapping lives; the core returns typed errors.
fn error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::DuplicateApplication
        | ApplicationServiceError::Workflow(WorkflowError::InvalidTransition { .. })
        | ApplicationServiceError::Workflow(WorkflowError::ApprovalAlreadyDecided)
        | ApplicationServiceError::Repository(RepositoryError::Conflict)
        | ApplicationServiceError::Repository(RepositoryError::VersionConflict) => {
            StatusCode::CONFLICT
        }
        ApplicationServiceError::Workflow(WorkflowError::Unauthorized { .. }) => {
            StatusCode::FORBIDDEN
        }
        ApplicationServiceError::JobNotFound
        | ApplicationServiceError::StudentNotFound
        | ApplicationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::JobNotAcceptingApplications
        | ApplicationServiceError::Ineligible(_)
        | ApplicationServiceError::Workflow(WorkflowError::NoOfferExtended)
        | ApplicationServiceError::Workflow(WorkflowError::NoInterviewScheduled)
        | ApplicationServiceError::Workflow(WorkflowError::ApprovalNotRequired) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ApplicationServiceError::Repository(RepositoryError::Unavailable(_))
        | ApplicationServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
