use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ActorId, Application, ApplicationId, ApplicationStatus, JobId, JobPosting, StudentId,
    StudentProfile,
};

/// Storage abstraction over the application aggregate so the service module
/// can be exercised in isolation. `update` is a compare-and-bump on
/// `Application::version`; two writers racing the same source state leave
/// exactly one winner.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn find_by_job_and_student(
        &self,
        job_id: &JobId,
        student_id: &StudentId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn list(&self) -> Result<Vec<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("an application for this job and student already exists")]
    Conflict,
    #[error("application not found")]
    NotFound,
    #[error("application was modified concurrently")]
    VersionConflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Lookup contract for the campus directories (jobs and students) consulted
/// at intake. Existence and eligibility data live outside the core.
pub trait PlacementDirectory: Send + Sync {
    fn job(&self, job_id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn student(&self, student_id: &StudentId) -> Result<Option<StudentProfile>, RepositoryError>;
}

/// Event handed to the notification collaborator after a transition commits.
/// `from` is `None` for the opening `applied` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub application_id: ApplicationId,
    pub from: Option<ApplicationStatus>,
    pub to: ApplicationStatus,
    pub actor: ActorId,
}

/// Hook invoked once per committed transition. Delivery (email/push/SMS) is
/// entirely the implementer's concern.
pub trait NotificationTrigger: Send + Sync {
    fn on_transition(&self, event: TransitionEvent) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized projection of an application for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub student_id: StudentId,
    pub status: &'static str,
    pub faculty_approval_pending: bool,
    pub offer_extended: bool,
    pub last_updated: DateTime<Utc>,
    pub timeline_entries: usize,
}

impl Application {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            job_id: self.job_id.clone(),
            student_id: self.student_id.clone(),
            status: self.status.label(),
            faculty_approval_pending: self.faculty_approval.required
                && self.faculty_approval.status
                    == super::domain::FacultyApprovalStatus::Pending,
            offer_extended: self
                .offer
                .as_ref()
                .map(|offer| offer.extended)
                .unwrap_or(false),
            last_updated: self
                .timeline
                .last()
                .map(|entry| entry.timestamp)
                .unwrap_or_else(Utc::now),
            timeline_entries: self.timeline.len(),
        }
    }
}
