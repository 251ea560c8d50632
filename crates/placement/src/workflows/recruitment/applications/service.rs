use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::domain::{
    ActorId, Application, ApplicationData, ApplicationId, ApplicationStatus, InterviewDetails,
    InterviewFeedback, InterviewResult, JobId, OfferDetails, StudentId,
};
use super::eligibility::{check_eligibility, EligibilityFailure};
use super::repository::{
    ApplicationRepository, NotificationError, NotificationTrigger, PlacementDirectory,
    RepositoryError, TransitionEvent,
};
use super::timeline::TimelineEntry;
use super::workflow::WorkflowError;

/// Service composing the directory, repository, and notification hook around
/// the aggregate's transition methods. Every mutation is a single
/// read-modify-write: fetch, transition, versioned update, then notify.
pub struct PlacementApplicationService<R, N, D> {
    repository: Arc<R>,
    notifier: Arc<N>,
    directory: Arc<D>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R, N, D> PlacementApplicationService<R, N, D>
where
    R: ApplicationRepository + 'static,
    N: NotificationTrigger + 'static,
    D: PlacementDirectory + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, directory: Arc<D>) -> Self {
        Self {
            repository,
            notifier,
            directory,
        }
    }

    /// Open an application for `(job, student)`, gated on the posting
    /// accepting applications, the student meeting its requirements, and no
    /// prior application for the same pair.
    pub fn create_application(
        &self,
        job_id: JobId,
        student_id: StudentId,
        data: ApplicationData,
        comments: Option<String>,
    ) -> Result<Application, ApplicationServiceError> {
        let job = self
            .directory
            .job(&job_id)?
            .ok_or(ApplicationServiceError::JobNotFound)?;
        let student = self
            .directory
            .student(&student_id)?
            .ok_or(ApplicationServiceError::StudentNotFound)?;

        if !job.accepting_applications {
            return Err(ApplicationServiceError::JobNotAcceptingApplications);
        }
        check_eligibility(&student, &job.requirements)?;

        if self
            .repository
            .find_by_job_and_student(&job_id, &student_id)?
            .is_some()
        {
            return Err(ApplicationServiceError::DuplicateApplication);
        }

        let application = Application::open(
            next_application_id(),
            job_id,
            student_id.clone(),
            data,
            job.requires_faculty_approval,
            comments,
        );

        let stored = self.repository.insert(application).map_err(|err| match err {
            RepositoryError::Conflict => ApplicationServiceError::DuplicateApplication,
            other => ApplicationServiceError::Repository(other),
        })?;

        info!(application = %stored.id.0, job = %stored.job_id.0, "application opened");
        self.notifier.on_transition(TransitionEvent {
            application_id: stored.id.clone(),
            from: None,
            to: ApplicationStatus::Applied,
            actor: ActorId::from(&student_id),
        })?;

        Ok(stored)
    }

    /// Employer/admin status change following the transition table.
    pub fn set_status(
        &self,
        application_id: &ApplicationId,
        status: ApplicationStatus,
        actor: &ActorId,
        comments: Option<String>,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self.fetch(application_id)?;
        let from = application.status;
        application.set_status(status, actor, comments)?;
        self.commit(application, from, actor)
    }

    /// Record the faculty gate decision: approve lifts the gate, reject is
    /// terminal.
    pub fn submit_faculty_approval(
        &self,
        application_id: &ApplicationId,
        approved: bool,
        actor: &ActorId,
        comments: Option<String>,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self.fetch(application_id)?;
        let from = application.status;
        if approved {
            application.approve_faculty(actor, comments)?;
        } else {
            application.reject_faculty(actor, comments.unwrap_or_default())?;
        }
        self.commit(application, from, actor)
    }

    pub fn schedule_interview(
        &self,
        application_id: &ApplicationId,
        details: InterviewDetails,
        actor: &ActorId,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self.fetch(application_id)?;
        let from = application.status;
        application.schedule_interview(details, actor)?;
        self.commit(application, from, actor)
    }

    pub fn submit_interview_feedback(
        &self,
        application_id: &ApplicationId,
        result: InterviewResult,
        feedback: Option<InterviewFeedback>,
        actor: &ActorId,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self.fetch(application_id)?;
        let from = application.status;
        application.submit_interview_feedback(result, feedback, actor)?;
        self.commit(application, from, actor)
    }

    pub fn extend_offer(
        &self,
        application_id: &ApplicationId,
        details: OfferDetails,
        actor: &ActorId,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self.fetch(application_id)?;
        let from = application.status;
        application.extend_offer(details, actor)?;
        self.commit(application, from, actor)
    }

    /// Owning student accepts or declines the extended offer.
    pub fn respond_to_offer(
        &self,
        application_id: &ApplicationId,
        student_id: &StudentId,
        accepted: bool,
        decline_reason: Option<String>,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self.fetch(application_id)?;
        let from = application.status;
        application.respond_to_offer(student_id, accepted, decline_reason)?;
        let actor = ActorId::from(student_id);
        self.commit(application, from, &actor)
    }

    /// Fetch an application for API responses.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.fetch(application_id)
    }

    /// The ordered audit history. Reads take no lock and repeat calls
    /// without intervening mutations return identical sequences.
    pub fn timeline(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<TimelineEntry>, ApplicationServiceError> {
        let application = self.fetch(application_id)?;
        Ok(application.timeline.entries().to_vec())
    }

    pub fn list(&self) -> Result<Vec<Application>, ApplicationServiceError> {
        Ok(self.repository.list()?)
    }

    fn fetch(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        Ok(self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    /// Persist a transitioned aggregate and fire the notification hook when
    /// the status actually changed. The versioned update is the unit of
    /// persistence; a concurrent writer surfaces as `VersionConflict` here.
    fn commit(
        &self,
        application: Application,
        from: ApplicationStatus,
        actor: &ActorId,
    ) -> Result<Application, ApplicationServiceError> {
        let updated = self.repository.update(application)?;

        if updated.status != from {
            info!(
                application = %updated.id.0,
                from = from.label(),
                to = updated.status.label(),
                "application transition",
            );
            self.notifier.on_transition(TransitionEvent {
                application_id: updated.id.clone(),
                from: Some(from),
                to: updated.status,
                actor: actor.clone(),
            })?;
        }

        Ok(updated)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("job not found")]
    JobNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("job is not accepting applications")]
    JobNotAcceptingApplications,
    #[error("an application for this job and student already exists")]
    DuplicateApplication,
    #[error("student is not eligible for this job: {0}")]
    Ineligible(#[from] EligibilityFailure),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
