use chrono::Utc;

use super::domain::{
    ActorId, Application, ApplicationData, ApplicationId, ApplicationStatus, FacultyApproval,
    FacultyApprovalStatus, Interview, InterviewDetails, InterviewFeedback, InterviewResult,
    JobId, Offer, OfferDetails, StudentId,
};
use super::timeline::Timeline;

/// Failure raised by a transition attempted against the aggregate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error("cannot move application from '{}' to '{}'", .from.label(), .to.label())]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("no offer has been extended on this application")]
    NoOfferExtended,
    #[error("no interview has been scheduled on this application")]
    NoInterviewScheduled,
    #[error("actor '{}' is not permitted to perform this transition", .actor.0)]
    Unauthorized { actor: ActorId },
    #[error("faculty approval is not required for this application")]
    ApprovalNotRequired,
    #[error("faculty approval has already been decided")]
    ApprovalAlreadyDecided,
}

/// The reconstructed legal-transition table. The original portal let status
/// be reassigned freely; here every move must be listed.
pub fn allows(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    use ApplicationStatus::*;
    matches!(
        (from, to),
        (Applied, UnderReview | Shortlisted | InterviewScheduled | Rejected)
            | (UnderReview, Shortlisted | InterviewScheduled | Rejected)
            | (Shortlisted, InterviewScheduled | Rejected)
            | (InterviewScheduled, InterviewCompleted | Rejected)
            | (InterviewCompleted, OfferExtended | Rejected)
            | (OfferExtended, OfferAccepted | OfferDeclined)
            | (OfferAccepted, Completed)
    )
}

impl Application {
    /// Open a fresh application in `applied` with its first timeline entry.
    /// Eligibility and duplicate gating happen in the service before this.
    pub fn open(
        id: ApplicationId,
        job_id: JobId,
        student_id: StudentId,
        data: ApplicationData,
        requires_faculty_approval: bool,
        comments: Option<String>,
    ) -> Self {
        let actor = ActorId::from(&student_id);
        Self {
            id,
            job_id,
            student_id,
            data,
            status: ApplicationStatus::Applied,
            faculty_approval: FacultyApproval::new(requires_faculty_approval),
            interview: None,
            offer: None,
            timeline: Timeline::opened(ApplicationStatus::Applied, actor, comments),
            version: 0,
        }
    }

    /// Move to `to`, recording exactly one timeline entry. All public
    /// transition methods funnel through here once their guards pass.
    fn advance(
        &mut self,
        to: ApplicationStatus,
        actor: &ActorId,
        comments: Option<String>,
    ) -> Result<(), WorkflowError> {
        if !allows(self.status, to) {
            return Err(WorkflowError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.force_status(to, actor, comments);
        Ok(())
    }

    /// Unconditional status assignment used by moves whose legality was
    /// already established by a dedicated guard (interview verdicts).
    fn force_status(&mut self, to: ApplicationStatus, actor: &ActorId, comments: Option<String>) {
        self.status = to;
        self.timeline.record(to, actor.clone(), comments);
    }

    /// Employer/admin-driven status change following the transition table.
    /// Offer responses are excluded; they belong to the owning student.
    pub fn set_status(
        &mut self,
        to: ApplicationStatus,
        actor: &ActorId,
        comments: Option<String>,
    ) -> Result<(), WorkflowError> {
        if matches!(
            to,
            ApplicationStatus::OfferAccepted | ApplicationStatus::OfferDeclined
        ) {
            return Err(WorkflowError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.advance(to, actor, comments)
    }

    /// Faculty lifts the approval gate, moving `applied` to `under-review`.
    pub fn approve_faculty(
        &mut self,
        actor: &ActorId,
        comments: Option<String>,
    ) -> Result<(), WorkflowError> {
        if !self.faculty_approval.required {
            return Err(WorkflowError::ApprovalNotRequired);
        }
        if self.faculty_approval.status != FacultyApprovalStatus::Pending {
            return Err(WorkflowError::ApprovalAlreadyDecided);
        }

        self.advance(ApplicationStatus::UnderReview, actor, comments.clone())?;

        self.faculty_approval.status = FacultyApprovalStatus::Approved;
        self.faculty_approval.approved_by = Some(actor.clone());
        self.faculty_approval.approved_at = Some(Utc::now());
        self.faculty_approval.comments = comments;
        Ok(())
    }

    /// Faculty rejects the application outright, from `applied` or
    /// `under-review`.
    pub fn reject_faculty(&mut self, actor: &ActorId, reason: String) -> Result<(), WorkflowError> {
        if self.faculty_approval.status != FacultyApprovalStatus::Pending {
            return Err(WorkflowError::ApprovalAlreadyDecided);
        }
        if !matches!(
            self.status,
            ApplicationStatus::Applied | ApplicationStatus::UnderReview
        ) {
            return Err(WorkflowError::InvalidTransition {
                from: self.status,
                to: ApplicationStatus::Rejected,
            });
        }

        self.advance(ApplicationStatus::Rejected, actor, Some(reason.clone()))?;

        self.faculty_approval.status = FacultyApprovalStatus::Rejected;
        self.faculty_approval.rejection_reason = Some(reason);
        Ok(())
    }

    /// Schedule (or re-schedule) an interview round. Permitted from any
    /// non-terminal state; a repeat call in `interview-scheduled` replaces
    /// the round details without changing status.
    pub fn schedule_interview(
        &mut self,
        details: InterviewDetails,
        actor: &ActorId,
    ) -> Result<(), WorkflowError> {
        if self.status.is_terminal() {
            return Err(WorkflowError::InvalidTransition {
                from: self.status,
                to: ApplicationStatus::InterviewScheduled,
            });
        }

        self.interview = Some(Interview {
            scheduled: true,
            date: details.date,
            kind: details.kind,
            interviewer: details.interviewer,
            round: details.round,
            feedback: None,
            result: InterviewResult::Pending,
        });

        if self.status != ApplicationStatus::InterviewScheduled {
            self.force_status(ApplicationStatus::InterviewScheduled, actor, None);
        }
        Ok(())
    }

    /// Record the interview verdict. `passed` advances straight to
    /// `offer-extended`, `failed` rejects, `pending` stores the feedback and
    /// leaves the status untouched.
    pub fn submit_interview_feedback(
        &mut self,
        result: InterviewResult,
        feedback: Option<InterviewFeedback>,
        actor: &ActorId,
    ) -> Result<(), WorkflowError> {
        if !matches!(
            self.status,
            ApplicationStatus::InterviewScheduled | ApplicationStatus::InterviewCompleted
        ) {
            return Err(WorkflowError::InvalidTransition {
                from: self.status,
                to: ApplicationStatus::InterviewCompleted,
            });
        }
        let interview = self
            .interview
            .as_mut()
            .ok_or(WorkflowError::NoInterviewScheduled)?;

        interview.result = result;
        if feedback.is_some() {
            interview.feedback = feedback;
        }

        match result {
            InterviewResult::Passed => {
                self.force_status(ApplicationStatus::OfferExtended, actor, None);
            }
            InterviewResult::Failed => {
                self.force_status(ApplicationStatus::Rejected, actor, None);
            }
            InterviewResult::Pending => {}
        }
        Ok(())
    }

    /// Employer formally extends terms. Legal from `interview-completed`
    /// (status advances) or `offer-extended` (a passed interview already
    /// moved the status; this fills in the terms).
    pub fn extend_offer(
        &mut self,
        details: OfferDetails,
        actor: &ActorId,
    ) -> Result<(), WorkflowError> {
        if !matches!(
            self.status,
            ApplicationStatus::InterviewCompleted | ApplicationStatus::OfferExtended
        ) {
            return Err(WorkflowError::InvalidTransition {
                from: self.status,
                to: ApplicationStatus::OfferExtended,
            });
        }

        self.offer = Some(Offer {
            extended: true,
            package: details.package,
            start_date: details.start_date,
            end_date: details.end_date,
            accepted: None,
            accepted_at: None,
            declined_at: None,
            decline_reason: None,
        });

        if self.status != ApplicationStatus::OfferExtended {
            self.force_status(ApplicationStatus::OfferExtended, actor, None);
        }
        Ok(())
    }

    /// Owning student accepts or declines the extended offer.
    pub fn respond_to_offer(
        &mut self,
        student_id: &StudentId,
        accepted: bool,
        decline_reason: Option<String>,
    ) -> Result<(), WorkflowError> {
        if *student_id != self.student_id {
            return Err(WorkflowError::Unauthorized {
                actor: ActorId::from(student_id),
            });
        }
        if !self.offer.as_ref().map(|offer| offer.extended).unwrap_or(false) {
            return Err(WorkflowError::NoOfferExtended);
        }

        let actor = ActorId::from(student_id);
        let to = if accepted {
            ApplicationStatus::OfferAccepted
        } else {
            ApplicationStatus::OfferDeclined
        };
        let comment = if accepted {
            None
        } else {
            decline_reason.clone()
        };
        self.advance(to, &actor, comment)?;

        if let Some(offer) = self.offer.as_mut() {
            let now = Utc::now();
            offer.accepted = Some(accepted);
            if accepted {
                offer.accepted_at = Some(now);
            } else {
                offer.declined_at = Some(now);
                offer.decline_reason = decline_reason;
            }
        }
        Ok(())
    }
}
