//! Application lifecycle workflow: intake gating, the status state machine,
//! the append-only timeline, and the HTTP surface over them.
//!
//! An application moves `applied -> under-review -> shortlisted ->
//! interview-scheduled -> interview-completed -> offer-extended ->
//! offer-accepted/offer-declined -> completed`, with `rejected` reachable
//! from the early states, a failed faculty gate, or a failed interview.
//! Every transition is a single versioned write and appends one timeline
//! entry.

pub mod domain;
pub mod eligibility;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod timeline;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use domain::{
    ActorId, Application, ApplicationData, ApplicationId, ApplicationStatus, FacultyApproval,
    FacultyApprovalStatus, Interview, InterviewDetails, InterviewFeedback, InterviewKind,
    InterviewResult, JobId, JobPosting, JobRequirements, Offer, OfferDetails, StudentId,
    StudentProfile,
};
pub use eligibility::{check_eligibility, is_eligible, EligibilityFailure};
pub use report::{export_csv, funnel, PlacementFunnel, StatusCount};
pub use repository::{
    ApplicationRepository, ApplicationStatusView, NotificationError, NotificationTrigger,
    PlacementDirectory, RepositoryError, TransitionEvent,
};
pub use router::application_router;
pub use service::{ApplicationServiceError, PlacementApplicationService};
pub use timeline::{Timeline, TimelineEntry};
pub use workflow::{allows, WorkflowError};
