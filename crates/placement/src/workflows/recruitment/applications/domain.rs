use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::timeline::Timeline;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier for a posted job opening.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier for a student account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier for whoever performs a transition (student, employer, faculty, admin).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl From<&StudentId> for ActorId {
    fn from(value: &StudentId) -> Self {
        ActorId(value.0.clone())
    }
}

/// Lifecycle status of an application. Exactly one value at any time; the
/// legal moves between values live in the `workflow` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Applied,
    UnderReview,
    Shortlisted,
    Rejected,
    InterviewScheduled,
    InterviewCompleted,
    OfferExtended,
    OfferAccepted,
    OfferDeclined,
    Completed,
}

impl ApplicationStatus {
    /// All statuses in pipeline order, for reporting projections.
    pub const ALL: [ApplicationStatus; 10] = [
        ApplicationStatus::Applied,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::InterviewCompleted,
        ApplicationStatus::OfferExtended,
        ApplicationStatus::OfferAccepted,
        ApplicationStatus::OfferDeclined,
        ApplicationStatus::Completed,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::UnderReview => "under-review",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::InterviewScheduled => "interview-scheduled",
            ApplicationStatus::InterviewCompleted => "interview-completed",
            ApplicationStatus::OfferExtended => "offer-extended",
            ApplicationStatus::OfferAccepted => "offer-accepted",
            ApplicationStatus::OfferDeclined => "offer-declined",
            ApplicationStatus::Completed => "completed",
        }
    }

    /// Terminal states admit no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected
                | ApplicationStatus::OfferDeclined
                | ApplicationStatus::Completed
        )
    }
}

/// Faculty gate on an application. When `required`, only a faculty decision
/// can resolve the gate; employer-driven moves (status changes, interview
/// scheduling) remain available while it is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyApproval {
    pub required: bool,
    pub status: FacultyApprovalStatus,
    pub approved_by: Option<ActorId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub rejection_reason: Option<String>,
}

impl FacultyApproval {
    pub fn not_required() -> Self {
        Self::new(false)
    }

    pub fn new(required: bool) -> Self {
        Self {
            required,
            status: FacultyApprovalStatus::Pending,
            approved_by: None,
            approved_at: None,
            comments: None,
            rejection_reason: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacultyApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Interview sub-record attached once a round is scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub scheduled: bool,
    pub date: DateTime<Utc>,
    pub kind: InterviewKind,
    pub interviewer: Option<String>,
    pub round: u8,
    pub feedback: Option<InterviewFeedback>,
    pub result: InterviewResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewKind {
    Technical,
    Hr,
    Managerial,
    GroupDiscussion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewResult {
    Pending,
    Passed,
    Failed,
}

/// Interviewer notes captured when a round concludes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewFeedback {
    pub rating: Option<u8>,
    pub comments: Option<String>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

/// Details supplied by the employer when scheduling a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewDetails {
    pub date: DateTime<Utc>,
    pub kind: InterviewKind,
    pub interviewer: Option<String>,
    #[serde(default = "default_round")]
    pub round: u8,
}

fn default_round() -> u8 {
    1
}

/// Offer sub-record. `extended` flips when the employer formally extends
/// terms; `accepted` stays `None` until the student responds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub extended: bool,
    pub package: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub accepted: Option<bool>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub decline_reason: Option<String>,
}

/// Compensation/terms supplied by the employer when extending an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDetails {
    pub package: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Free-form material attached by the student at intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationData {
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_key: Option<String>,
}

/// The aggregate root. Mutated exclusively through the transition methods
/// in the `workflow` module; `version` backs optimistic concurrency in the
/// repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub student_id: StudentId,
    pub data: ApplicationData,
    pub status: ApplicationStatus,
    pub faculty_approval: FacultyApproval,
    pub interview: Option<Interview>,
    pub offer: Option<Offer>,
    pub timeline: Timeline,
    pub version: u64,
}

/// Academic snapshot of a student, as held by the campus directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: StudentId,
    pub name: String,
    pub department: String,
    pub year: u8,
    pub cgpa: f32,
}

/// Requirements attached to a job posting. Empty lists impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub years: Vec<u8>,
    #[serde(default)]
    pub minimum_cgpa: Option<f32>,
}

/// Posting snapshot used during intake gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_id: JobId,
    pub title: String,
    pub company: String,
    pub requirements: JobRequirements,
    pub accepting_applications: bool,
    pub requires_faculty_approval: bool,
}
