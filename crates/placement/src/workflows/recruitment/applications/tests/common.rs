use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use crate::workflows::recruitment::applications::domain::{
    Application, ApplicationData, ApplicationId, InterviewDetails, InterviewKind, JobId,
    JobPosting, JobRequirements, StudentId, StudentProfile,
};
use crate::workflows::recruitment::applications::repository::{
    ApplicationRepository, NotificationError, NotificationTrigger, PlacementDirectory,
    RepositoryError, TransitionEvent,
};
use crate::workflows::recruitment::applications::service::PlacementApplicationService;

pub(super) fn job_id() -> JobId {
    JobId("job-backend-2026".to_string())
}

pub(super) fn student_id() -> StudentId {
    StudentId("stu-4412".to_string())
}

pub(super) fn requirements() -> JobRequirements {
    JobRequirements {
        departments: vec!["CS".to_string(), "EE".to_string()],
        years: vec![3, 4],
        minimum_cgpa: Some(7.5),
    }
}

pub(super) fn job() -> JobPosting {
    JobPosting {
        job_id: job_id(),
        title: "Backend Engineer".to_string(),
        company: "Initech".to_string(),
        requirements: requirements(),
        accepting_applications: true,
        requires_faculty_approval: true,
    }
}

pub(super) fn student() -> StudentProfile {
    StudentProfile {
        student_id: student_id(),
        name: "Priya Nair".to_string(),
        department: "CS".to_string(),
        year: 3,
        cgpa: 8.0,
    }
}

pub(super) fn interview_details() -> InterviewDetails {
    InterviewDetails {
        date: Utc::now() + Duration::days(3),
        kind: InterviewKind::Technical,
        interviewer: Some("Hiring Panel A".to_string()),
        round: 1,
    }
}

pub(super) fn new_application() -> Application {
    Application::open(
        ApplicationId("app-test-01".to_string()),
        job_id(),
        student_id(),
        ApplicationData::default(),
        true,
        Some("excited to apply".to_string()),
    )
}

/// Application with no faculty gate, for flows that start at employer review.
pub(super) fn ungated_application() -> Application {
    Application::open(
        ApplicationId("app-test-02".to_string()),
        job_id(),
        student_id(),
        ApplicationData::default(),
        false,
        None,
    )
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        if guard
            .values()
            .any(|stored| stored.job_id == application.job_id
                && stored.student_id == application.student_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, mut application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard
            .get(&application.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.version != application.version {
            return Err(RepositoryError::VersionConflict);
        }
        application.version += 1;
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_job_and_student(
        &self,
        job_id: &JobId,
        student_id: &StudentId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|stored| stored.job_id == *job_id && stored.student_id == *student_id)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut applications: Vec<Application> = guard.values().cloned().collect();
        applications.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(applications)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<TransitionEvent>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<TransitionEvent> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationTrigger for MemoryNotifier {
    fn on_transition(&self, event: TransitionEvent) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(event);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    jobs: Arc<Mutex<HashMap<JobId, JobPosting>>>,
    students: Arc<Mutex<HashMap<StudentId, StudentProfile>>>,
}

impl MemoryDirectory {
    pub(super) fn with_fixtures() -> Self {
        let directory = Self::default();
        directory.upsert_job(job());
        directory.upsert_student(student());
        directory
    }

    pub(super) fn upsert_job(&self, job: JobPosting) {
        self.jobs
            .lock()
            .expect("directory mutex poisoned")
            .insert(job.job_id.clone(), job);
    }

    pub(super) fn upsert_student(&self, student: StudentProfile) {
        self.students
            .lock()
            .expect("directory mutex poisoned")
            .insert(student.student_id.clone(), student);
    }
}

impl PlacementDirectory for MemoryDirectory {
    fn job(&self, job_id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.jobs.lock().expect("directory mutex poisoned");
        Ok(guard.get(job_id).cloned())
    }

    fn student(&self, student_id: &StudentId) -> Result<Option<StudentProfile>, RepositoryError> {
        let guard = self.students.lock().expect("directory mutex poisoned");
        Ok(guard.get(student_id).cloned())
    }
}

pub(super) type TestService =
    PlacementApplicationService<MemoryRepository, MemoryNotifier, MemoryDirectory>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
    Arc<MemoryDirectory>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let directory = Arc::new(MemoryDirectory::with_fixtures());
    let service = PlacementApplicationService::new(
        repository.clone(),
        notifier.clone(),
        directory.clone(),
    );
    (service, repository, notifier, directory)
}

/// Drive a freshly created application through faculty approval and
/// shortlisting so tests can start from the interview stage.
pub(super) fn create_shortlisted(service: &TestService) -> Application {
    use crate::workflows::recruitment::applications::domain::{ActorId, ApplicationStatus};

    let application = service
        .create_application(job_id(), student_id(), ApplicationData::default(), None)
        .expect("application created");
    let faculty = ActorId("fac-101".to_string());
    let employer = ActorId("emp-007".to_string());

    service
        .submit_faculty_approval(&application.id, true, &faculty, None)
        .expect("faculty approval recorded");
    service
        .set_status(&application.id, ApplicationStatus::Shortlisted, &employer, None)
        .expect("shortlisted")
}
