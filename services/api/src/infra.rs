use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use placement::workflows::recruitment::applications::{
    Application, ApplicationId, ApplicationRepository, JobId, JobPosting, JobRequirements,
    NotificationError, NotificationTrigger, PlacementDirectory, RepositoryError, StudentId,
    StudentProfile, TransitionEvent,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store backing the service until the portal grows a real
/// database. `update` is a compare-and-bump on the aggregate version.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        if guard.values().any(|stored| {
            stored.job_id == application.job_id && stored.student_id == application.student_id
        }) {
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

/// Collects transition events in memory. A delivery adapter (email/push)
/// replaces this in a deployed portal; the workflow core only needs the hook.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationHub {
    events: Arc<Mutex<Vec<TransitionEvent>>>,
}

impl NotificationTrigger for InMemoryNotificationHub {
    fn on_transition(&self, event: TransitionEvent) -> Result<(), NotificationError> {
        tracing::debug!(
            application = %event.application_id.0,
            to = event.to.label(),
            "transition notification queued",
        );
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(event);
        Ok(())
    }
}

impl InMemoryNotificationHub {
    pub(crate) fn events(&self) -> Vec<TransitionEvent> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

/// Directory of postings and student profiles. Seeded statically for now;
/// the campus systems of record replace this behind the same trait.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPlacementDirectory {
    jobs: Arc<Mutex<HashMap<JobId, JobPosting>>>,
    students: Arc<Mutex<HashMap<StudentId, StudentProfile>>>,
}

impl InMemoryPlacementDirectory {
    pub(crate) fn upsert_job(&self, job: JobPosting) {
        self.jobs
            .lock()
            .expect("directory mutex poisoned")
            .insert(job.job_id.clone(), job);
    }

    pub(crate) fn upsert_student(&self, student: StudentProfile) {
        self.students
            .lock()
            .expect("directory mutex poisoned")
            .insert(student.student_id.clone(), student);
    }

    pub(crate) fn with_demo_fixtures() -> Self {
        let directory = Self::default();

        directory.upsert_job(JobPosting {
            job_id: JobId("job-globex-sde".to_string()),
            title: "Software Development Engineer".to_string(),
            company: "Globex".to_string(),
            requirements: JobRequirements {
                departments: vec!["CS".to_string(), "EE".to_string()],
                years: vec![3, 4],
                minimum_cgpa: Some(7.5),
            },
            accepting_applications: true,
            requires_faculty_approval: true,
        });
        directory.upsert_job(JobPosting {
            job_id: JobId("job-initech-analyst".to_string()),
            title: "Data Analyst".to_string(),
            company: "Initech".to_string(),
            requirements: JobRequirements::default(),
            accepting_applications: true,
            requires_faculty_approval: false,
        });

        directory.upsert_student(StudentProfile {
            student_id: StudentId("stu-2201".to_string()),
            name: "Meera Iyer".to_string(),
            department: "CS".to_string(),
            year: 3,
            cgpa: 8.0,
        });
        directory.upsert_student(StudentProfile {
            student_id: StudentId("stu-2202".to_string()),
            name: "Rahul Menon".to_string(),
            department: "ME".to_string(),
            year: 4,
            cgpa: 7.1,
        });

        directory
    }
}

impl PlacementDirectory for InMemoryPlacementDirectory {
    fn job(&self, job_id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.jobs.lock().expect("directory mutex poisoned");
        Ok(guard.get(job_id).cloned())
    }

    fn student(&self, student_id: &StudentId) -> Result<Option<StudentProfile>, RepositoryError> {
        let guard = self.students.lock().expect("directory mutex poisoned");
        Ok(guard.get(student_id).cloned())
    }
}
