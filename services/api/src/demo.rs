use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Args;

use crate::infra::{
    InMemoryApplicationRepository, InMemoryNotificationHub, InMemoryPlacementDirectory,
};
use placement::error::AppError;
use placement::workflows::recruitment::applications::{
    funnel, ActorId, ApplicationData, ApplicationStatus, InterviewDetails, InterviewKind,
    InterviewResult, JobId, OfferDetails, PlacementApplicationService, StudentId,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Have the student decline the offer instead of accepting it.
    #[arg(long)]
    pub(crate) decline: bool,
    /// Annual package printed on the demo offer.
    #[arg(long, default_value = "12 LPA")]
    pub(crate) package: String,
}

/// Walk one application through the whole pipeline against the in-memory
/// adapters and print the audit trail, so stakeholders can see the workflow
/// without a running server.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let notifier = Arc::new(InMemoryNotificationHub::default());
    let directory = Arc::new(InMemoryPlacementDirectory::with_demo_fixtures());
    let service = PlacementApplicationService::new(
        repository.clone(),
        notifier.clone(),
        directory,
    );

    let job_id = JobId("job-globex-sde".to_string());
    let student_id = StudentId("stu-2201".to_string());
    let faculty = ActorId("fac-advisor".to_string());
    let employer = ActorId("emp-globex-hr".to_string());

    println!("Campus placement workflow demo");

    let application = service.create_application(
        job_id,
        student_id.clone(),
        ApplicationData {
            cover_letter: Some("Final-year project on distributed tracing.".to_string()),
            resume_key: Some("s3://placement/resumes/stu-2201.pdf".to_string()),
        },
        Some("submitted via portal".to_string()),
    )?;
    println!("  created {} in '{}'", application.id.0, application.status.label());

    service.submit_faculty_approval(
        &application.id,
        true,
        &faculty,
        Some("consistent academic record".to_string()),
    )?;
    service.set_status(
        &application.id,
        ApplicationStatus::Shortlisted,
        &employer,
        Some("resume screen cleared".to_string()),
    )?;
    service.schedule_interview(
        &application.id,
        InterviewDetails {
            date: Utc::now() + Duration::days(3),
            kind: InterviewKind::Technical,
            interviewer: Some("Globex panel".to_string()),
            round: 1,
        },
        &employer,
    )?;
    service.submit_interview_feedback(
        &application.id,
        InterviewResult::Passed,
        None,
        &employer,
    )?;
    service.extend_offer(
        &application.id,
        OfferDetails {
            package: Some(args.package.clone()),
            start_date: None,
            end_date: None,
        },
        &employer,
    )?;

    let mut final_state = service.respond_to_offer(
        &application.id,
        &student_id,
        !args.decline,
        args.decline.then(|| "accepted a competing offer".to_string()),
    )?;
    if !args.decline {
        final_state = service.set_status(
            &application.id,
            ApplicationStatus::Completed,
            &employer,
            Some("joining confirmed".to_string()),
        )?;
    }

    println!("\nTimeline for {}", final_state.id.0);
    for entry in final_state.timeline.entries() {
        let comment = entry.comments.as_deref().unwrap_or("-");
        println!(
            "  {}  {:<20} by {:<16} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.status.label(),
            entry.updated_by.0,
            comment,
        );
    }

    let applications = service.list()?;
    let snapshot = funnel(&applications);
    println!("\nPipeline snapshot");
    for bucket in &snapshot.by_status {
        if bucket.count > 0 {
            println!("  {:<20} {}", bucket.status, bucket.count);
        }
    }
    if let Some(rate) = snapshot.offer_acceptance_rate {
        println!("  offer acceptance rate: {:.0}%", rate * 100.0);
    }
    println!(
        "\n{} notification events emitted",
        notifier.events().len()
    );

    Ok(())
}
