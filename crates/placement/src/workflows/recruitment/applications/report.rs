//! Read-only projections over stored applications. The portal's analytics
//! are computed from the same aggregates the workflow writes; nothing here
//! mutates state.

use std::io::Write;

use serde::Serialize;

use super::domain::{Application, ApplicationStatus};

/// Count of applications sitting in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: &'static str,
    pub count: usize,
}

/// Pipeline snapshot for the placement cell dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementFunnel {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub offers_extended: usize,
    pub offers_accepted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_acceptance_rate: Option<f32>,
}

/// Fold the application list into per-status counts and offer conversion.
pub fn funnel(applications: &[Application]) -> PlacementFunnel {
    let by_status = ApplicationStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: status.label(),
            count: applications
                .iter()
                .filter(|application| application.status == *status)
                .count(),
        })
        .collect();

    let offers_extended = applications
        .iter()
        .filter(|application| {
            application
                .offer
                .as_ref()
                .map(|offer| offer.extended)
                .unwrap_or(false)
        })
        .count();
    let offers_accepted = applications
        .iter()
        .filter(|application| {
            matches!(
                application.status,
                ApplicationStatus::OfferAccepted | ApplicationStatus::Completed
            )
        })
        .count();

    let offer_acceptance_rate = if offers_extended > 0 {
        Some(offers_accepted as f32 / offers_extended as f32)
    } else {
        None
    };

    PlacementFunnel {
        total: applications.len(),
        by_status,
        offers_extended,
        offers_accepted,
        offer_acceptance_rate,
    }
}

/// Write the application list as CSV for the placement cell's exports.
pub fn export_csv<W: Write>(applications: &[Application], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "application_id",
        "job_id",
        "student_id",
        "status",
        "applied_at",
        "last_updated",
        "timeline_entries",
    ])?;

    for application in applications {
        let applied_at = application
            .timeline
            .entries()
            .first()
            .map(|entry| entry.timestamp.to_rfc3339())
            .unwrap_or_default();
        let last_updated = application
            .timeline
            .last()
            .map(|entry| entry.timestamp.to_rfc3339())
            .unwrap_or_default();

        csv_writer.write_record([
            application.id.0.as_str(),
            application.job_id.0.as_str(),
            application.student_id.0.as_str(),
            application.status.label(),
            applied_at.as_str(),
            last_updated.as_str(),
            application.timeline.len().to_string().as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
