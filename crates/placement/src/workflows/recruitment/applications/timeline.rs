use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ActorId, ApplicationStatus};

/// One audit entry per status change. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: ApplicationStatus,
    pub timestamp: DateTime<Utc>,
    pub updated_by: ActorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Append-only history of an application's status changes. Insertion order
/// is the canonical history; no entry is edited or removed after `record`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Start a timeline with its opening entry.
    pub fn opened(status: ApplicationStatus, actor: ActorId, comments: Option<String>) -> Self {
        let mut timeline = Self::default();
        timeline.record(status, actor, comments);
        timeline
    }

    /// Append an entry stamped with the current time and return a copy of it.
    pub fn record(
        &mut self,
        status: ApplicationStatus,
        actor: ActorId,
        comments: Option<String>,
    ) -> TimelineEntry {
        let entry = TimelineEntry {
            status,
            timestamp: Utc::now(),
            updated_by: actor,
            comments,
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TimelineEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
