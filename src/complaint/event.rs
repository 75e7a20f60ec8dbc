use serde::{Deserialize, Serialize};

use super::model::Complaint;

/// A complaint mutation. Journaled to disk, broadcast to the notifier and
/// streamed to the admin dashboard. Each event carries the full snapshot
/// after the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ComplaintEvent {
    Created { complaint: Complaint },
    StatusUpdated { complaint: Complaint },
}

impl ComplaintEvent {
    pub fn complaint(&self) -> &Complaint {
        match self {
            ComplaintEvent::Created { complaint } | ComplaintEvent::StatusUpdated { complaint } => {
                complaint
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ComplaintEvent::Created { .. } => "created",
            ComplaintEvent::StatusUpdated { .. } => "status_updated",
        }
    }
}
