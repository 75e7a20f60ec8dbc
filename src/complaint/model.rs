use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::Status;
use crate::analysis::{Classification, Priority, Sentiment};

const SUMMARY_CHARS: usize = 100;

/// Reporter-supplied intake data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComplaint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

impl NewComplaint {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("category", &self.category),
            ("location", &self.location),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reporter_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub category: String,
    pub location: String,
    pub description: String,
    pub sentiment: Sentiment,
    /// 0-100, only present when `sentiment` is known
    pub sentiment_confidence: Option<f32>,
    pub priority: Priority,
    pub status: Status,
    pub admin_notes: Option<String>,
}

/// Public view returned by the search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintSummary {
    pub id: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub location: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub progress_step: u8,
}

impl Complaint {
    /// Builds a freshly received complaint. The classification is fixed here
    /// and never recomputed.
    pub fn new(
        id: String,
        intake: NewComplaint,
        classification: Classification,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            submitted_at: now,
            updated_at: now,
            reporter_name: intake.name,
            phone: intake.phone.filter(|p| !p.trim().is_empty()),
            email: intake.email.filter(|e| !e.trim().is_empty()),
            category: intake.category,
            location: intake.location,
            description: intake.description,
            sentiment: classification.sentiment,
            sentiment_confidence: classification.confidence,
            priority: classification.priority,
            status: Status::Received,
            admin_notes: None,
        }
    }

    /// Sets status and notes unconditionally, whatever the current status.
    pub fn update_status(&mut self, status: Status, notes: Option<String>, now: DateTime<Utc>) {
        self.status = status;
        self.admin_notes = notes.filter(|n| !n.trim().is_empty());
        self.updated_at = now;
    }

    pub fn classification(&self) -> Classification {
        Classification {
            sentiment: self.sentiment,
            confidence: self.sentiment_confidence,
            priority: self.priority,
        }
    }

    pub fn summary(&self) -> ComplaintSummary {
        let description = if self.description.chars().count() > SUMMARY_CHARS {
            let cut: String = self.description.chars().take(SUMMARY_CHARS).collect();
            format!("{}...", cut)
        } else {
            self.description.clone()
        };

        ComplaintSummary {
            id: self.id.clone(),
            date: self.submitted_at,
            category: self.category.clone(),
            location: self.location.clone(),
            description,
            priority: self.priority,
            status: self.status,
            progress_step: self.status.progress_step(),
        }
    }
}

/// `TG-<year>-<seq>` with the sequence zero padded to four digits.
pub fn format_complaint_id(year: i32, seq: usize) -> String {
    format!("TG-{}-{:04}", year, seq)
}

/// Sequence number of an id issued in `year`, if it has that shape.
pub fn complaint_seq(id: &str, year: i32) -> Option<usize> {
    id.strip_prefix(&format!("TG-{}-", year))?.parse().ok()
}
