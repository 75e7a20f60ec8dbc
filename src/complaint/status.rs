use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::analysis::types::UnknownLabel;

/// Lifecycle stage of a complaint.
///
/// Transitions are unrestricted: an administrator may set any status from
/// any other, including backwards moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    #[serde(rename = "Diterima")]
    Received,
    #[serde(rename = "Diproses")]
    InProgress,
    #[serde(rename = "Selesai")]
    Resolved,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Received => "Diterima",
            Status::InProgress => "Diproses",
            Status::Resolved => "Selesai",
        }
    }

    /// Wording used in reporter notifications.
    pub fn notice(&self) -> &'static str {
        match self {
            Status::Received => "Diterima",
            Status::InProgress => "Sedang Diproses",
            Status::Resolved => "Telah Selesai",
        }
    }

    /// Step in the three-step progress tracker.
    pub fn progress_step(&self) -> u8 {
        match self {
            Status::Received => 1,
            Status::InProgress => 2,
            Status::Resolved => 3,
        }
    }
}

/// Progress step for a raw status label; unrecognised labels sit at step 1.
pub fn progress_step(label: &str) -> u8 {
    label.parse::<Status>().map(|s| s.progress_step()).unwrap_or(1)
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' ', '-'], "").as_str() {
            "diterima" | "received" => Ok(Status::Received),
            "diproses" | "inprogress" => Ok(Status::InProgress),
            "selesai" | "resolved" => Ok(Status::Resolved),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}
