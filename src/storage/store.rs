use anyhow::Result;
use chrono::{Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use super::journal::Journal;
use crate::analysis::{Classification, Priority};
use crate::complaint::{
    complaint_seq, format_complaint_id, Complaint, ComplaintEvent, NewComplaint, Status,
};
use crate::config::StorageConfig;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("complaint {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Journal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub received: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub by_priority: BTreeMap<Priority, usize>,
}

/// Complaints held in memory, every mutation journaled before it becomes
/// visible and then broadcast.
#[derive(Clone)]
pub struct ComplaintStore {
    complaints: Arc<RwLock<Vec<Complaint>>>,
    journal: Arc<Journal>,
    tx: broadcast::Sender<ComplaintEvent>,
}

impl ComplaintStore {
    pub async fn open(
        config: &StorageConfig,
        tx: broadcast::Sender<ComplaintEvent>,
    ) -> Result<Self> {
        let journal = Journal::open(&config.data_dir).await?;

        let mut complaints: Vec<Complaint> = Vec::new();
        for event in journal.replay().await? {
            match event {
                ComplaintEvent::Created { complaint } => complaints.push(complaint),
                ComplaintEvent::StatusUpdated { complaint } => {
                    match complaints.iter_mut().find(|c| c.id == complaint.id) {
                        Some(existing) => *existing = complaint,
                        None => warn!("Status update for unknown complaint {}", complaint.id),
                    }
                }
            }
        }
        info!("Complaint store ready ({} complaints)", complaints.len());

        Ok(Self {
            complaints: Arc::new(RwLock::new(complaints)),
            journal: Arc::new(journal),
            tx,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ComplaintEvent> {
        self.tx.subscribe()
    }

    /// Registers a new complaint with status `Received`. The id sequence
    /// restarts every calendar year and continues after the highest id
    /// already issued that year.
    pub async fn create(
        &self,
        intake: NewComplaint,
        classification: Classification,
    ) -> Result<Complaint, StoreError> {
        let now = Utc::now();
        let mut complaints = self.complaints.write().await;

        let year = now.year();
        let seq = complaints
            .iter()
            .filter_map(|c| complaint_seq(&c.id, year))
            .max()
            .unwrap_or(0)
            + 1;
        let complaint = Complaint::new(format_complaint_id(year, seq), intake, classification, now);

        let event = ComplaintEvent::Created {
            complaint: complaint.clone(),
        };
        self.journal.append(&event).await?;
        complaints.push(complaint.clone());
        drop(complaints);

        info!(
            "Complaint {} received [{}] {}",
            complaint.id, complaint.priority, complaint.category
        );
        self.publish(event);
        Ok(complaint)
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: Status,
        notes: Option<String>,
    ) -> Result<Complaint, StoreError> {
        let mut complaints = self.complaints.write().await;
        let index = complaints
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut updated = complaints[index].clone();
        let previous = updated.status;
        updated.update_status(status, notes, Utc::now());

        let event = ComplaintEvent::StatusUpdated {
            complaint: updated.clone(),
        };
        self.journal.append(&event).await?;
        complaints[index] = updated.clone();
        drop(complaints);

        info!("Complaint {} status {} -> {}", id, previous, status);
        self.publish(event);
        Ok(updated)
    }

    pub async fn get(&self, id: &str) -> Option<Complaint> {
        self.complaints.read().await.iter().find(|c| c.id == id).cloned()
    }

    /// All complaints, newest first.
    pub async fn list(&self) -> Vec<Complaint> {
        self.complaints.read().await.iter().rev().cloned().collect()
    }

    /// Exact id match or phone number substring, newest first.
    pub async fn search(&self, query: &str) -> Vec<Complaint> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        self.complaints
            .read()
            .await
            .iter()
            .rev()
            .filter(|c| {
                c.id == query || c.phone.as_deref().is_some_and(|p| p.contains(query))
            })
            .cloned()
            .collect()
    }

    pub async fn stats(&self) -> Stats {
        let complaints = self.complaints.read().await;
        let mut stats = Stats::default();
        for c in complaints.iter() {
            stats.total += 1;
            match c.status {
                Status::Received => stats.received += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Resolved => stats.resolved += 1,
            }
            *stats.by_priority.entry(c.priority).or_insert(0) += 1;
        }
        stats
    }

    fn publish(&self, event: ComplaintEvent) {
        if self.tx.send(event).is_err() {
            warn!("No active receivers for complaint events");
        }
    }
}
